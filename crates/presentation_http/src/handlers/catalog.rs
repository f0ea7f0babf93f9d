//! Location catalog handlers

use axum::{
    Json,
    extract::{Path, State},
};
use domain::Location;
use tracing::instrument;

use crate::{error::ApiError, state::AppState};

/// List the distinct country names, sorted
#[instrument(skip(state))]
pub async fn list_countries(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let countries = state.catalog.countries().await?;
    Ok(Json(countries))
}

/// List the locations of one country, sorted by name
///
/// An unknown country yields an empty array.
#[instrument(skip(state))]
pub async fn list_cities(
    State(state): State<AppState>,
    Path(country): Path<String>,
) -> Result<Json<Vec<Location>>, ApiError> {
    let cities = state.catalog.cities(&country).await?;
    Ok(Json(cities))
}
