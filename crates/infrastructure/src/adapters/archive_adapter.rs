//! Open-Meteo archive adapter - implements ArchivePort

use application::{error::ApplicationError, ports::ArchivePort};
use async_trait::async_trait;
use chrono::NaiveDate;
use domain::GeoLocation;
use integration_weather::{OpenMeteoClient, OpenMeteoConfig};
use tracing::{debug, instrument};

use super::error::{map_client_init_error, map_weather_error};

const ARCHIVE_SOURCE: &str = "openmeteo-archive";

/// Hourly temperature history from the Open-Meteo archive API
#[derive(Debug, Clone)]
pub struct OpenMeteoArchiveAdapter {
    client: OpenMeteoClient,
}

impl OpenMeteoArchiveAdapter {
    /// # Errors
    ///
    /// Returns `Configuration` if the HTTP client fails to initialize.
    pub fn new(config: OpenMeteoConfig) -> Result<Self, ApplicationError> {
        let client =
            OpenMeteoClient::new(config).map_err(|e| map_client_init_error(ARCHIVE_SOURCE, &e))?;
        Ok(Self { client })
    }

    #[must_use]
    pub const fn with_client(client: OpenMeteoClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArchivePort for OpenMeteoArchiveAdapter {
    #[instrument(skip(self), fields(lat = coordinates.latitude(), lon = coordinates.longitude()))]
    async fn fetch_day(
        &self,
        coordinates: &GeoLocation,
        date: NaiveDate,
    ) -> Result<Vec<f64>, ApplicationError> {
        let samples = self
            .client
            .archive_day(coordinates.latitude(), coordinates.longitude(), date)
            .await
            .map_err(|e| map_weather_error(ARCHIVE_SOURCE, &e))?;

        debug!(samples = samples.len(), "Retrieved archive day");
        Ok(samples)
    }
}
