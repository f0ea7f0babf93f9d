//! Catalog service - browsing and importing locations

use std::sync::Arc;

use domain::{DomainError, entities::Location};
use tracing::{info, instrument};

use crate::{error::ApplicationError, ports::LocationStore};

/// Read and import access to the location catalog
pub struct CatalogService {
    locations: Arc<dyn LocationStore>,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService").finish_non_exhaustive()
    }
}

impl CatalogService {
    pub fn new(locations: Arc<dyn LocationStore>) -> Self {
        Self { locations }
    }

    /// Distinct country names, sorted
    pub async fn countries(&self) -> Result<Vec<String>, ApplicationError> {
        self.locations.countries().await
    }

    /// Cities of one country, sorted by name
    #[instrument(skip(self))]
    pub async fn cities(&self, country: &str) -> Result<Vec<Location>, ApplicationError> {
        let country = country.trim();
        if country.is_empty() {
            return Err(DomainError::ValidationError("country must not be empty".into()).into());
        }
        self.locations.cities_by_country(country).await
    }

    /// Upsert every location, returning how many were written
    ///
    /// Stops at the first store error; earlier rows stay written.
    #[instrument(skip_all, fields(count = locations.len()))]
    pub async fn import(&self, locations: &[Location]) -> Result<usize, ApplicationError> {
        for location in locations {
            if location.name.trim().is_empty() || location.country.trim().is_empty() {
                return Err(DomainError::ValidationError(format!(
                    "location {} needs a name and a country",
                    location.id
                ))
                .into());
            }
        }
        for location in locations {
            self.locations.upsert(location).await?;
        }
        info!(imported = locations.len(), "Imported locations");
        Ok(locations.len())
    }
}
