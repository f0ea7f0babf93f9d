//! Historical archive port

use async_trait::async_trait;
use chrono::NaiveDate;
use domain::value_objects::GeoLocation;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for archived hourly temperatures
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ArchivePort: Send + Sync {
    /// Hourly temperatures in Celsius for one calendar day, hour 0 first
    ///
    /// A day with gaps in the archive is an error, never a short series.
    async fn fetch_day(
        &self,
        coordinates: &GeoLocation,
        date: NaiveDate,
    ) -> Result<Vec<f64>, ApplicationError>;
}
