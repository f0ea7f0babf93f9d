//! Location storage port
//!
//! Defines the interface for reading the location catalog and writing back
//! the per-location baseline.

use async_trait::async_trait;
use domain::{
    entities::{HourlyProfile, Location, YearlyArchiveRecord},
    value_objects::LocationId,
};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for location persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Get a location by ID
    async fn get(&self, id: &LocationId) -> Result<Option<Location>, ApplicationError>;

    /// Write a freshly built baseline and its source records
    async fn save_baseline(
        &self,
        id: &LocationId,
        profile: &HourlyProfile,
        records: &[YearlyArchiveRecord],
    ) -> Result<(), ApplicationError>;

    /// Distinct country names, sorted
    async fn countries(&self) -> Result<Vec<String>, ApplicationError>;

    /// All locations in a country, sorted by name
    async fn cities_by_country(&self, country: &str) -> Result<Vec<Location>, ApplicationError>;

    /// Insert a location or replace the catalog fields of an existing one
    ///
    /// A cached baseline on the stored row is kept unless `location` carries
    /// its own.
    async fn upsert(&self, location: &Location) -> Result<(), ApplicationError>;
}
