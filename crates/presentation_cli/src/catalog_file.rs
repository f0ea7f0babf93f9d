//! Location catalog files
//!
//! A catalog file is a JSON array of flat city records in the worldcities
//! layout (`city`, `lat`, `lng`, ...). The native field names (`name`,
//! `latitude`, `longitude`, ...) are accepted as well. Records with a UUID
//! `id` keep it, so re-importing the same file updates in place.

use std::path::Path;

use domain::{GeoLocation, Location, LocationId};
use serde::Deserialize;
use thiserror::Error;

/// Problems reading a catalog file
#[derive(Debug, Error)]
pub enum CatalogFileError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record {index} ({name}): {reason}")]
    InvalidRecord {
        index: usize,
        name: String,
        reason: String,
    },
}

/// One city record as it appears in a catalog file
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRecord {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(alias = "city")]
    name: String,
    #[serde(default, alias = "city_ascii")]
    name_ascii: Option<String>,
    country: String,
    #[serde(default)]
    iso2: Option<String>,
    #[serde(default)]
    iso3: Option<String>,
    #[serde(default)]
    admin_name: Option<String>,
    #[serde(default)]
    capital: Option<String>,
    #[serde(default)]
    population: Option<f64>,
    #[serde(alias = "lat")]
    latitude: f64,
    #[serde(alias = "lng")]
    longitude: f64,
}

impl CatalogRecord {
    fn into_location(self, index: usize) -> Result<Location, CatalogFileError> {
        let invalid = |name: &str, reason: String| CatalogFileError::InvalidRecord {
            index,
            name: name.to_string(),
            reason,
        };

        let coordinates = GeoLocation::new(self.latitude, self.longitude)
            .map_err(|e| invalid(&self.name, e.to_string()))?;

        let mut location = Location::new(self.name.trim(), self.country.trim(), coordinates);
        // Worldcities numeric ids are not UUIDs and get a fresh one
        if let Some(id) = self.id.as_ref().and_then(serde_json::Value::as_str) {
            location.id =
                LocationId::parse(id).map_err(|e| invalid(&self.name, format!("bad id: {e}")))?;
        }
        if let Some(ascii) = non_blank(self.name_ascii) {
            location.name_ascii = ascii;
        }
        location.iso2 = non_blank(self.iso2);
        location.iso3 = non_blank(self.iso3);
        location.admin_name = non_blank(self.admin_name);
        location.capital = non_blank(self.capital);
        location.population = self
            .population
            .filter(|p| p.is_finite() && *p >= 0.0)
            .map(population_count);
        Ok(location)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn population_count(value: f64) -> u64 {
    value.round() as u64
}

/// Parse catalog JSON into locations
pub fn parse_catalog(json: &str) -> Result<Vec<Location>, CatalogFileError> {
    let records: Vec<CatalogRecord> = serde_json::from_str(json)?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.into_location(index))
        .collect()
}

/// Read and parse a catalog file
pub fn read_catalog(path: &Path) -> Result<Vec<Location>, CatalogFileError> {
    let json = std::fs::read_to_string(path).map_err(|source| CatalogFileError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_catalog(&json)
}
