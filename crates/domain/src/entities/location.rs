//! Location entity - a catalog city and its cached baseline

use serde::{Deserialize, Serialize};

use super::{HourlyProfile, YearlyArchiveRecord};
use crate::value_objects::{GeoLocation, LocationId};

/// A city from the location catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Unique location identifier
    pub id: LocationId,
    /// Display name
    pub name: String,
    /// ASCII transliteration of the name
    #[serde(default)]
    pub name_ascii: String,
    /// Country name
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso3: Option<String>,
    /// First-level administrative region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_name: Option<String>,
    /// Capital status (`primary`, `admin`, `minor`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capital: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,
    /// Where the city is
    pub coordinates: GeoLocation,
    /// Cached baseline, built on first subscription
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_profile: Option<HourlyProfile>,
    /// Archive days the baseline was folded from
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub yearly_records: Vec<YearlyArchiveRecord>,
}

impl Location {
    /// Create a location with only the required fields set
    pub fn new(
        name: impl Into<String>,
        country: impl Into<String>,
        coordinates: GeoLocation,
    ) -> Self {
        let name = name.into();
        Self {
            id: LocationId::new(),
            name_ascii: name.clone(),
            name,
            country: country.into(),
            iso2: None,
            iso3: None,
            admin_name: None,
            capital: None,
            population: None,
            coordinates,
            hourly_profile: None,
            yearly_records: Vec::new(),
        }
    }

    /// Whether a baseline has been cached
    pub fn has_profile(&self) -> bool {
        self.hourly_profile.is_some()
    }

    /// Store a freshly built baseline with its source records
    pub fn set_baseline(&mut self, profile: HourlyProfile, records: Vec<YearlyArchiveRecord>) {
        self.hourly_profile = Some(profile);
        self.yearly_records = records;
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn lisbon() -> Location {
        Location::new(
            "Lisbon",
            "Portugal",
            GeoLocation::new(38.7452, -9.1604).unwrap(),
        )
    }

    #[test]
    fn new_location_has_no_profile() {
        let loc = lisbon();
        assert!(!loc.has_profile());
        assert_eq!(loc.name_ascii, "Lisbon");
        assert!(loc.yearly_records.is_empty());
    }

    #[test]
    fn set_baseline_caches_profile() {
        let mut loc = lisbon();
        let samples: Vec<f64> = (0..24).map(f64::from).collect();
        let record =
            YearlyArchiveRecord::from_samples(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), samples)
                .unwrap();
        let profile = HourlyProfile::from_records(std::slice::from_ref(&record)).unwrap();

        loc.set_baseline(profile, vec![record]);
        assert!(loc.has_profile());
        assert_eq!(loc.yearly_records.len(), 1);
    }

    #[test]
    fn deserializes_minimal_catalog_entry() {
        let json = r#"{
            "id": "2f1c4b0e-9a57-4d35-9a1e-4a0f3e1f6b7d",
            "name": "Tokyo",
            "country": "Japan",
            "coordinates": {"latitude": 35.6897, "longitude": 139.6922}
        }"#;
        let loc: Location = serde_json::from_str(json).unwrap();
        assert_eq!(loc.name, "Tokyo");
        assert!(loc.population.is_none());
        assert!(!loc.has_profile());
    }
}
