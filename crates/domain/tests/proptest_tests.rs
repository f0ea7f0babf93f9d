//! Property-based tests for the domain statistics and value objects
//!
//! These tests use proptest to verify invariants across many random inputs.

use chrono::NaiveDate;
use domain::{
    entities::{
        AggregatedTick, HOURLY_DELTA_SLOTS, HOURS_PER_DAY, HourlyProfile, Observation,
        YearlyArchiveRecord, population_standard_deviation,
    },
    value_objects::{GeoLocation, LocationId},
};
use proptest::prelude::*;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 7, 14).unwrap()
}

fn day_samples() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-40.0f64..50.0f64, HOURS_PER_DAY)
}

// ============================================================================
// GeoLocation Property Tests
// ============================================================================

mod geo_location_tests {
    use super::*;

    proptest! {
        #[test]
        fn valid_coordinates_create_location(
            lat in -90.0f64..=90.0f64,
            lon in -180.0f64..=180.0f64
        ) {
            let loc = GeoLocation::new(lat, lon);
            prop_assert!(loc.is_ok());
            let loc = loc.unwrap();
            prop_assert!((loc.latitude() - lat).abs() < f64::EPSILON);
            prop_assert!((loc.longitude() - lon).abs() < f64::EPSILON);
        }

        #[test]
        fn invalid_latitude_rejected(
            lat in prop_oneof![
                (-1000.0f64..-90.1f64),
                (90.1f64..1000.0f64)
            ],
            lon in -180.0f64..=180.0f64
        ) {
            prop_assert!(GeoLocation::new(lat, lon).is_err());
        }

        #[test]
        fn invalid_longitude_rejected(
            lat in -90.0f64..=90.0f64,
            lon in prop_oneof![
                (-1000.0f64..-180.1f64),
                (180.1f64..1000.0f64)
            ]
        ) {
            prop_assert!(GeoLocation::new(lat, lon).is_err());
        }
    }
}

// ============================================================================
// LocationId Property Tests
// ============================================================================

mod location_id_tests {
    use super::*;

    proptest! {
        #[test]
        fn display_then_parse_is_identity(_seed in any::<u8>()) {
            let id = LocationId::new();
            let parsed = LocationId::parse(&id.to_string()).unwrap();
            prop_assert_eq!(id, parsed);
        }

        #[test]
        fn quoted_ids_parse(_seed in any::<u8>()) {
            let id = LocationId::new();
            let quoted = format!("\"{id}\"");
            prop_assert_eq!(LocationId::parse(&quoted).unwrap(), id);
        }
    }
}

// ============================================================================
// YearlyArchiveRecord Property Tests
// ============================================================================

mod yearly_record_tests {
    use super::*;

    proptest! {
        #[test]
        fn always_23_ratios(samples in day_samples()) {
            let record = YearlyArchiveRecord::from_samples(day(), samples).unwrap();
            prop_assert_eq!(record.hourly_delta_ratio.len(), HOURLY_DELTA_SLOTS);
        }

        #[test]
        fn ratios_are_never_nan_or_infinite(samples in day_samples()) {
            let record = YearlyArchiveRecord::from_samples(day(), samples).unwrap();
            for ratio in record.hourly_delta_ratio.iter().flatten() {
                prop_assert!(ratio.is_finite());
            }
        }

        #[test]
        fn constant_series_is_all_undefined(value in -40.0f64..50.0f64) {
            let record = YearlyArchiveRecord::from_samples(day(), vec![value; HOURS_PER_DAY]).unwrap();
            prop_assert!(record.standard_deviation.abs() < 1e-9);
            prop_assert!(record.hourly_delta_ratio.iter().all(Option::is_none));
        }

        #[test]
        fn ratio_times_deviation_recovers_delta(samples in day_samples()) {
            let record = YearlyArchiveRecord::from_samples(day(), samples.clone()).unwrap();
            for (j, ratio) in record.hourly_delta_ratio.iter().enumerate() {
                if let Some(r) = ratio {
                    let delta = samples[j + 1] - samples[j];
                    prop_assert!((r * record.standard_deviation - delta).abs() < 1e-6);
                }
            }
        }

        #[test]
        fn deviation_is_shift_invariant(samples in day_samples(), shift in -20.0f64..20.0f64) {
            let shifted: Vec<f64> = samples.iter().map(|s| s + shift).collect();
            let a = population_standard_deviation(&samples).unwrap();
            let b = population_standard_deviation(&shifted).unwrap();
            prop_assert!((a - b).abs() < 1e-6);
        }

        #[test]
        fn wrong_length_rejected(len in 0usize..60) {
            prop_assume!(len != HOURS_PER_DAY);
            prop_assert!(YearlyArchiveRecord::from_samples(day(), vec![1.0; len]).is_err());
        }
    }
}

// ============================================================================
// HourlyProfile Property Tests
// ============================================================================

mod hourly_profile_tests {
    use super::*;

    proptest! {
        #[test]
        fn profile_has_23_entries(days in prop::collection::vec(day_samples(), 1..6)) {
            let records: Vec<_> = days
                .into_iter()
                .map(|s| YearlyArchiveRecord::from_samples(day(), s).unwrap())
                .collect();
            let profile = HourlyProfile::from_records(&records).unwrap();
            prop_assert_eq!(profile.hourly_average_delta_ratio.len(), HOURLY_DELTA_SLOTS);
            prop_assert_eq!(profile.record_count, records.len());
        }

        #[test]
        fn entries_are_means_of_defined_record_entries(
            days in prop::collection::vec(day_samples(), 1..6)
        ) {
            let records: Vec<_> = days
                .into_iter()
                .map(|s| YearlyArchiveRecord::from_samples(day(), s).unwrap())
                .collect();
            let profile = HourlyProfile::from_records(&records).unwrap();

            for idx in 0..HOURLY_DELTA_SLOTS {
                let defined: Vec<f64> = records
                    .iter()
                    .filter_map(|r| r.hourly_delta_ratio[idx])
                    .collect();
                match profile.hourly_average_delta_ratio[idx] {
                    Some(avg) => {
                        #[allow(clippy::cast_precision_loss)]
                        let expected = defined.iter().sum::<f64>() / defined.len() as f64;
                        prop_assert!((avg - expected).abs() < 1e-9);
                    },
                    None => prop_assert!(defined.is_empty()),
                }
            }
        }

        #[test]
        fn single_record_profile_equals_record(samples in day_samples()) {
            let record = YearlyArchiveRecord::from_samples(day(), samples).unwrap();
            let profile = HourlyProfile::from_records(std::slice::from_ref(&record)).unwrap();
            prop_assert_eq!(&profile.hourly_average_delta_ratio, &record.hourly_delta_ratio);
            prop_assert!(
                (profile.average_standard_deviation - record.standard_deviation).abs() < 1e-12
            );
        }

        #[test]
        fn next_hour_slot_in_range(hour in 0u32..24) {
            prop_assert!(HourlyProfile::next_hour_slot(hour) < HOURLY_DELTA_SLOTS);
        }
    }
}

// ============================================================================
// AggregatedTick Property Tests
// ============================================================================

mod aggregated_tick_tests {
    use super::*;

    fn obs(source: String) -> Observation {
        Observation {
            feels_like: 0.0,
            temp_min: 0.0,
            temp_max: 0.0,
            pressure: 1000,
            humidity: 50,
            temp: 0.0,
            city_name: String::new(),
            source,
            source_response: serde_json::Value::Null,
            predicted_next_hour: None,
        }
    }

    proptest! {
        #[test]
        fn sources_come_out_sorted(names in prop::collection::vec("[a-z]{1,12}", 0..8)) {
            let tick = AggregatedTick::new(1, names.into_iter().map(obs).collect());
            for pair in tick.sources.windows(2) {
                prop_assert!(pair[0].source <= pair[1].source);
            }
        }
    }
}
