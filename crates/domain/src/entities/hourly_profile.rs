//! Hourly profile - the per-location baseline folded from yearly records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::yearly_archive_record::{YearlyArchiveRecord, mean};
use crate::errors::DomainError;

/// Number of hour-to-hour deltas in one day, and so the profile length
pub const HOURLY_DELTA_SLOTS: usize = 23;

/// Hour-of-day deviation profile for one location
///
/// Entry `idx` of `hourly_average_delta_ratio` is the mean over all records of
/// their entry `idx`. Undefined record entries are left out of the mean, and
/// the profile entry is undefined only when no record defines it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyProfile {
    /// Mean of the records' standard deviations
    pub average_standard_deviation: f64,
    /// Averaged hour-to-hour delta ratios, always [`HOURLY_DELTA_SLOTS`] long
    pub hourly_average_delta_ratio: Vec<Option<f64>>,
    /// How many yearly records went into the profile
    pub record_count: usize,
    /// When the profile was folded
    pub built_at: DateTime<Utc>,
}

impl HourlyProfile {
    /// Fold yearly records into a profile
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidProfile` when `records` is empty or a
    /// record does not carry [`HOURLY_DELTA_SLOTS`] ratios.
    pub fn from_records(records: &[YearlyArchiveRecord]) -> Result<Self, DomainError> {
        if records.is_empty() {
            return Err(DomainError::InvalidProfile(
                "cannot build a profile from zero records".to_string(),
            ));
        }
        if let Some(bad) = records
            .iter()
            .find(|r| r.hourly_delta_ratio.len() != HOURLY_DELTA_SLOTS)
        {
            return Err(DomainError::InvalidProfile(format!(
                "record for {} has {} ratios, expected {HOURLY_DELTA_SLOTS}",
                bad.date,
                bad.hourly_delta_ratio.len()
            )));
        }

        let deviations: Vec<f64> = records.iter().map(|r| r.standard_deviation).collect();
        let average_standard_deviation = mean(&deviations).unwrap_or(0.0);

        let hourly_average_delta_ratio = (0..HOURLY_DELTA_SLOTS)
            .map(|idx| {
                let defined: Vec<f64> = records
                    .iter()
                    .filter_map(|r| r.hourly_delta_ratio[idx])
                    .collect();
                mean(&defined)
            })
            .collect();

        Ok(Self {
            average_standard_deviation,
            hourly_average_delta_ratio,
            record_count: records.len(),
            built_at: Utc::now(),
        })
    }

    /// Slot consulted for a prediction made at `hour_of_day`
    ///
    /// The index wraps modulo 23, so hour 21 reads slot 22 and hours 22 and
    /// 23 read slots 0 and 1.
    #[must_use]
    pub const fn next_hour_slot(hour_of_day: u32) -> usize {
        (hour_of_day as usize + 1) % HOURLY_DELTA_SLOTS
    }

    /// Averaged ratio used to predict the hour after `hour_of_day`
    #[must_use]
    pub fn ratio_for_next_hour(&self, hour_of_day: u32) -> Option<f64> {
        self.hourly_average_delta_ratio
            .get(Self::next_hour_slot(hour_of_day))
            .copied()
            .flatten()
    }

    /// Check the shape of a profile loaded from storage
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidProfile` if the ratio list has the wrong
    /// length.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.hourly_average_delta_ratio.len() != HOURLY_DELTA_SLOTS {
            return Err(DomainError::InvalidProfile(format!(
                "profile has {} ratios, expected {HOURLY_DELTA_SLOTS}",
                self.hourly_average_delta_ratio.len()
            )));
        }
        Ok(())
    }
}
