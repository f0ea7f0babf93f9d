//! Next-hour prediction from a location's hourly profile

use chrono::{DateTime, Utc};
use domain::{
    entities::{HourlyProfile, Observation},
    value_objects::Timezone,
};

/// Predicted temperature for the hour after `hour_of_day`
///
/// `temp * (1 + ratio)` where `ratio` is the profile entry at
/// `(hour_of_day + 1) mod 23`. Returns `None` when that entry is undefined.
pub fn predict(observation: &Observation, profile: &HourlyProfile, hour_of_day: u32) -> Option<f64> {
    profile
        .ratio_for_next_hour(hour_of_day)
        .map(|ratio| observation.temp * (1.0 + ratio))
}

/// Applies [`predict`] using the hour of day in a fixed timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct PredictionEngine {
    timezone: Timezone,
}

impl PredictionEngine {
    pub const fn new(timezone: Timezone) -> Self {
        Self { timezone }
    }

    pub const fn timezone(&self) -> Timezone {
        self.timezone
    }

    /// Hour of day of `now` in the configured timezone
    pub fn hour_of_day(&self, now: DateTime<Utc>) -> u32 {
        self.timezone.hour_of_day(now)
    }

    /// Fill `predicted_next_hour` on every observation
    pub fn annotate(
        &self,
        observations: Vec<Observation>,
        profile: &HourlyProfile,
        now: DateTime<Utc>,
    ) -> Vec<Observation> {
        let hour = self.hour_of_day(now);
        observations
            .into_iter()
            .map(|obs| {
                let predicted = predict(&obs, profile, hour);
                obs.with_prediction(predicted)
            })
            .collect()
    }
}
