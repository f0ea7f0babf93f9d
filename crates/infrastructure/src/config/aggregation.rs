//! Aggregation loop configuration.

use std::time::Duration;

use application::AggregationSettings;
use domain::value_objects::{InvalidTimezone, Timezone};
use serde::{Deserialize, Serialize};

/// Timing, baseline depth and prediction timezone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationAppConfig {
    /// Milliseconds between ticks (default: 5000)
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Archive years folded into a baseline (default: 5)
    #[serde(default = "default_lookback_years")]
    pub lookback_years: u32,

    /// Bound on one provider fetch in seconds (default: 10)
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// IANA timezone whose hour of day drives predictions (default: UTC)
    #[serde(default = "default_prediction_timezone")]
    pub prediction_timezone: String,
}

const fn default_tick_interval_ms() -> u64 {
    5_000
}

const fn default_lookback_years() -> u32 {
    application::DEFAULT_LOOKBACK_YEARS
}

const fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_prediction_timezone() -> String {
    "UTC".to_string()
}

impl Default for AggregationAppConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            lookback_years: default_lookback_years(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            prediction_timezone: default_prediction_timezone(),
        }
    }
}

impl AggregationAppConfig {
    #[must_use]
    pub const fn settings(&self) -> AggregationSettings {
        AggregationSettings {
            tick_interval: Duration::from_millis(self.tick_interval_ms),
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
        }
    }

    pub fn timezone(&self) -> Result<Timezone, InvalidTimezone> {
        Timezone::new(&self.prediction_timezone)
    }
}
