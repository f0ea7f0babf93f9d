//! Session retention configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Background pruning of old weather sessions
///
/// Disabled by default: sessions then grow without bound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionAppConfig {
    /// Enable the pruning task
    #[serde(default)]
    pub enabled: bool,

    /// Sessions not updated for this many days are deleted (default: 30)
    #[serde(default = "default_max_age_days")]
    pub max_age_days: u32,

    /// Seconds between pruning runs (default: 3600)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

/// Upper bound on `max_age_days`, about a thousand years
pub const MAX_AGE_DAYS_LIMIT: u32 = 365_250;

const fn default_max_age_days() -> u32 {
    30
}

const fn default_interval_secs() -> u64 {
    3600
}

impl Default for RetentionAppConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_age_days: default_max_age_days(),
            interval_secs: default_interval_secs(),
        }
    }
}

impl RetentionAppConfig {
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    #[must_use]
    pub fn max_age(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.max_age_days))
    }
}
