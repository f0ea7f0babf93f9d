//! Timezone value object

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Error returned for names missing from the IANA database
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown timezone: {0}")]
pub struct InvalidTimezone(String);

/// A validated IANA timezone, used to read the hour of day off a UTC instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timezone(Tz);

impl Timezone {
    /// Parse an IANA timezone name such as `Europe/Berlin`
    ///
    /// # Errors
    ///
    /// Returns `InvalidTimezone` if the name is not in the IANA database.
    pub fn new(name: &str) -> Result<Self, InvalidTimezone> {
        Tz::from_str(name)
            .map(Self)
            .map_err(|_| InvalidTimezone(name.to_string()))
    }

    /// UTC timezone
    #[must_use]
    pub const fn utc() -> Self {
        Self(Tz::UTC)
    }

    /// Get the timezone name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        self.0.name()
    }

    /// Hour of day (0-23) of `instant` in this timezone
    #[must_use]
    pub fn hour_of_day(&self, instant: DateTime<Utc>) -> u32 {
        instant.with_timezone(&self.0).hour()
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self::utc()
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for Timezone {
    type Error = InvalidTimezone;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<Timezone> for String {
    fn from(tz: Timezone) -> Self {
        tz.as_str().to_string()
    }
}
