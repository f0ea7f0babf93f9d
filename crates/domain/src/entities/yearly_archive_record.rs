//! Yearly archive record - one past calendar day of hourly temperatures
//!
//! Each record carries the day's population standard deviation and the
//! hour-to-hour temperature change expressed in units of that deviation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Number of hourly samples in one archived day
pub const HOURS_PER_DAY: usize = 24;

/// Arithmetic mean, `None` for an empty slice
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let len = values.len() as f64;
    Some(values.iter().sum::<f64>() / len)
}

/// Population standard deviation (mean of squared deviations, square-rooted)
#[must_use]
pub fn population_standard_deviation(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    let squared: Vec<f64> = values.iter().map(|v| (v - avg).powi(2)).collect();
    mean(&squared).map(f64::sqrt)
}

/// Hourly temperature statistics for one archived day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyArchiveRecord {
    /// The calendar day the samples belong to
    pub date: NaiveDate,
    /// Hourly temperatures in Celsius, hour 0 first
    pub samples: Vec<f64>,
    /// Population standard deviation of `samples`
    pub standard_deviation: f64,
    /// `(samples[j] - samples[j - 1]) / standard_deviation` stored at `j - 1`;
    /// `None` when the deviation is zero
    pub hourly_delta_ratio: Vec<Option<f64>>,
}

impl YearlyArchiveRecord {
    /// Derive a record from one day of hourly samples
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSeries` unless there are exactly
    /// [`HOURS_PER_DAY`] finite samples.
    pub fn from_samples(date: NaiveDate, samples: Vec<f64>) -> Result<Self, DomainError> {
        if samples.len() != HOURS_PER_DAY {
            return Err(DomainError::InvalidSeries(format!(
                "expected {HOURS_PER_DAY} samples for {date}, got {}",
                samples.len()
            )));
        }
        if let Some(pos) = samples.iter().position(|s| !s.is_finite()) {
            return Err(DomainError::InvalidSeries(format!(
                "sample {pos} for {date} is not a finite number"
            )));
        }

        let standard_deviation = population_standard_deviation(&samples).unwrap_or(0.0);
        let hourly_delta_ratio = samples
            .windows(2)
            .map(|pair| {
                let delta = pair[1] - pair[0];
                if standard_deviation > 0.0 {
                    Some(delta / standard_deviation).filter(|r| r.is_finite())
                } else {
                    None
                }
            })
            .collect();

        Ok(Self {
            date,
            samples,
            standard_deviation,
            hourly_delta_ratio,
        })
    }

    /// Whether the day had any temperature variation at all
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.standard_deviation <= 0.0
    }
}
