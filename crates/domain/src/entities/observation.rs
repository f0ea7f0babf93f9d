//! Observation entity - one provider's reading normalized to a common shape

use serde::{Deserialize, Serialize};

/// Current conditions reported by a single provider
///
/// Field names match the emitted wire form. The provider's decoded payload is
/// kept verbatim in `source_response` so nothing the mapping ignores is lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Apparent temperature in Celsius
    pub feels_like: f64,
    /// Minimum temperature in Celsius
    pub temp_min: f64,
    /// Maximum temperature in Celsius
    pub temp_max: f64,
    /// Pressure in hPa
    pub pressure: i32,
    /// Relative humidity in percent
    pub humidity: i32,
    /// Temperature in Celsius
    pub temp: f64,
    /// City name as reported by the provider, empty if it reports none
    pub city_name: String,
    /// Provider identifier
    pub source: String,
    /// Raw decoded provider payload
    pub source_response: serde_json::Value,
    /// Predicted temperature for the next hour
    #[serde(rename = "pred_weather_next_hr")]
    pub predicted_next_hour: Option<f64>,
}

impl Observation {
    /// Attach a prediction
    #[must_use]
    pub fn with_prediction(mut self, predicted: Option<f64>) -> Self {
        self.predicted_next_hour = predicted;
        self
    }
}
