//! Provider-native response models
//!
//! Only the fields the mappings read are typed. Everything else survives in
//! [`Payload::raw`].

use serde::Deserialize;

/// A decoded response together with the JSON it came from
#[derive(Debug, Clone)]
pub struct Payload<T> {
    pub parsed: T,
    pub raw: serde_json::Value,
}

// ============================================================================
// Open-Meteo forecast (current conditions)
// ============================================================================

/// `GET /forecast?current=...` response
#[derive(Debug, Clone, Deserialize)]
pub struct OpenMeteoCurrentResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub current: Option<OpenMeteoCurrent>,
}

/// The `current` block
#[derive(Debug, Clone, Deserialize)]
pub struct OpenMeteoCurrent {
    pub time: String,
    pub temperature_2m: f64,
    #[serde(default)]
    pub apparent_temperature: Option<f64>,
    #[serde(default)]
    pub relative_humidity_2m: Option<f64>,
    #[serde(default)]
    pub pressure_msl: Option<f64>,
    #[serde(default)]
    pub wind_speed_10m: Option<f64>,
}

// ============================================================================
// Open-Meteo archive
// ============================================================================

/// `GET /archive?hourly=temperature_2m` response
#[derive(Debug, Clone, Deserialize)]
pub struct OpenMeteoArchiveResponse {
    pub hourly: Option<OpenMeteoHourly>,
}

/// The `hourly` block; gaps in the archive arrive as `null`
#[derive(Debug, Clone, Deserialize)]
pub struct OpenMeteoHourly {
    pub time: Vec<String>,
    pub temperature_2m: Vec<Option<f64>>,
}

// ============================================================================
// OpenWeatherMap current weather
// ============================================================================

/// `GET /weather` response
#[derive(Debug, Clone, Deserialize)]
pub struct OpenWeatherMapResponse {
    #[serde(default)]
    pub name: String,
    pub main: OpenWeatherMapMain,
}

/// The `main` block, in metric units
#[derive(Debug, Clone, Deserialize)]
pub struct OpenWeatherMapMain {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: f64,
    pub humidity: f64,
}
