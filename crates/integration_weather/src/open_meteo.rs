//! Open-Meteo client
//!
//! Current conditions come from the forecast API, hourly history from the
//! archive API. Neither needs an API key.

use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    client::{WeatherError, build_http_client, get_json, validate_coordinates},
    models::{OpenMeteoArchiveResponse, OpenMeteoCurrentResponse, Payload},
};

/// Variables requested from the `current` endpoint
pub const CURRENT_VARIABLES: &str =
    "temperature_2m,apparent_temperature,relative_humidity_2m,pressure_msl,wind_speed_10m";

/// Open-Meteo configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenMeteoConfig {
    /// Forecast API base URL (default: <https://api.open-meteo.com/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Archive API base URL (default: <https://archive-api.open-meteo.com/v1>)
    #[serde(default = "default_archive_base_url")]
    pub archive_base_url: String,

    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_archive_base_url() -> String {
    "https://archive-api.open-meteo.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    10
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            archive_base_url: default_archive_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Open-Meteo HTTP client
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    config: OpenMeteoConfig,
}

impl OpenMeteoClient {
    /// Create a new Open-Meteo client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: OpenMeteoConfig) -> Result<Self, WeatherError> {
        let client = build_http_client(config.timeout_secs)?;
        Ok(Self { client, config })
    }

    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, WeatherError> {
        Self::new(OpenMeteoConfig::default())
    }

    /// Current conditions at a point
    ///
    /// # Errors
    ///
    /// Returns `ParseError` when the body does not decode and `MissingData`
    /// when it has no `current` block; transport and status errors as usual.
    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude))]
    pub async fn current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Payload<OpenMeteoCurrentResponse>, WeatherError> {
        validate_coordinates(latitude, longitude)?;

        let url = format!("{}/forecast", self.config.base_url);
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", CURRENT_VARIABLES.to_string()),
        ];
        debug!(url = %url, "Fetching current conditions");

        let payload: Payload<OpenMeteoCurrentResponse> =
            get_json(&self.client, &url, &query).await?;
        if payload.parsed.current.is_none() {
            return Err(WeatherError::MissingData(
                "no current block in response".to_string(),
            ));
        }
        Ok(payload)
    }

    /// Hourly temperatures for one calendar day
    ///
    /// # Errors
    ///
    /// Returns `MissingData` unless the archive holds a non-null temperature
    /// for every hour of the day.
    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude, %date))]
    pub async fn archive_day(
        &self,
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
    ) -> Result<Vec<f64>, WeatherError> {
        validate_coordinates(latitude, longitude)?;

        let url = format!("{}/archive", self.config.archive_base_url);
        let day = date.format("%Y-%m-%d").to_string();
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("start_date", day.clone()),
            ("end_date", day),
            ("hourly", "temperature_2m".to_string()),
        ];
        debug!(url = %url, "Fetching archived hourly temperatures");

        let payload: Payload<OpenMeteoArchiveResponse> =
            get_json(&self.client, &url, &query).await?;
        let hourly = payload
            .parsed
            .hourly
            .ok_or_else(|| WeatherError::MissingData(format!("no hourly block for {date}")))?;

        hourly
            .temperature_2m
            .into_iter()
            .enumerate()
            .map(|(hour, sample)| {
                sample.ok_or_else(|| {
                    WeatherError::MissingData(format!("no temperature for {date} hour {hour}"))
                })
            })
            .collect()
    }
}
