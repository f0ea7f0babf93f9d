//! OpenWeatherMap client

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use crate::{
    client::{WeatherError, build_http_client, get_json, validate_coordinates},
    models::{OpenWeatherMapResponse, Payload},
};

/// OpenWeatherMap configuration
#[derive(Clone)]
pub struct OpenWeatherMapConfig {
    /// API base URL, e.g. <https://api.openweathermap.org/data/2.5>
    pub base_url: String,
    /// API key sent as `appid`
    pub api_key: SecretString,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl std::fmt::Debug for OpenWeatherMapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherMapConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// OpenWeatherMap HTTP client
#[derive(Debug, Clone)]
pub struct OpenWeatherMapClient {
    client: Client,
    config: OpenWeatherMapConfig,
}

impl OpenWeatherMapClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: OpenWeatherMapConfig) -> Result<Self, WeatherError> {
        let client = build_http_client(config.timeout_secs)?;
        Ok(Self { client, config })
    }

    /// Current conditions at a point, in metric units
    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude))]
    pub async fn current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Payload<OpenWeatherMapResponse>, WeatherError> {
        validate_coordinates(latitude, longitude)?;

        let url = format!("{}/weather", self.config.base_url);
        let query = [
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("appid", self.config.api_key.expose_secret().to_string()),
            ("units", "metric".to_string()),
        ];
        debug!(url = %url, "Fetching current conditions");

        get_json(&self.client, &url, &query).await
    }
}
