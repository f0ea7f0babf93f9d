//! Weather provider configuration: Open-Meteo and OpenWeatherMap.

use integration_weather::{OpenMeteoConfig, OpenWeatherMapConfig};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Provider endpoints and credentials
#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherAppConfig {
    /// Open-Meteo forecast API base URL
    #[serde(default = "default_open_meteo_base_url")]
    pub open_meteo_base_url: String,

    /// Open-Meteo archive API base URL
    #[serde(default = "default_archive_base_url")]
    pub archive_base_url: String,

    /// OpenWeatherMap API base URL
    #[serde(default = "default_openweathermap_base_url")]
    pub openweathermap_base_url: String,

    /// OpenWeatherMap API key; the provider is disabled without one
    #[serde(default, skip_serializing)]
    pub openweathermap_api_key: Option<SecretString>,

    /// HTTP client timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for WeatherAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherAppConfig")
            .field("open_meteo_base_url", &self.open_meteo_base_url)
            .field("archive_base_url", &self.archive_base_url)
            .field("openweathermap_base_url", &self.openweathermap_base_url)
            .field(
                "openweathermap_api_key",
                &if self.openweathermap_api_key.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_open_meteo_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_archive_base_url() -> String {
    "https://archive-api.open-meteo.com/v1".to_string()
}

fn default_openweathermap_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

const fn default_weather_timeout() -> u64 {
    10
}

impl Default for WeatherAppConfig {
    fn default() -> Self {
        Self {
            open_meteo_base_url: default_open_meteo_base_url(),
            archive_base_url: default_archive_base_url(),
            openweathermap_base_url: default_openweathermap_base_url(),
            openweathermap_api_key: None,
            timeout_secs: default_weather_timeout(),
        }
    }
}

impl WeatherAppConfig {
    /// Client configuration for Open-Meteo (live and archive)
    #[must_use]
    pub fn open_meteo(&self) -> OpenMeteoConfig {
        OpenMeteoConfig {
            base_url: self.open_meteo_base_url.clone(),
            archive_base_url: self.archive_base_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }

    /// Client configuration for OpenWeatherMap, if a key is set
    #[must_use]
    pub fn openweathermap(&self) -> Option<OpenWeatherMapConfig> {
        self.openweathermap_api_key
            .as_ref()
            .map(|key| OpenWeatherMapConfig {
                base_url: self.openweathermap_base_url.clone(),
                api_key: key.clone(),
                timeout_secs: self.timeout_secs,
            })
    }
}
