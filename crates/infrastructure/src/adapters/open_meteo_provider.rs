//! Open-Meteo live provider - implements WeatherProviderPort

use application::{error::ApplicationError, ports::WeatherProviderPort};
use async_trait::async_trait;
use domain::{Location, Observation};
use integration_weather::{OpenMeteoClient, OpenMeteoConfig, OpenMeteoCurrentResponse, Payload};
use tracing::{debug, instrument};

use super::error::{map_client_init_error, map_weather_error, truncate_reading};

/// Source identifier carried by Open-Meteo observations
pub const OPEN_METEO_SOURCE: &str = "openmeteo";

/// Current conditions from the Open-Meteo forecast API
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    client: OpenMeteoClient,
}

impl OpenMeteoProvider {
    /// Create a provider from client configuration
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the HTTP client fails to initialize.
    pub fn new(config: OpenMeteoConfig) -> Result<Self, ApplicationError> {
        let client = OpenMeteoClient::new(config)
            .map_err(|e| map_client_init_error(OPEN_METEO_SOURCE, &e))?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    #[must_use]
    pub const fn with_client(client: OpenMeteoClient) -> Self {
        Self { client }
    }

    /// The forecast API reports a single temperature, so it doubles as the
    /// minimum and maximum. Feels-like falls back to it when absent.
    fn to_observation(payload: Payload<OpenMeteoCurrentResponse>) -> Result<Observation, ApplicationError> {
        let current = payload.parsed.current.ok_or_else(|| {
            ApplicationError::MalformedResponse(format!("{OPEN_METEO_SOURCE}: no current block"))
        })?;
        let temp = current.temperature_2m;

        Ok(Observation {
            feels_like: current.apparent_temperature.unwrap_or(temp),
            temp_min: temp,
            temp_max: temp,
            pressure: current.pressure_msl.map_or(0, truncate_reading),
            humidity: current.relative_humidity_2m.map_or(0, truncate_reading),
            temp,
            city_name: String::new(),
            source: OPEN_METEO_SOURCE.to_string(),
            source_response: payload.raw,
            predicted_next_hour: None,
        })
    }
}

#[async_trait]
impl WeatherProviderPort for OpenMeteoProvider {
    fn source(&self) -> &'static str {
        OPEN_METEO_SOURCE
    }

    #[instrument(skip(self, location), fields(location_id = %location.id, source = OPEN_METEO_SOURCE))]
    async fn fetch(&self, location: &Location) -> Result<Observation, ApplicationError> {
        let payload = self
            .client
            .current(location.coordinates.latitude(), location.coordinates.longitude())
            .await
            .map_err(|e| map_weather_error(OPEN_METEO_SOURCE, &e))?;

        let observation = Self::to_observation(payload)?;
        debug!(temp = observation.temp, "Retrieved current conditions");
        Ok(observation)
    }
}
