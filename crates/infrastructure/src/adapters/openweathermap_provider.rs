//! OpenWeatherMap live provider - implements WeatherProviderPort

use application::{error::ApplicationError, ports::WeatherProviderPort};
use async_trait::async_trait;
use domain::{Location, Observation};
use integration_weather::{OpenWeatherMapClient, OpenWeatherMapConfig};
use tracing::{debug, instrument};

use super::error::{map_client_init_error, map_weather_error, truncate_reading};

/// Source identifier carried by OpenWeatherMap observations
pub const OPENWEATHERMAP_SOURCE: &str = "openweathermap";

/// Current conditions from the OpenWeatherMap API, in metric units
#[derive(Debug, Clone)]
pub struct OpenWeatherMapProvider {
    client: OpenWeatherMapClient,
}

impl OpenWeatherMapProvider {
    /// # Errors
    ///
    /// Returns `Configuration` if the HTTP client fails to initialize.
    pub fn new(config: OpenWeatherMapConfig) -> Result<Self, ApplicationError> {
        let client = OpenWeatherMapClient::new(config)
            .map_err(|e| map_client_init_error(OPENWEATHERMAP_SOURCE, &e))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl WeatherProviderPort for OpenWeatherMapProvider {
    fn source(&self) -> &'static str {
        OPENWEATHERMAP_SOURCE
    }

    #[instrument(skip(self, location), fields(location_id = %location.id, source = OPENWEATHERMAP_SOURCE))]
    async fn fetch(&self, location: &Location) -> Result<Observation, ApplicationError> {
        let payload = self
            .client
            .current(location.coordinates.latitude(), location.coordinates.longitude())
            .await
            .map_err(|e| map_weather_error(OPENWEATHERMAP_SOURCE, &e))?;

        let main = &payload.parsed.main;
        let observation = Observation {
            feels_like: main.feels_like,
            temp_min: main.temp_min,
            temp_max: main.temp_max,
            pressure: truncate_reading(main.pressure),
            humidity: truncate_reading(main.humidity),
            temp: main.temp,
            city_name: payload.parsed.name.clone(),
            source: OPENWEATHERMAP_SOURCE.to_string(),
            source_response: payload.raw,
            predicted_next_hour: None,
        };

        debug!(temp = observation.temp, city = %observation.city_name, "Retrieved current conditions");
        Ok(observation)
    }
}

#[cfg(test)]
mod tests {
    use domain::GeoLocation;
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    use super::*;

    fn lisbon() -> Location {
        Location::new("Lisbon", "Portugal", GeoLocation::new(38.74, -9.16).unwrap())
    }

    fn provider(server: &MockServer) -> OpenWeatherMapProvider {
        OpenWeatherMapProvider::new(OpenWeatherMapConfig {
            base_url: server.uri(),
            api_key: SecretString::from("k3y"),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn maps_recorded_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("appid", "k3y"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "coord": {"lon": -9.16, "lat": 38.74},
                "main": {
                    "temp": 23.1,
                    "feels_like": 22.7,
                    "temp_min": 21.9,
                    "temp_max": 24.3,
                    "pressure": 1017,
                    "humidity": 50
                },
                "name": "Lisbon",
                "cod": 200
            })))
            .expect(1)
            .mount(&server)
            .await;

        let obs = provider(&server).fetch(&lisbon()).await.unwrap();
        assert_eq!(obs.source, "openweathermap");
        assert_eq!(obs.city_name, "Lisbon");
        assert!((obs.temp_min - 21.9).abs() < f64::EPSILON);
        assert!((obs.temp_max - 24.3).abs() < f64::EPSILON);
        assert_eq!(obs.pressure, 1017);
        assert_eq!(obs.humidity, 50);
        assert_eq!(obs.source_response["cod"], 200);
    }

    #[tokio::test]
    async fn rejected_key_is_provider_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = provider(&server).fetch(&lisbon()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ProviderUnavailable(_)));
        assert!(!err.to_string().contains("k3y"));
    }

    #[tokio::test]
    async fn missing_main_block_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cod": 200})))
            .mount(&server)
            .await;

        let err = provider(&server).fetch(&lisbon()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::MalformedResponse(_)));
    }
}
