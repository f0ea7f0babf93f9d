//! Integration tests for the weather clients using wiremock
//!
//! These tests verify the clients' behavior against a mock HTTP server,
//! ensuring proper handling of various response scenarios.

#![allow(clippy::unwrap_used, clippy::expect_used)]
use chrono::NaiveDate;
use integration_weather::{
    OpenMeteoClient, OpenMeteoConfig, OpenWeatherMapClient, OpenWeatherMapConfig, WeatherError,
};
use secrecy::SecretString;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

/// Recorded Open-Meteo `current` response
fn sample_current_response() -> serde_json::Value {
    serde_json::json!({
        "latitude": 38.74,
        "longitude": -9.16,
        "generationtime_ms": 0.05,
        "utc_offset_seconds": 0,
        "timezone": "GMT",
        "elevation": 77.0,
        "current_units": {
            "time": "iso8601",
            "interval": "seconds",
            "temperature_2m": "°C",
            "apparent_temperature": "°C",
            "relative_humidity_2m": "%",
            "pressure_msl": "hPa",
            "wind_speed_10m": "km/h"
        },
        "current": {
            "time": "2024-06-01T12:00",
            "interval": 900,
            "temperature_2m": 23.4,
            "apparent_temperature": 22.9,
            "relative_humidity_2m": 48,
            "pressure_msl": 1016.8,
            "wind_speed_10m": 14.2
        }
    })
}

/// Recorded Open-Meteo archive response for one day
fn sample_archive_response(samples: &[Option<f64>]) -> serde_json::Value {
    let time: Vec<String> = (0..samples.len())
        .map(|h| format!("2023-06-01T{h:02}:00"))
        .collect();
    serde_json::json!({
        "latitude": 38.75,
        "longitude": -9.15,
        "hourly_units": {"time": "iso8601", "temperature_2m": "°C"},
        "hourly": {"time": time, "temperature_2m": samples}
    })
}

/// Recorded OpenWeatherMap `weather` response
fn sample_owm_response() -> serde_json::Value {
    serde_json::json!({
        "coord": {"lon": -9.16, "lat": 38.74},
        "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
        "base": "stations",
        "main": {
            "temp": 23.1,
            "feels_like": 22.7,
            "temp_min": 21.9,
            "temp_max": 24.3,
            "pressure": 1017,
            "humidity": 50
        },
        "visibility": 10000,
        "wind": {"speed": 4.1, "deg": 320},
        "dt": 1_717_243_200,
        "name": "Lisbon",
        "cod": 200
    })
}

fn open_meteo_client(server: &MockServer) -> OpenMeteoClient {
    let config = OpenMeteoConfig {
        base_url: server.uri(),
        archive_base_url: server.uri(),
        timeout_secs: 5,
    };
    #[allow(clippy::expect_used)]
    OpenMeteoClient::new(config).expect("Failed to create client")
}

fn owm_client(server: &MockServer) -> OpenWeatherMapClient {
    let config = OpenWeatherMapConfig {
        base_url: server.uri(),
        api_key: SecretString::from("test-key"),
        timeout_secs: 5,
    };
    #[allow(clippy::expect_used)]
    OpenWeatherMapClient::new(config).expect("Failed to create client")
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 6, 1).unwrap()
}

// ============================================================================
// Open-Meteo current
// ============================================================================

#[tokio::test]
async fn test_open_meteo_current_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("latitude", "38.74"))
        .and(query_param("longitude", "-9.16"))
        .and(query_param(
            "current",
            "temperature_2m,apparent_temperature,relative_humidity_2m,pressure_msl,wind_speed_10m",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_current_response()))
        .expect(1)
        .mount(&server)
        .await;

    let payload = open_meteo_client(&server).current(38.74, -9.16).await.unwrap();
    let current = payload.parsed.current.unwrap();
    assert!((current.temperature_2m - 23.4).abs() < f64::EPSILON);
    assert_eq!(current.apparent_temperature, Some(22.9));
    assert_eq!(current.pressure_msl, Some(1016.8));
    assert_eq!(payload.raw["current"]["interval"], 900);
}

#[tokio::test]
async fn test_open_meteo_current_without_block() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"latitude": 1.0, "longitude": 2.0})),
        )
        .mount(&server)
        .await;

    let err = open_meteo_client(&server).current(1.0, 2.0).await.unwrap_err();
    assert!(matches!(err, WeatherError::MissingData(_)));
}

#[tokio::test]
async fn test_open_meteo_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = open_meteo_client(&server).current(1.0, 2.0).await.unwrap_err();
    assert!(matches!(err, WeatherError::ServiceUnavailable(_)));
}

#[tokio::test]
async fn test_open_meteo_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = open_meteo_client(&server).current(1.0, 2.0).await.unwrap_err();
    assert!(matches!(err, WeatherError::RateLimitExceeded));
}

#[tokio::test]
async fn test_open_meteo_garbage_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = open_meteo_client(&server).current(1.0, 2.0).await.unwrap_err();
    assert!(matches!(err, WeatherError::ParseError(_)));
}

// ============================================================================
// Open-Meteo archive
// ============================================================================

#[tokio::test]
async fn test_archive_day_success() {
    let server = MockServer::start().await;
    let samples: Vec<Option<f64>> = (0..24).map(|h| Some(15.0 + f64::from(h) * 0.5)).collect();
    Mock::given(method("GET"))
        .and(path("/archive"))
        .and(query_param("start_date", "2023-06-01"))
        .and(query_param("end_date", "2023-06-01"))
        .and(query_param("hourly", "temperature_2m"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_archive_response(&samples)))
        .expect(1)
        .mount(&server)
        .await;

    let day_samples = open_meteo_client(&server)
        .archive_day(38.75, -9.15, day())
        .await
        .unwrap();
    assert_eq!(day_samples.len(), 24);
    assert!((day_samples[0] - 15.0).abs() < f64::EPSILON);
    assert!((day_samples[23] - 26.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_archive_day_with_null_sample() {
    let server = MockServer::start().await;
    let mut samples: Vec<Option<f64>> = vec![Some(10.0); 24];
    samples[7] = None;
    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_archive_response(&samples)))
        .mount(&server)
        .await;

    let err = open_meteo_client(&server)
        .archive_day(38.75, -9.15, day())
        .await
        .unwrap_err();
    assert!(matches!(err, WeatherError::MissingData(_)));
    assert!(err.to_string().contains("hour 7"));
}

#[tokio::test]
async fn test_archive_day_short_series_is_returned_as_is() {
    let server = MockServer::start().await;
    let samples = vec![Some(10.0); 20];
    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_archive_response(&samples)))
        .mount(&server)
        .await;

    let day_samples = open_meteo_client(&server)
        .archive_day(38.75, -9.15, day())
        .await
        .unwrap();
    assert_eq!(day_samples.len(), 20);
}

#[tokio::test]
async fn test_archive_day_bad_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(ResponseTemplate::new(400).set_body_json(
            serde_json::json!({"error": true, "reason": "start_date out of range"}),
        ))
        .mount(&server)
        .await;

    let err = open_meteo_client(&server)
        .archive_day(38.75, -9.15, day())
        .await
        .unwrap_err();
    assert!(matches!(err, WeatherError::RequestFailed(_)));
}

// ============================================================================
// OpenWeatherMap
// ============================================================================

#[tokio::test]
async fn test_owm_current_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "38.74"))
        .and(query_param("lon", "-9.16"))
        .and(query_param("appid", "test-key"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_owm_response()))
        .expect(1)
        .mount(&server)
        .await;

    let payload = owm_client(&server).current(38.74, -9.16).await.unwrap();
    assert_eq!(payload.parsed.name, "Lisbon");
    assert!((payload.parsed.main.temp - 23.1).abs() < f64::EPSILON);
    assert!((payload.parsed.main.pressure - 1017.0).abs() < f64::EPSILON);
    assert_eq!(payload.raw["visibility"], 10000);
}

#[tokio::test]
async fn test_owm_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_json(
            serde_json::json!({"cod": 401, "message": "Invalid API key"}),
        ))
        .mount(&server)
        .await;

    let err = owm_client(&server).current(38.74, -9.16).await.unwrap_err();
    assert!(matches!(err, WeatherError::Unauthorized(_)));
}

#[tokio::test]
async fn test_owm_missing_main_block() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"name": "Nowhere"})),
        )
        .mount(&server)
        .await;

    let err = owm_client(&server).current(0.0, 0.0).await.unwrap_err();
    assert!(matches!(err, WeatherError::ParseError(_)));
}

#[tokio::test]
async fn test_owm_transport_error_hides_api_key() {
    let config = OpenWeatherMapConfig {
        // Nothing listens on port 1
        base_url: "http://127.0.0.1:1".into(),
        api_key: SecretString::from("sentinel-owm-key"),
        timeout_secs: 5,
    };
    let client = OpenWeatherMapClient::new(config).unwrap();

    let err = client.current(10.0, 10.0).await.unwrap_err();
    assert!(matches!(err, WeatherError::RequestFailed(_)));
    assert!(!err.to_string().contains("sentinel-owm-key"));
    assert!(!err.to_string().contains("appid"));
}

#[tokio::test]
async fn test_truncated_body_is_request_failure() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = [0_u8; 1024];
        let _ = stream.read(&mut request).await;
        // Promise more body than is sent, then hang up
        let _ = stream
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 512\r\n\r\n{\"latitude\":")
            .await;
        let _ = stream.shutdown().await;
    });

    let config = OpenWeatherMapConfig {
        base_url: format!("http://{addr}"),
        api_key: SecretString::from("sentinel-owm-key"),
        timeout_secs: 5,
    };
    let client = OpenWeatherMapClient::new(config).unwrap();

    let err = client.current(10.0, 10.0).await.unwrap_err();
    assert!(matches!(err, WeatherError::RequestFailed(_)), "{err:?}");
    assert!(!err.is_decode_error());
    assert!(!err.to_string().contains("sentinel-owm-key"));
}
