//! Shared HTTP plumbing for the weather clients

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::models::Payload;

/// Weather client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The HTTP client could not be built
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Transport failure or a non-success status other than the ones below
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from weather service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid coordinates provided
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// The API key was rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The response decoded but lacks required values
    #[error("Missing data: {0}")]
    MissingData(String),
}

impl WeatherError {
    /// Whether the error came from the body rather than the transport
    pub const fn is_decode_error(&self) -> bool {
        matches!(self, Self::ParseError(_) | Self::MissingData(_))
    }
}

pub(crate) fn build_http_client(timeout_secs: u64) -> Result<Client, WeatherError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))
}

pub(crate) fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), WeatherError> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(WeatherError::InvalidCoordinates);
    }
    Ok(())
}

fn check_status(status: StatusCode) -> Result<(), WeatherError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(WeatherError::RateLimitExceeded);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(WeatherError::Unauthorized(format!("HTTP {status}")));
    }
    if status.is_server_error() {
        return Err(WeatherError::ServiceUnavailable(format!("HTTP {status}")));
    }
    if !status.is_success() {
        return Err(WeatherError::RequestFailed(format!("HTTP {status}")));
    }
    Ok(())
}

/// Transport error without the request URL, which may carry an API key
fn request_failed(e: reqwest::Error) -> WeatherError {
    WeatherError::RequestFailed(e.without_url().to_string())
}

/// GET `url` with `query` and decode the body, keeping the raw JSON too
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    query: &[(&str, String)],
) -> Result<Payload<T>, WeatherError> {
    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(request_failed)?;

    check_status(response.status())?;

    let body = response.bytes().await.map_err(request_failed)?;
    let raw: serde_json::Value =
        serde_json::from_slice(&body).map_err(|e| WeatherError::ParseError(e.to_string()))?;
    let parsed = serde_json::from_value(raw.clone())
        .map_err(|e| WeatherError::ParseError(e.to_string()))?;

    debug!(url, "Decoded weather response");
    Ok(Payload { parsed, raw })
}
