//! Mapping from weather client errors to application errors

use application::error::ApplicationError;
use integration_weather::WeatherError;

/// Map a weather client error for the named source
///
/// Body problems become `MalformedResponse`; everything else the provider
/// did or failed to do becomes `ProviderUnavailable`.
pub fn map_weather_error(source: &str, err: &WeatherError) -> ApplicationError {
    if err.is_decode_error() {
        ApplicationError::MalformedResponse(format!("{source}: {err}"))
    } else {
        ApplicationError::ProviderUnavailable(format!("{source}: {err}"))
    }
}

/// Map a client construction failure
pub fn map_client_init_error(source: &str, err: &WeatherError) -> ApplicationError {
    ApplicationError::Configuration(format!("{source} client: {err}"))
}

/// Truncate a provider reading to a whole number, as the wire format expects
#[allow(clippy::cast_possible_truncation)]
pub fn truncate_reading(value: f64) -> i32 {
    // `as` saturates at the i32 bounds and maps NaN to zero
    value.trunc() as i32
}
