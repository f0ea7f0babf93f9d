//! Provider registration from configuration

use std::sync::Arc;

use application::{
    error::ApplicationError,
    ports::{ArchivePort, WeatherProviderPort},
};
use tracing::{info, warn};

use super::{OpenMeteoArchiveAdapter, OpenMeteoProvider, OpenWeatherMapProvider};
use crate::config::WeatherAppConfig;

/// Live providers enabled by the configuration
///
/// Open-Meteo is always registered. OpenWeatherMap needs an API key and is
/// skipped without one.
pub fn build_providers(
    config: &WeatherAppConfig,
) -> Result<Vec<Arc<dyn WeatherProviderPort>>, ApplicationError> {
    let mut providers: Vec<Arc<dyn WeatherProviderPort>> =
        vec![Arc::new(OpenMeteoProvider::new(config.open_meteo())?)];

    match config.openweathermap() {
        Some(owm) => providers.push(Arc::new(OpenWeatherMapProvider::new(owm)?)),
        None => warn!("No OpenWeatherMap API key configured, provider disabled"),
    }

    let sources: Vec<&str> = providers.iter().map(|p| p.source()).collect();
    info!(?sources, "Weather providers registered");
    Ok(providers)
}

/// Archive used to build hourly baselines
pub fn build_archive(config: &WeatherAppConfig) -> Result<Arc<dyn ArchivePort>, ApplicationError> {
    Ok(Arc::new(OpenMeteoArchiveAdapter::new(config.open_meteo())?))
}
