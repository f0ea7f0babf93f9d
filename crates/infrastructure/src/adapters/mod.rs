//! Infrastructure adapters
//!
//! Adapters connect application ports to the weather clients.

mod archive_adapter;
mod error;
mod open_meteo_provider;
mod openweathermap_provider;
mod registry;

pub use archive_adapter::OpenMeteoArchiveAdapter;
pub use error::map_weather_error;
pub use open_meteo_provider::{OPEN_METEO_SOURCE, OpenMeteoProvider};
pub use openweathermap_provider::{OPENWEATHERMAP_SOURCE, OpenWeatherMapProvider};
pub use registry::{build_archive, build_providers};
