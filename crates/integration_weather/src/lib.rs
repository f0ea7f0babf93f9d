//! Weather provider integration
//!
//! HTTP clients for the Open-Meteo forecast and archive APIs
//! (<https://open-meteo.com>) and the OpenWeatherMap current weather API
//! (<https://openweathermap.org/current>). Responses are returned both decoded
//! and as raw JSON.

mod client;
mod models;
pub mod open_meteo;
pub mod openweathermap;

pub use client::WeatherError;
pub use models::{
    OpenMeteoArchiveResponse, OpenMeteoCurrent, OpenMeteoCurrentResponse, OpenMeteoHourly,
    OpenWeatherMapMain, OpenWeatherMapResponse, Payload,
};
pub use open_meteo::{CURRENT_VARIABLES, OpenMeteoClient, OpenMeteoConfig};
pub use openweathermap::{OpenWeatherMapClient, OpenWeatherMapConfig};
