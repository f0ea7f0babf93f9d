//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod archive_port;
mod database_health_port;
mod location_store;
mod session_store;
mod tick_sink;
mod weather_provider_port;

#[cfg(test)]
pub use archive_port::MockArchivePort;
pub use archive_port::ArchivePort;
#[cfg(test)]
pub use database_health_port::MockDatabaseHealthPort;
pub use database_health_port::{DatabaseHealth, DatabaseHealthPort};
#[cfg(test)]
pub use location_store::MockLocationStore;
pub use location_store::LocationStore;
#[cfg(test)]
pub use session_store::MockSessionStore;
pub use session_store::SessionStore;
#[cfg(test)]
pub use tick_sink::MockTickSink;
pub use tick_sink::TickSink;
#[cfg(test)]
pub use weather_provider_port::MockWeatherProviderPort;
pub use weather_provider_port::WeatherProviderPort;
