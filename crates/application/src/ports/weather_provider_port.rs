//! Weather provider port
//!
//! One implementation per live weather source. Each adapter turns the
//! provider's native response into the universal [`Observation`].

use async_trait::async_trait;
use domain::entities::{Location, Observation};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for a single live weather source
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherProviderPort: Send + Sync {
    /// Stable identifier written into `Observation::source`
    fn source(&self) -> &'static str;

    /// Fetch current conditions for a location
    ///
    /// Transport errors and non-success statuses are reported as
    /// `ApplicationError::ProviderUnavailable`, undecodable bodies as
    /// `ApplicationError::MalformedResponse`.
    async fn fetch(&self, location: &Location) -> Result<Observation, ApplicationError>;
}
