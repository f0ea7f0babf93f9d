//! Subscriber channel port

use async_trait::async_trait;
use domain::entities::AggregatedTick;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Where an aggregation loop delivers its ticks
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TickSink: Send + Sync {
    /// Deliver one tick; an error ends the loop with `DeliveryFailure`
    async fn emit(&self, tick: &AggregatedTick) -> Result<(), ApplicationError>;
}
