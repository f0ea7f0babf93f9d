//! Session storage port
//!
//! Sessions are append-only. Each append is durable before the tick is
//! handed to the subscriber.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{
    entities::{AggregatedTick, WeatherSession},
    value_objects::{LocationId, SessionId},
};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for weather session persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Append a tick, creating the session on its first tick
    ///
    /// Fails if a tick with the same sequence is already stored.
    async fn append_tick(
        &self,
        session_id: &SessionId,
        location_id: &LocationId,
        tick: &AggregatedTick,
    ) -> Result<(), ApplicationError>;

    /// Load a session with all of its ticks
    async fn get(&self, id: &SessionId) -> Result<Option<WeatherSession>, ApplicationError>;

    /// Delete sessions last updated before `cutoff`, returning how many went
    async fn prune_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, ApplicationError>;
}
