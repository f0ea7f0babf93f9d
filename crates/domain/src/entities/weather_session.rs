//! Weather session - the append-only log of one subscription

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AggregatedTick;
use crate::{
    errors::DomainError,
    value_objects::{LocationId, SessionId},
};

/// Ticks emitted to one subscriber, oldest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSession {
    /// Unique session identifier
    pub id: SessionId,
    /// Location the session streams
    pub location_id: LocationId,
    /// Emitted ticks in sequence order
    pub ticks: Vec<AggregatedTick>,
    /// When the session started
    pub created_at: DateTime<Utc>,
    /// When the last tick was appended
    pub updated_at: DateTime<Utc>,
}

impl WeatherSession {
    /// Create an empty session for a location
    #[must_use]
    pub fn new(id: SessionId, location_id: LocationId) -> Self {
        let now = Utc::now();
        Self {
            id,
            location_id,
            ticks: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sequence number the next tick must carry
    #[must_use]
    pub fn next_sequence(&self) -> u64 {
        self.ticks.last().map_or(1, |t| t.sequence + 1)
    }

    /// Append a tick
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the tick's sequence does not
    /// directly follow the last one.
    pub fn append(&mut self, tick: AggregatedTick) -> Result<(), DomainError> {
        let expected = self.next_sequence();
        if tick.sequence != expected {
            return Err(DomainError::ValidationError(format!(
                "session {} expected tick {expected}, got {}",
                self.id, tick.sequence
            )));
        }
        self.updated_at = tick.recorded_at;
        self.ticks.push(tick);
        Ok(())
    }

    pub fn tick_count(&self) -> usize {
        self.ticks.len()
    }

    pub fn last_tick(&self) -> Option<&AggregatedTick> {
        self.ticks.last()
    }
}
