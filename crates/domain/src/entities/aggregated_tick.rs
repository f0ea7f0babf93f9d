//! Aggregated tick - everything gathered in one aggregation cycle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Observation;

/// Observations from one cycle, ordered by source identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedTick {
    /// One entry per provider that answered in time
    pub sources: Vec<Observation>,
    /// Position of the tick within its session, starting at 1
    pub sequence: u64,
    /// When the tick was assembled
    pub recorded_at: DateTime<Utc>,
}

impl AggregatedTick {
    /// Assemble a tick, sorting observations by source
    #[must_use]
    pub fn new(sequence: u64, mut sources: Vec<Observation>) -> Self {
        sources.sort_by(|a, b| a.source.cmp(&b.source));
        Self {
            sources,
            sequence,
            recorded_at: Utc::now(),
        }
    }

    /// Whether no provider answered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Number of observations
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }
}
