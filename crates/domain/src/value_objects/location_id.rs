//! Location identifier

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of a catalog location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(Uuid);

impl LocationId {
    /// Create a new random location ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a location ID from an existing UUID
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse a location ID from a string
    ///
    /// Surrounding whitespace and JSON string quotes are tolerated, since
    /// websocket clients commonly send the id as a JSON-encoded string.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        let trimmed = s.trim().trim_matches('"');
        Ok(Self(Uuid::parse_str(trimmed)?))
    }

    /// Get the underlying UUID
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for LocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for LocationId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}
