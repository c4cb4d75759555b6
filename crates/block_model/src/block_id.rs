//! Block ID generation and management

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a block in a document.
/// Uses UUID v4 for globally unique, stable IDs that survive serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId(Uuid);

impl BlockId {
    /// Create a new random BlockId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a BlockId from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Create a BlockId from a string representation
    pub fn from_string(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for BlockId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<BlockId> for Uuid {
    fn from(id: BlockId) -> Self {
        id.0
    }
}
