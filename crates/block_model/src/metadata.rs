//! Block metadata - timestamps and type-specific extras

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Creation/modification timestamps plus an open-ended map for
/// type-specific fields (e.g. a database view mode, a chart axis label)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockMetadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BlockMetadata {
    /// Fresh metadata stamped with the current time
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            extra: serde_json::Map::new(),
        }
    }

    /// Refresh the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for BlockMetadata {
    fn default() -> Self {
        Self::now()
    }
}
