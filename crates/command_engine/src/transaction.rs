//! Transactions and block change records
//!
//! A transaction is the atomic unit of one `execute` call: the ordered
//! change list plus a deep snapshot of the document taken before any
//! handler ran. Committed transactions live only inside the undo
//! manager; callers never see them.

use block_model::{Block, BlockId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a committed transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(Uuid);

impl TransactionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What happened to one block within a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeKind {
    Create,
    Update,
    Delete,
    Move,
    Transform,
}

/// The atomic record of one block's change. An ordered list of these
/// fully describes a transaction's effect and feeds the feedback
/// generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockChange {
    pub kind: ChangeKind,
    pub block_id: BlockId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_state: Option<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_state: Option<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

impl BlockChange {
    pub fn created(block: Block, position: usize) -> Self {
        Self {
            kind: ChangeKind::Create,
            block_id: block.id(),
            previous_state: None,
            new_state: Some(block),
            position: Some(position),
        }
    }

    pub fn updated(previous: Block, new: Block) -> Self {
        Self {
            kind: ChangeKind::Update,
            block_id: previous.id(),
            previous_state: Some(previous),
            new_state: Some(new),
            position: None,
        }
    }

    pub fn deleted(block: Block, position: usize) -> Self {
        Self {
            kind: ChangeKind::Delete,
            block_id: block.id(),
            previous_state: Some(block),
            new_state: None,
            position: Some(position),
        }
    }

    pub fn moved(block: Block, position: usize) -> Self {
        Self {
            kind: ChangeKind::Move,
            block_id: block.id(),
            previous_state: None,
            new_state: Some(block),
            position: Some(position),
        }
    }

    pub fn transformed(previous: Block, new: Block) -> Self {
        Self {
            kind: ChangeKind::Transform,
            block_id: previous.id(),
            previous_state: Some(previous),
            new_state: Some(new),
            position: None,
        }
    }
}

/// One committed `execute` call: its changes and the pre-transaction
/// document snapshot that undo restores verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub changes: Vec<BlockChange>,
    pub original_blocks: Vec<Block>,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn new(changes: Vec<BlockChange>, original_blocks: Vec<Block>) -> Self {
        Self {
            id: TransactionId::new(),
            changes,
            original_blocks,
            timestamp: Utc::now(),
        }
    }
}
