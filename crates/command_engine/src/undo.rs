//! Undo manager - bounded history of committed transactions
//!
//! One undo manager per open document; the engine that owns it is the
//! only mutator. There is no redo at this layer - redo, if offered,
//! belongs to the UI-facing wrapper.

use crate::Transaction;
use block_model::Block;
use tracing::debug;

/// Default maximum number of transactions kept per document
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Bounded stack of committed transactions, oldest evicted first
pub struct UndoManager {
    stack: Vec<Transaction>,
    max_entries: usize,
}

impl UndoManager {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(max_entries: usize) -> Self {
        Self {
            stack: Vec::new(),
            max_entries,
        }
    }

    /// Record a committed transaction, evicting the oldest entries past
    /// the history limit
    pub fn commit(&mut self, transaction: Transaction) {
        debug!(id = %transaction.id, changes = transaction.changes.len(), "committing transaction");
        self.stack.push(transaction);
        while self.stack.len() > self.max_entries {
            self.stack.remove(0);
        }
    }

    /// Pop the most recent transaction and return its pre-transaction
    /// snapshot verbatim; `None` when there is nothing to undo
    pub fn undo(&mut self) -> Option<Vec<Block>> {
        self.stack.pop().map(|tx| tx.original_blocks)
    }

    /// Drop all history (e.g. when switching documents)
    pub fn clear(&mut self) {
        self.stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new()
    }
}
