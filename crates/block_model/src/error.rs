//! Error types for block model operations

use crate::{BlockId, BlockType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlockModelError {
    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("Content shape does not match block type {block_type}")]
    ContentMismatch { block_type: BlockType },
}

pub type Result<T> = std::result::Result<T, BlockModelError>;
