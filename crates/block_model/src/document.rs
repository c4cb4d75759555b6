//! Document-level helpers over an ordered block list
//!
//! A document is an ordered `Vec<Block>` owned by the caller; order is
//! semantically meaningful (render order and positional references).
//! The engine never persists a document - these helpers only inspect.

use crate::{Block, BlockId, BlockModelError, Result};
use unicode_segmentation::UnicodeSegmentation;

/// How many graphemes of a block's content appear in a summary line
const SUMMARY_PREVIEW_LEN: usize = 60;

/// Index of the block with the given id, if present
pub fn index_of(blocks: &[Block], id: BlockId) -> Option<usize> {
    blocks.iter().position(|b| b.id() == id)
}

/// Borrow the block with the given id, if present
pub fn find(blocks: &[Block], id: BlockId) -> Option<&Block> {
    blocks.iter().find(|b| b.id() == id)
}

/// Borrow the block with the given id or fail with `BlockNotFound`
pub fn require(blocks: &[Block], id: BlockId) -> Result<&Block> {
    find(blocks, id).ok_or(BlockModelError::BlockNotFound(id))
}

/// Numbered one-line-per-block digest of the document, used as context
/// for the language-model adapter
pub fn summarize(blocks: &[Block]) -> String {
    blocks
        .iter()
        .enumerate()
        .map(|(i, block)| {
            format!(
                "{}. {}: \"{}\"",
                i + 1,
                block.block_type,
                preview(&block.plain_text())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whether every block's content shape agrees with its type
pub fn is_consistent(blocks: &[Block]) -> bool {
    blocks.iter().all(Block::is_consistent)
}

fn preview(text: &str) -> String {
    let flat = text.replace('\n', " ");
    let graphemes: Vec<&str> = flat.graphemes(true).collect();
    if graphemes.len() <= SUMMARY_PREVIEW_LEN {
        flat
    } else {
        let mut out: String = graphemes[..SUMMARY_PREVIEW_LEN].concat();
        out.push('…');
        out
    }
}
