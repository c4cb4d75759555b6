//! Target resolution - mapping a reference to concrete blocks
//!
//! Resolution is total: every reference maps to a (possibly empty) list
//! of blocks in document order. An empty result is a normal value, not
//! an error - action handlers convert it into a descriptive failure.

use crate::TargetReference;
use block_model::{document, Block, BlockId};

/// Selection state the resolver needs for `this`/`above`/`below`
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveContext {
    pub selected_block_id: Option<BlockId>,
    pub cursor_block_id: Option<BlockId>,
}

impl ResolveContext {
    /// No selection and no cursor
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_selection(selected: BlockId) -> Self {
        Self {
            selected_block_id: Some(selected),
            cursor_block_id: None,
        }
    }
}

/// Resolve a reference against the document, in document order
pub fn resolve(reference: &TargetReference, blocks: &[Block], ctx: &ResolveContext) -> Vec<Block> {
    match reference {
        TargetReference::This | TargetReference::Selected => anchor_index(blocks, ctx)
            .map(|i| vec![blocks[i].clone()])
            .unwrap_or_default(),
        TargetReference::All => blocks.to_vec(),
        TargetReference::First => blocks.first().cloned().into_iter().collect(),
        TargetReference::Last => blocks.last().cloned().into_iter().collect(),
        TargetReference::Above => anchor_index(blocks, ctx)
            .filter(|i| *i > 0)
            .map(|i| vec![blocks[i - 1].clone()])
            .unwrap_or_default(),
        TargetReference::Below => anchor_index(blocks, ctx)
            .filter(|i| i + 1 < blocks.len())
            .map(|i| vec![blocks[i + 1].clone()])
            .unwrap_or_default(),
        TargetReference::Position(n) => {
            // 1-based from the user's point of view
            if *n >= 1 && *n <= blocks.len() {
                vec![blocks[n - 1].clone()]
            } else {
                Vec::new()
            }
        }
        TargetReference::TypeIs(block_type) => blocks
            .iter()
            .filter(|b| b.block_type == *block_type)
            .cloned()
            .collect(),
        TargetReference::Content(needle) => {
            let needle = needle.to_lowercase();
            blocks
                .iter()
                .filter(|b| b.plain_text().to_lowercase().contains(&needle))
                .cloned()
                .collect()
        }
        TargetReference::Id(id) => document::find(blocks, *id).cloned().into_iter().collect(),
    }
}

/// Index of the selected block, falling back to the cursor block
fn anchor_index(blocks: &[Block], ctx: &ResolveContext) -> Option<usize> {
    ctx.selected_block_id
        .and_then(|id| document::index_of(blocks, id))
        .or_else(|| ctx.cursor_block_id.and_then(|id| document::index_of(blocks, id)))
}
