//! Block Transformer - type conversions with a model-backed fallback
//!
//! Converts a block's content from one type to another. Well-understood
//! pairs (list↔table, paragraph↔heading, paragraph↔code, ...) use the
//! pure rules in [`rules`]; any other pair falls back to the language
//! model, degrading to a text-carrying shape when the model is
//! unreachable or replies with garbage. A transform never produces an
//! invalid block and never changes the block's id.

mod error;
mod language;
mod rules;

pub use error::*;
pub use language::detect_language;

use ai_adapter::LanguageModelAdapter;
use block_model::{Block, BlockContent, BlockType, CodeContent};
use std::sync::Arc;
use tracing::warn;

/// Converts blocks between types. Construct one per document session and
/// inject it into the engine; it holds no document state.
#[derive(Default)]
pub struct BlockTransformer {
    adapter: Option<Arc<dyn LanguageModelAdapter>>,
}

impl BlockTransformer {
    /// A transformer with no model fallback - unmapped pairs degrade to
    /// a text-carrying shape for the target type
    pub fn new() -> Self {
        Self { adapter: None }
    }

    /// A transformer that asks the language model for unmapped pairs
    pub fn with_adapter(adapter: Arc<dyn LanguageModelAdapter>) -> Self {
        Self {
            adapter: Some(adapter),
        }
    }

    /// Convert `block` to `target`, preserving its id. Specific-pair
    /// rules resolve immediately; only the generic fallback awaits the
    /// adapter. Transforming to the block's own type is a no-op clone.
    pub async fn transform(&self, block: &Block, target: BlockType) -> Result<Block> {
        if block.block_type == target {
            return Ok(block.clone());
        }

        if let Some(rule) = rules::specific_rule(block.block_type, target) {
            return rule(block, target);
        }

        self.generic_transform(block, target).await
    }

    async fn generic_transform(&self, block: &Block, target: BlockType) -> Result<Block> {
        let source_text = block.plain_text();

        let reply = match &self.adapter {
            Some(adapter) => match adapter.transform_content(&source_text, target.as_str()).await {
                Ok(reply) => Some(reply),
                Err(err) => {
                    warn!(error = %err, target = %target, "model transform failed, degrading");
                    None
                }
            },
            None => None,
        };

        let content = match reply {
            Some(reply) if !reply.trim().is_empty() => parse_model_reply(target, &reply),
            _ => BlockContent::from_text(target, &source_text),
        };

        Ok(block.retyped(target, content)?)
    }
}

/// Parse the model's plain-text reply into the target type's shape.
/// Tabular targets reuse the delimiter parsing from the rule set.
fn parse_model_reply(target: BlockType, reply: &str) -> BlockContent {
    match target {
        BlockType::Table | BlockType::Database => {
            let lines: Vec<String> = reply
                .lines()
                .map(rules::strip_list_marker)
                .filter(|line| !line.is_empty())
                .collect();
            if lines.is_empty() {
                BlockContent::default_for(target)
            } else {
                BlockContent::Table(rules::parse_delimited_table(&lines))
            }
        }
        BlockType::Code => BlockContent::Code(CodeContent::new(reply, detect_language(reply))),
        _ => BlockContent::text(reply),
    }
}
