//! Block - the atomic content unit of a document

use crate::{BlockContent, BlockId, BlockMetadata, BlockModelError, BlockType, CodeContent, Result, TableContent};
use serde::{Deserialize, Serialize};

/// An atomic content unit in a document: a stable id, a type, a payload
/// whose shape matches the type, and timestamps.
///
/// The id is immutable once assigned; duplicating a block goes through
/// [`Block::with_fresh_identity`], which is the only way to get a copy
/// under a new id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    id: BlockId,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub content: BlockContent,
    pub metadata: BlockMetadata,
}

impl Block {
    /// Create a block, coercing the content into the shape the type
    /// expects if the caller supplied a mismatched payload
    pub fn new(block_type: BlockType, content: BlockContent) -> Self {
        let content = if content.matches(block_type) {
            content
        } else {
            BlockContent::from_text(block_type, &content.plain_text())
        };
        Self {
            id: BlockId::new(),
            block_type,
            content,
            metadata: BlockMetadata::now(),
        }
    }

    /// Create an empty block of the given type with its minimum valid content
    pub fn empty(block_type: BlockType) -> Self {
        Self::new(block_type, BlockContent::default_for(block_type))
    }

    /// Create a text-like block from plain text
    pub fn text_block(block_type: BlockType, text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(block_type, BlockContent::from_text(block_type, &text))
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::text_block(BlockType::Paragraph, text)
    }

    pub fn heading1(text: impl Into<String>) -> Self {
        Self::text_block(BlockType::Heading1, text)
    }

    pub fn quote(text: impl Into<String>) -> Self {
        Self::text_block(BlockType::Quote, text)
    }

    pub fn bullet_list(text: impl Into<String>) -> Self {
        Self::text_block(BlockType::BulletList, text)
    }

    pub fn code(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self::new(BlockType::Code, BlockContent::Code(CodeContent::new(code, language)))
    }

    pub fn table(content: TableContent) -> Self {
        Self::new(BlockType::Table, BlockContent::Table(content))
    }

    pub fn divider() -> Self {
        Self::empty(BlockType::Divider)
    }

    /// The stable block id
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Rebuild this block (same id) with a new type and matching content.
    /// Fails if the content shape is wrong for the type - transformers
    /// construct payloads explicitly and must get this right.
    pub fn retyped(&self, block_type: BlockType, content: BlockContent) -> Result<Block> {
        if !content.matches(block_type) {
            return Err(BlockModelError::ContentMismatch { block_type });
        }
        let mut metadata = self.metadata.clone();
        metadata.touch();
        Ok(Block {
            id: self.id,
            block_type,
            content,
            metadata,
        })
    }

    /// Replace the content from plain text, coerced to this block's type,
    /// refreshing the modification timestamp. Code blocks keep their
    /// language.
    pub fn set_text_content(&mut self, text: &str) {
        self.content = match (&self.content, self.block_type) {
            (BlockContent::Code(existing), BlockType::Code) => {
                BlockContent::Code(CodeContent::new(text, existing.language.clone()))
            }
            _ => BlockContent::from_text(self.block_type, text),
        };
        self.metadata.touch();
    }

    /// Deep copy under a new id with fresh timestamps (for duplication)
    pub fn with_fresh_identity(&self) -> Block {
        Block {
            id: BlockId::new(),
            block_type: self.block_type,
            content: self.content.clone(),
            metadata: BlockMetadata::now(),
        }
    }

    /// Lossy plain-text view of the content
    pub fn plain_text(&self) -> String {
        self.content.plain_text()
    }

    /// Whether type and content shape agree
    pub fn is_consistent(&self) -> bool {
        self.content.matches(self.block_type)
    }
}
