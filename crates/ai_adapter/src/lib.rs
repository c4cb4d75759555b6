//! Language-model adapter boundary
//!
//! The command parser and the block transformer both delegate language
//! understanding to an external model behind the [`LanguageModelAdapter`]
//! trait. The adapter is a boundary that can fail, time out, or be
//! unreachable; everything behind it returns untrusted raw shapes that
//! callers validate and coerce. Test doubles live in [`doubles`].

mod error;
mod raw;

pub mod doubles;

pub use error::*;
pub use raw::*;

use async_trait::async_trait;

/// The external language model, reduced to the two calls this system
/// needs: turn free text into a structured command, and reshape block
/// content for a target type.
#[async_trait]
pub trait LanguageModelAdapter: Send + Sync {
    /// Translate user text plus document context into a raw command
    async fn understand(&self, system_prompt: &str, user_text: &str) -> Result<RawCommand>;

    /// Reshape content for the named target type, returning plain text
    /// the caller parses into the target's content shape
    async fn transform_content(&self, content: &str, target_type: &str) -> Result<String>;
}
