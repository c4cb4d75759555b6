//! Feedback generator - change-sets and errors to human-readable messages
//!
//! The deterministic templates are the contract: they need no adapter
//! and are what tests assert against. The adapter-phrased variant is
//! cosmetic and falls back to the template on any failure.

use crate::{BlockChange, ChangeKind, CommandAction, ParsedCommand};
use ai_adapter::LanguageModelAdapter;
use block_model::BlockType;
use std::sync::Arc;
use tracing::warn;

/// Formats execution outcomes for the user
#[derive(Default)]
pub struct FeedbackGenerator {
    adapter: Option<Arc<dyn LanguageModelAdapter>>,
}

impl FeedbackGenerator {
    /// Deterministic formatting only
    pub fn new() -> Self {
        Self { adapter: None }
    }

    /// Also try the language model for friendlier phrasing
    pub fn with_adapter(adapter: Arc<dyn LanguageModelAdapter>) -> Self {
        Self {
            adapter: Some(adapter),
        }
    }

    /// Describe a committed change-set
    pub fn describe_success(&self, command: &ParsedCommand, changes: &[BlockChange]) -> String {
        let count = |kind: ChangeKind| changes.iter().filter(|c| c.kind == kind).count();

        match command.action {
            CommandAction::Create => {
                let block_type = changes
                    .iter()
                    .find(|c| c.kind == ChangeKind::Create)
                    .and_then(|c| c.new_state.as_ref())
                    .map(|b| b.block_type)
                    .unwrap_or(BlockType::Paragraph);
                format!("Added a new {} block", block_type)
            }
            CommandAction::Delete => format!("Removed {} block(s)", count(ChangeKind::Delete)),
            CommandAction::Edit => format!("Updated {} block(s)", count(ChangeKind::Update)),
            CommandAction::Move => format!("Moved {} block(s)", count(ChangeKind::Move)),
            CommandAction::Transform => {
                let target = command
                    .parameters
                    .new_type
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "the new type".to_string());
                format!("Transformed {} block(s) to {}", count(ChangeKind::Transform), target)
            }
            CommandAction::Duplicate => format!("Created {} duplicate(s)", count(ChangeKind::Create)),
            CommandAction::Merge => format!("Merged {} blocks into one", count(ChangeKind::Delete) + 1),
            CommandAction::Split => format!("Split block into {} parts", count(ChangeKind::Create) + 1),
            CommandAction::Style => "Applied style changes".to_string(),
        }
    }

    /// Describe a failure; always non-empty
    pub fn describe_error(&self, command: &ParsedCommand, error: &str) -> String {
        format!("Could not {}: {}", command.action, error)
    }

    /// Adapter-phrased success message, falling back to the
    /// deterministic template when the adapter is missing or fails
    pub async fn describe_success_friendly(
        &self,
        command: &ParsedCommand,
        changes: &[BlockChange],
    ) -> String {
        let fallback = self.describe_success(command, changes);
        if let Some(adapter) = &self.adapter {
            match adapter.transform_content(&fallback, "status message").await {
                Ok(message) if !message.trim().is_empty() => return message,
                Ok(_) => {}
                Err(err) => warn!(error = %err, "feedback phrasing failed, using template"),
            }
        }
        fallback
    }
}
