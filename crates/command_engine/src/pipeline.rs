//! Command pipeline - the UI-facing wrapper over the whole flow
//!
//! parse → resolve → execute → record → describe. This layer owns the
//! user-facing policies the engine deliberately does not: surfacing
//! parse failures as "please rephrase" messages, refusing low-confidence
//! commands, and the minimum-one-block guard on delete.

use crate::{
    resolver, CommandAction, CommandParser, FeedbackGenerator, ManipulationEngine, ParseContext,
    ParsedCommand, ResolveContext,
};
use ai_adapter::LanguageModelAdapter;
use block_model::{Block, BlockId};
use block_transform::BlockTransformer;
use std::sync::Arc;
use tracing::{debug, info};

/// Commands scoring below this are sent back for clarification
pub const MIN_CONFIDENCE: f32 = 0.5;

/// What one pipeline run hands back to the caller: the (possibly
/// unchanged) block list and a message to show the user
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub blocks: Vec<Block>,
    pub message: String,
    pub success: bool,
    pub command: Option<ParsedCommand>,
}

/// One pipeline per open document. The caller persists the returned
/// block list; the pipeline never touches storage.
pub struct CommandPipeline {
    parser: CommandParser,
    engine: ManipulationEngine,
    feedback: FeedbackGenerator,
}

impl CommandPipeline {
    /// Wire a pipeline where parser, transformer fallback, and feedback
    /// all share one adapter
    pub fn new(adapter: Arc<dyn LanguageModelAdapter>) -> Self {
        Self {
            parser: CommandParser::new(adapter.clone()),
            engine: ManipulationEngine::new(BlockTransformer::with_adapter(adapter.clone())),
            feedback: FeedbackGenerator::with_adapter(adapter),
        }
    }

    /// Assemble from independently constructed components
    pub fn with_components(
        parser: CommandParser,
        engine: ManipulationEngine,
        feedback: FeedbackGenerator,
    ) -> Self {
        Self {
            parser,
            engine,
            feedback,
        }
    }

    /// Parse and execute one instruction against the document
    pub async fn run(
        &mut self,
        input: &str,
        blocks: &[Block],
        selected: Option<BlockId>,
    ) -> PipelineOutcome {
        let context = ParseContext {
            blocks,
            selected_block_id: selected,
        };
        let command = match self.parser.parse(input, &context).await {
            Ok(command) => command,
            Err(err) => {
                debug!(error = %err, "parse failed");
                return PipelineOutcome {
                    blocks: blocks.to_vec(),
                    message: "Sorry, I couldn't understand that. Please rephrase.".to_string(),
                    success: false,
                    command: None,
                };
            }
        };

        let ctx = ResolveContext {
            selected_block_id: selected,
            cursor_block_id: None,
        };
        self.execute(command, blocks, &ctx).await
    }

    /// Execute an already-parsed command, applying pipeline policies
    pub async fn execute(
        &mut self,
        command: ParsedCommand,
        blocks: &[Block],
        ctx: &ResolveContext,
    ) -> PipelineOutcome {
        if command.confidence < MIN_CONFIDENCE {
            return PipelineOutcome {
                blocks: blocks.to_vec(),
                message: format!(
                    "I'm not sure what \"{}\" should do. Could you rephrase?",
                    command.natural_language
                ),
                success: false,
                command: Some(command),
            };
        }

        // A document never drops to zero blocks; the engine's delete
        // handler itself does not enforce this
        if command.action == CommandAction::Delete
            && !blocks.is_empty()
            && targeted_count(&command, blocks, ctx) >= blocks.len()
        {
            return PipelineOutcome {
                blocks: blocks.to_vec(),
                message: "Cannot delete every block - a document needs at least one.".to_string(),
                success: false,
                command: Some(command),
            };
        }

        let result = self.engine.execute(&command, blocks, ctx).await;
        let message = if result.success {
            self.feedback.describe_success(&command, &result.changes)
        } else {
            self.feedback
                .describe_error(&command, result.error.as_deref().unwrap_or("unknown error"))
        };
        info!(action = %command.action, success = result.success, "command finished");

        PipelineOutcome {
            blocks: result.blocks,
            message,
            success: result.success,
            command: Some(command),
        }
    }

    /// Undo the last committed command on this document
    pub fn undo(&mut self, blocks: &[Block]) -> PipelineOutcome {
        match self.engine.undo() {
            Some(restored) => PipelineOutcome {
                blocks: restored,
                message: "Undid the last command".to_string(),
                success: true,
                command: None,
            },
            None => PipelineOutcome {
                blocks: blocks.to_vec(),
                message: "Nothing to undo".to_string(),
                success: false,
                command: None,
            },
        }
    }

    /// Drop history when the caller switches documents
    pub fn clear_history(&mut self) {
        self.engine.clear_history();
    }
}

fn targeted_count(command: &ParsedCommand, blocks: &[Block], ctx: &ResolveContext) -> usize {
    if command.target.block_ids.is_empty() {
        resolver::resolve(&command.target.reference, blocks, ctx).len()
    } else {
        blocks
            .iter()
            .filter(|b| command.target.block_ids.contains(&b.id()))
            .count()
    }
}
