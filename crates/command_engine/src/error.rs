//! Error types for the command layer

use crate::CommandAction;
use thiserror::Error;

/// Parser-level failures. These throw - callers surface them to the
/// user as a "please rephrase" message.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Adapter(#[from] ai_adapter::AdapterError),

    #[error("Could not parse command: {0}")]
    Unparsable(String),
}

/// Handler-level failures. The engine boundary converts these into a
/// failed `ExecutionResult`; they never escape `execute`.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The target reference resolved to zero blocks
    #[error("No blocks to {action}")]
    EmptyTarget { action: &'static str },

    /// A required parameter is missing or unusable
    #[error("{0}")]
    Validation(String),

    #[error("Unsupported action: {0}")]
    Unsupported(CommandAction),

    #[error(transparent)]
    Transform(#[from] block_transform::TransformError),

    #[error(transparent)]
    Model(#[from] block_model::BlockModelError),
}
