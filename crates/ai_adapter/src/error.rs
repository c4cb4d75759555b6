//! Error types for adapter calls

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("Language model unreachable: {0}")]
    Unreachable(String),

    #[error("Language model call timed out")]
    Timeout,

    #[error("Language model returned malformed output: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, AdapterError>;
