//! Error types for block transformation

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Model(#[from] block_model::BlockModelError),
}

pub type Result<T> = std::result::Result<T, TransformError>;
