//! Error types for the training pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LearnerError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LearnerError {
    fn from(err: serde_json::Error) -> Self {
        LearnerError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LearnerError>;
