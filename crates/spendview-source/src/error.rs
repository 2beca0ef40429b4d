//! Error types for spendview-source

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Dataset file not found: {path}")]
    DatasetNotFound { path: String },

    #[error("Invalid dataset: {message}")]
    InvalidDataset { message: String },

    #[error("Unknown employee: {id}")]
    UnknownEmployee { id: String },

    #[error("Unknown transaction: {id}")]
    UnknownTransaction { id: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error")]
    IoError(#[from] std::io::Error),
}

/// Result type with SourceError
pub type SourceResult<T> = Result<T, SourceError>;
