//! Error types for schema inference

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Schema inference error type
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("CSV file not found at {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Error reading CSV file {}: {source}", path.display())]
    InputRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Error reading CSV file {}: line {line} has {found} fields, expected {expected}", path.display())]
    MalformedRow {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchemaError {
    /// True when the input file does not exist (as opposed to being unreadable).
    pub fn is_not_found(&self) -> bool {
        matches!(self, SchemaError::InputNotFound { .. })
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SchemaError>;
