//! Error types for the ingestion pipeline

use std::io;
use thiserror::Error;

/// Pipeline error type
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid push envelope: {0}")]
    InvalidEnvelope(String),

    #[error("Invalid message payload: {0}")]
    InvalidPayload(String),

    #[error("No records to land")]
    NoRecords,

    #[error("Invalid record at line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },

    #[error("Invalid object name: {0}")]
    InvalidObjectName(String),

    #[error("Object already exists: {0}")]
    ObjectExists(String),

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Object {uri} is not in bucket '{expected}'")]
    BucketMismatch { uri: String, expected: String },

    #[error("Invalid table reference: {0}")]
    InvalidTableRef(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Statistics API key is not configured (set PITCHFLOW_API_KEY)")]
    MissingApiKey,

    #[error("Statistics API returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PipelineError>;
