//! Error types for the ingestion, aggregation and model stages.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Input JSON path does not exist
    #[error("{0} does not exist, could not load events")]
    InputMissing(PathBuf),

    /// Predict invoked before a model artifact was written
    #[error("{0} does not exist, could not predict")]
    ModelMissing(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("artifact encoding error: {0}")]
    Encode(#[from] bincode::Error),

    /// Input parsed as JSON but is not an array of event objects
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Strict folding found two different values for a session-constant column
    #[error("session {session} has conflicting values for {column}")]
    SessionConflict { session: String, column: String },

    #[error("model error: {0}")]
    Model(String),

    #[error("feature width mismatch: expected {expected}, got {got}")]
    SchemaMismatch { expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
