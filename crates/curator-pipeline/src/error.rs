//! Error types for the Pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that stop a whole run
///
/// Per-document problems never surface here; they become
/// [`crate::DocumentOutcome::Failed`].
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid pipeline configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Source directory missing
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),

    /// Ledger read or write failed
    #[error("Ledger error: {0}")]
    Ledger(#[from] curator_ledger::LedgerError),

    /// Article manifest could not be parsed
    #[error("Invalid article manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
