//! Error types for the Deduplicator

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for dedup operations
pub type Result<T> = std::result::Result<T, DedupError>;

/// Errors that abort a dedup pass
///
/// Problems with a single file or subfolder are logged and recorded in the
/// report instead.
#[derive(Error, Debug)]
pub enum DedupError {
    /// The storage root does not exist
    #[error("Folder not found: {0}")]
    FolderNotFound(PathBuf),

    /// The ledger to clean does not exist
    #[error("Ledger not found: {0}")]
    LedgerNotFound(PathBuf),

    /// Ledger read or write failed
    #[error("Ledger error: {0}")]
    Ledger(#[from] curator_ledger::LedgerError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
