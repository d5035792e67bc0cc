//! Error types for the Ledger

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while reading or writing a ledger
#[derive(Error, Debug)]
pub enum LedgerError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding or decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The file is not UTF-8 text
    #[error("Ledger {0} is not valid UTF-8")]
    InvalidEncoding(PathBuf),
}
