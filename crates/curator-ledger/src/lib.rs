//! Curator Ledger
//!
//! The ledger is the persistent summary of everything a run stored: one row
//! per classified document, kept in a CSV file that opens cleanly in
//! spreadsheet tools (UTF-8 with a byte-order mark).
//!
//! # Guarantees
//!
//! - Existing rows are preserved on append; new rows go after them
//! - Sequence numbers are rewritten densely as 1..N on every write
//! - Writes go through a temporary file and a rename
//!
//! Columns beyond the seven standard headers are not preserved.

#![warn(missing_docs)]

mod error;
mod ledger;

pub use error::{LedgerError, Result};
pub use ledger::{renumber, Ledger, DEFAULT_LEDGER_FILE_NAME};
