//! Curator Deduplicator
//!
//! Reconciles duplicates that accumulate across repeated runs.
//!
//! # Storage
//!
//! Exports of the same article land as `A.md`, `A (2).md`, `A (3).md`. Within
//! each category folder only one file per base name survives: the
//! un-suffixed one when present, otherwise the lowest suffix.
//!
//! # Ledger
//!
//! Rows are grouped by (category, normalized title) and the row with the
//! earliest ingestion date is kept. The result goes to a new
//! `<stem>_cleaned.csv` file; the input ledger is never overwritten.
//!
//! # Examples
//!
//! ```no_run
//! use curator_dedup::{Deduplicator, DedupConfig};
//! use curator_ledger::Ledger;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dedup = Deduplicator::new(DedupConfig::default());
//! let report = dedup.dedupe_storage("library/核心案例库", &["运营操作类", "经营决策类"])?;
//! println!("{}", report.summary());
//!
//! let outcome = dedup.dedupe_ledger(&Ledger::new("library/核心案例库/资料汇总.csv"))?;
//! println!("{} -> {} rows", outcome.original_rows, outcome.kept_rows);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod ledger;
mod report;
mod storage;

pub use config::DedupConfig;
pub use error::{DedupError, Result};
pub use ledger::{cleaned_path, dedupe_records, normalize_title, parse_ledger_date, LedgerDedupOutcome};
pub use report::{FolderReport, StorageReport};
pub use storage::{split_version, Deduplicator};
