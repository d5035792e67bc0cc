//! Curator Domain Layer
//!
//! Core vocabulary shared by every Curator crate: the classification policy a
//! run is configured with, the documents it processes, the verdicts the
//! classifier produces and the ledger rows a successful run leaves behind.
//!
//! ## Key Concepts
//!
//! - **ClassificationPolicy**: role, ordered disqualification rules, categories and examples
//! - **CategorySet**: the closed set of labels a model answer may resolve to
//! - **Verdict**: a category, "irrelevant", or an error that blocks storage
//! - **LedgerRecord**: one row of the persistent summary ledger
//!
//! ## Architecture
//!
//! This crate holds no I/O. Infrastructure (inference endpoints, the ledger
//! file, storage folders) lives in other crates and talks to the domain
//! through the [`traits::ChatProvider`] boundary and the plain data types here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod policy;
pub mod record;
pub mod traits;
pub mod verdict;

// Re-exports for convenience
pub use document::{normalize_for_matching, title_from_file_name, ArticleInfo, Document};
pub use policy::{CategoryDefinition, CategorySet, ClassificationPolicy, PolicyError, PolicyExample};
pub use record::{LedgerRecord, LEDGER_HEADERS};
pub use verdict::{ClassificationResult, Verdict};
