//! Per-document outcomes and run summaries

use curator_domain::LedgerRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// What happened to one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DocumentOutcome {
    /// Stored in a category folder and ready for the ledger
    Recorded {
        /// The new ledger row
        record: LedgerRecord,
        /// Where the document was placed
        path: PathBuf,
    },

    /// Classified irrelevant; nothing stored
    Irrelevant {
        /// Whether the on-disk source was deleted
        source_removed: bool,
    },

    /// A file with this name is already in the category folder
    AlreadyStored {
        /// The existing file
        path: PathBuf,
    },

    /// No text after extraction; not classified
    Empty,

    /// Classification or placement failed; nothing stored or deleted
    Failed {
        /// Failure description
        reason: String,
    },
}

impl DocumentOutcome {
    /// The ledger row, for recorded documents
    pub fn record(&self) -> Option<&LedgerRecord> {
        match self {
            DocumentOutcome::Recorded { record, .. } => Some(record),
            _ => None,
        }
    }

    /// Short label for logs and tables
    pub fn label(&self) -> String {
        match self {
            DocumentOutcome::Recorded { record, .. } => record.category.clone(),
            DocumentOutcome::Irrelevant { .. } => "irrelevant".to_string(),
            DocumentOutcome::AlreadyStored { .. } => "already stored".to_string(),
            DocumentOutcome::Empty => "empty".to_string(),
            DocumentOutcome::Failed { .. } => "failed".to_string(),
        }
    }
}

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Documents in the run
    pub total: usize,

    /// Documents handled before the run ended
    pub handled: usize,

    /// Documents stored and recorded
    pub recorded: usize,

    /// Documents classified irrelevant
    pub irrelevant: usize,

    /// Irrelevant sources deleted
    pub sources_removed: usize,

    /// Documents skipped because they were already stored
    pub already_stored: usize,

    /// Documents with no text
    pub empty: usize,

    /// Documents that failed
    pub failed: usize,

    /// Recorded documents per category
    pub per_category: BTreeMap<String, usize>,

    /// Failure descriptions, by file name
    pub failures: Vec<(String, String)>,

    /// The run stopped on cancellation
    pub cancelled: bool,

    /// Ledger written at the end of the run
    pub ledger_path: Option<PathBuf>,

    /// Rows in the ledger after the run
    pub ledger_rows: Option<usize>,
}

impl RunSummary {
    /// Empty summary for a run over `total` documents
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Count one outcome
    pub fn record(&mut self, file_name: &str, outcome: &DocumentOutcome) {
        self.handled += 1;
        match outcome {
            DocumentOutcome::Recorded { record, .. } => {
                self.recorded += 1;
                *self.per_category.entry(record.category.clone()).or_insert(0) += 1;
            }
            DocumentOutcome::Irrelevant { source_removed } => {
                self.irrelevant += 1;
                if *source_removed {
                    self.sources_removed += 1;
                }
            }
            DocumentOutcome::AlreadyStored { .. } => self.already_stored += 1,
            DocumentOutcome::Empty => self.empty += 1,
            DocumentOutcome::Failed { reason } => {
                self.failed += 1;
                self.failures.push((file_name.to_string(), reason.clone()));
            }
        }
    }

    /// Percentage of documents handled
    pub fn progress(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.handled * 100) / self.total).min(100) as u8
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Classification Run Summary".to_string(),
            "==========================".to_string(),
            format!("Handled: {}/{}", self.handled, self.total),
            format!("Recorded: {}", self.recorded),
            format!("Irrelevant: {} ({} source(s) removed)", self.irrelevant, self.sources_removed),
            format!("Already stored: {}", self.already_stored),
            format!("Empty: {}", self.empty),
            format!("Failed: {}", self.failed),
        ];

        if !self.per_category.is_empty() {
            lines.push(String::new());
            lines.push("Recorded by category:".to_string());
            for (category, count) in &self.per_category {
                lines.push(format!("  {}: {}", category, count));
            }
        }

        if let (Some(path), Some(rows)) = (&self.ledger_path, self.ledger_rows) {
            lines.push(String::new());
            lines.push(format!("Ledger: {} ({} rows)", path.display(), rows));
        }

        if self.cancelled {
            lines.push(String::new());
            lines.push("Run cancelled before completion".to_string());
        }

        lines.join("\n")
    }
}

/// Result of [`crate::Pipeline::process_all`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Ledger rows for recorded documents, numbered consecutively from 1
    pub records: Vec<LedgerRecord>,

    /// Counters for the batch
    pub summary: RunSummary,
}
