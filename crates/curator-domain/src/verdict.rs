//! Classification outcomes

use serde::{Deserialize, Serialize};

/// Outcome of classifying one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Verdict {
    /// One of the configured categories
    Category(String),

    /// Failed a disqualification rule, too short, or an unrecognized answer
    Irrelevant,

    /// Inference failed after every retry; never stored or recorded
    Error(String),
}

impl Verdict {
    /// The category name, if any
    pub fn category(&self) -> Option<&str> {
        match self {
            Verdict::Category(name) => Some(name),
            _ => None,
        }
    }

    /// True for [`Verdict::Irrelevant`]
    pub fn is_irrelevant(&self) -> bool {
        matches!(self, Verdict::Irrelevant)
    }

    /// True for [`Verdict::Error`]
    pub fn is_error(&self) -> bool {
        matches!(self, Verdict::Error(_))
    }
}

/// Verdict plus the model output it was derived from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Final verdict
    pub verdict: Verdict,

    /// Raw model answer, absent when no call was made or every call failed
    pub raw_output: Option<String>,
}

impl ClassificationResult {
    /// Irrelevant without a model call
    pub fn short_circuit() -> Self {
        Self {
            verdict: Verdict::Irrelevant,
            raw_output: None,
        }
    }

    /// Error after exhausting retries
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Error(reason.into()),
            raw_output: None,
        }
    }
}
