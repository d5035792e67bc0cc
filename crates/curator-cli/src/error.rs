//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Policy file rejected
    #[error("Policy error: {0}")]
    Policy(#[from] curator_domain::PolicyError),

    /// Classifier could not be built
    #[error("{0}")]
    Classifier(#[from] curator_classifier::ClassifierError),

    /// Inference provider could not be built
    #[error("Inference error: {0}")]
    Llm(#[from] curator_llm::LlmError),

    /// Pipeline run failed
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] curator_pipeline::PipelineError),

    /// Deduplication failed
    #[error("Dedup error: {0}")]
    Dedup(#[from] curator_dedup::DedupError),

    /// Ledger error
    #[error("Ledger error: {0}")]
    Ledger(#[from] curator_ledger::LedgerError),

    /// Background task failed to complete
    #[error("Worker task failed: {0}")]
    Task(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}
