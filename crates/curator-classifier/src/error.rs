//! Error types for the Classifier

use curator_domain::PolicyError;
use thiserror::Error;

/// Invalid inference configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A field is out of range
    #[error("{field}: {message}")]
    InvalidField {
        /// Field name as written in the configuration file
        field: &'static str,
        /// What is wrong with it
        message: String,
    },

    /// Configuration text could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        ConfigError::InvalidField {
            field,
            message: message.into(),
        }
    }

    /// The offending field, if this is a range error
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ConfigError::InvalidField { field, .. } => Some(field),
            ConfigError::Parse(_) => None,
        }
    }
}

/// Errors that prevent a classifier from being built or reloaded
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// Inference configuration rejected
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Classification policy rejected
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    /// The provider could not switch to the new connection settings
    #[error("Provider error: {0}")]
    Provider(String),
}
