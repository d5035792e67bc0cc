//! Configuration for the Pipeline

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pipeline settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Group label written to every ledger row
    #[serde(default = "default_group_label")]
    pub group_label: String,

    /// Store category folders under `destination/<group_label>/`
    #[serde(default = "default_true")]
    pub nest_under_group: bool,

    /// Documents handled between cooldown pauses
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Length of each cooldown pause (seconds)
    #[serde(default = "default_cooldown_seconds")]
    pub cooldown_seconds: u64,

    /// Ledger file name inside the group folder
    #[serde(default = "default_ledger_file_name")]
    pub ledger_file_name: String,

    /// Extension (without dot) of source documents
    #[serde(default = "default_document_extension")]
    pub document_extension: String,

    /// Delete on-disk sources classified as irrelevant
    #[serde(default)]
    pub remove_irrelevant_sources: bool,
}

fn default_group_label() -> String {
    "核心案例库".to_string()
}

fn default_true() -> bool {
    true
}

fn default_batch_size() -> usize {
    20
}

fn default_cooldown_seconds() -> u64 {
    20
}

fn default_ledger_file_name() -> String {
    curator_ledger::DEFAULT_LEDGER_FILE_NAME.to_string()
}

fn default_document_extension() -> String {
    "md".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            group_label: default_group_label(),
            nest_under_group: true,
            batch_size: default_batch_size(),
            cooldown_seconds: default_cooldown_seconds(),
            ledger_file_name: default_ledger_file_name(),
            document_extension: default_document_extension(),
            remove_irrelevant_sources: false,
        }
    }
}

impl PipelineConfig {
    /// Cooldown as a Duration
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_seconds)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err("batch_size must be greater than 0".to_string());
        }
        if self.group_label.trim().is_empty() {
            return Err("group_label must not be empty".to_string());
        }
        if self.nest_under_group && has_separator(&self.group_label) {
            return Err("group_label must not contain path separators".to_string());
        }
        if self.ledger_file_name.trim().is_empty() || has_separator(&self.ledger_file_name) {
            return Err("ledger_file_name must be a plain file name".to_string());
        }
        if self.document_extension.is_empty() || self.document_extension.starts_with('.') {
            return Err("document_extension must be given without a leading dot".to_string());
        }
        Ok(())
    }
}

fn has_separator(value: &str) -> bool {
    value.contains('/') || value.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.batch_size, 20);
        assert_eq!(config.cooldown(), Duration::from_secs(20));
        assert_eq!(config.ledger_file_name, "资料汇总.csv");
    }

    #[test]
    fn test_invalid_values() {
        let mut config = PipelineConfig::default();
        config.batch_size = 0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.document_extension = ".md".to_string();
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.group_label = "a/b".to_string();
        assert!(config.validate().is_err());
        config.nest_under_group = false;
        assert!(config.validate().is_ok());
    }
}
