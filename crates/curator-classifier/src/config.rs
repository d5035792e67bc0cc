//! Configuration for the Classifier

use crate::error::ConfigError;
use curator_domain::traits::ProviderSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Inference settings for the classifier
///
/// Field names accept the legacy spellings used by older configuration
/// files (`ollama_url`, `timeout`, `num_ctx`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Base URL of the inference endpoint
    #[serde(alias = "ollama_url", default = "default_endpoint_url")]
    pub endpoint_url: String,

    /// Model identifier
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Sampling temperature, 0.0 to 2.0
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Per-call timeout (seconds)
    #[serde(alias = "timeout", default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Total inference attempts per document
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Characters of extracted text sent to the model
    #[serde(default = "default_max_summary_length")]
    pub max_summary_length: usize,

    /// Context window size in tokens
    #[serde(alias = "num_ctx", default = "default_context_window")]
    pub context_window: u32,

    /// Texts shorter than this (in characters) are irrelevant without a call
    #[serde(default = "default_min_text_length")]
    pub min_text_length: usize,

    /// Pause between failed attempts (seconds)
    #[serde(default = "default_retry_delay_seconds")]
    pub retry_delay_seconds: u64,
}

fn default_endpoint_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model_id() -> String {
    "qwen3:8b".to_string()
}

fn default_temperature() -> f64 {
    0.3
}

fn default_timeout_seconds() -> u64 {
    80
}

fn default_max_retries() -> u32 {
    3
}

fn default_max_summary_length() -> usize {
    600
}

fn default_context_window() -> u32 {
    5120
}

fn default_min_text_length() -> usize {
    150
}

fn default_retry_delay_seconds() -> u64 {
    2
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
            model_id: default_model_id(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout_seconds(),
            max_retries: default_max_retries(),
            max_summary_length: default_max_summary_length(),
            context_window: default_context_window(),
            min_text_length: default_min_text_length(),
            retry_delay_seconds: default_retry_delay_seconds(),
        }
    }
}

impl InferenceConfig {
    /// Per-call timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Connection settings for the provider
    pub fn provider_settings(&self) -> ProviderSettings {
        ProviderSettings {
            endpoint: self.endpoint_url.trim().to_string(),
            model: self.model_id.trim().to_string(),
            timeout: self.timeout(),
        }
    }

    /// Delay between attempts as a Duration
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_seconds)
    }

    /// Number of attempts actually made; zero is treated as one
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Validate the configuration
    ///
    /// The first offending field is reported.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.endpoint_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "endpoint_url",
                "must start with http:// or https://",
            ));
        }
        if self.model_id.trim().is_empty() {
            return Err(ConfigError::invalid("model_id", "must not be empty"));
        }
        if !self.temperature.is_finite() || !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::invalid(
                "temperature",
                format!("must be between 0 and 2 (got {})", self.temperature),
            ));
        }
        if self.timeout_seconds < 1 {
            return Err(ConfigError::invalid("timeout_seconds", "must be at least 1"));
        }
        if self.max_summary_length < 100 {
            return Err(ConfigError::invalid(
                "max_summary_length",
                format!("must be at least 100 (got {})", self.max_summary_length),
            ));
        }
        if self.context_window < 512 {
            return Err(ConfigError::invalid(
                "context_window",
                format!("must be at least 512 (got {})", self.context_window),
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = InferenceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_secs(80));
        assert_eq!(config.retry_delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_temperature_out_of_range() {
        let mut config = InferenceConfig::default();
        config.temperature = 2.5;
        assert_eq!(config.validate().unwrap_err().field(), Some("temperature"));

        config.temperature = -0.1;
        assert_eq!(config.validate().unwrap_err().field(), Some("temperature"));

        config.temperature = 2.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_field_specific_errors() {
        let mut config = InferenceConfig::default();
        config.timeout_seconds = 0;
        assert_eq!(config.validate().unwrap_err().field(), Some("timeout_seconds"));

        let mut config = InferenceConfig::default();
        config.max_summary_length = 99;
        assert_eq!(config.validate().unwrap_err().field(), Some("max_summary_length"));

        let mut config = InferenceConfig::default();
        config.context_window = 511;
        assert_eq!(config.validate().unwrap_err().field(), Some("context_window"));

        let mut config = InferenceConfig::default();
        config.endpoint_url = "localhost:11434".to_string();
        assert_eq!(config.validate().unwrap_err().field(), Some("endpoint_url"));
    }

    #[test]
    fn test_zero_retries_still_attempts_once() {
        let mut config = InferenceConfig::default();
        config.max_retries = 0;
        assert!(config.validate().is_ok());
        assert_eq!(config.attempts(), 1);
    }

    #[test]
    fn test_legacy_field_names() {
        let config = InferenceConfig::from_toml(
            r#"
            ollama_url = "http://gpu-box:11434"
            timeout = 30
            num_ctx = 4096
            "#,
        )
        .unwrap();
        assert_eq!(config.endpoint_url, "http://gpu-box:11434");
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.context_window, 4096);
        assert_eq!(config.model_id, "qwen3:8b");
    }

    #[test]
    fn test_negative_retries_fail_to_parse() {
        let result = InferenceConfig::from_toml("max_retries = -1");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = InferenceConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = InferenceConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}
