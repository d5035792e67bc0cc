//! Configuration for the Deduplicator

use serde::{Deserialize, Serialize};

/// Deduplication settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupConfig {
    /// Extension (without dot) of the files considered
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Report what would be removed without touching anything
    #[serde(default)]
    pub dry_run: bool,
}

fn default_extension() -> String {
    "md".to_string()
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            dry_run: false,
        }
    }
}

impl DedupConfig {
    /// Same settings with dry-run switched on or off
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
