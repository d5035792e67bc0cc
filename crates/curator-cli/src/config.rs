//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use curator_classifier::InferenceConfig;
use curator_domain::ClassificationPolicy;
use curator_ledger::Ledger;
use curator_pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// CLI configuration, stored at `~/.curator/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Folders and policy location
    #[serde(default)]
    pub app: AppSettings,

    /// Inference endpoint and classifier limits
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Batch and storage settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Output settings
    #[serde(default)]
    pub settings: Settings,
}

/// Application folders and policy location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Where downloaded documents land; default source for `classify`
    #[serde(default = "default_output_folder")]
    pub output_folder: PathBuf,

    /// Library root holding the group folder
    #[serde(default = "default_classification_folder")]
    pub classification_folder: PathBuf,

    /// Group label; also the name of the folder under the library root
    #[serde(default = "default_group_label")]
    pub group_label: String,

    /// Run classification at all
    #[serde(default = "default_true")]
    pub enable_classification: bool,

    /// Policy file (JSON or TOML); the built-in policy when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_path: Option<PathBuf>,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".curator").join("config.toml"))
    }

    /// Load configuration from `path`, or defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Check every section; messages name the offending key.
    pub fn validate(&self) -> Result<()> {
        self.inference
            .validate()
            .map_err(|e| CliError::Config(format!("inference.{}", e)))?;
        self.pipeline_config()
            .validate()
            .map_err(|e| CliError::Config(format!("pipeline.{}", e)))?;
        if self.app.group_label.trim().is_empty() {
            return Err(CliError::Config(
                "app.group_label must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Change one value given as `section.field`.
    ///
    /// The value is parsed according to the current type of the field. The
    /// whole configuration is validated before anything changes.
    pub fn set_value(&mut self, key: &str, raw: &str) -> Result<()> {
        let (section, field) = key
            .split_once('.')
            .ok_or_else(|| CliError::InvalidInput(format!("expected section.field, got '{}'", key)))?;

        let mut root = match toml::Value::try_from(&*self)? {
            toml::Value::Table(table) => table,
            _ => return Err(CliError::Config("configuration is not a table".to_string())),
        };

        let table = root
            .get_mut(section)
            .and_then(|v| v.as_table_mut())
            .ok_or_else(|| CliError::InvalidInput(format!("unknown section '{}'", section)))?;

        let optional = OPTIONAL_KEYS.contains(&key);
        match (table.get(field).cloned(), optional) {
            (_, true) if raw.is_empty() => {
                table.remove(field);
            }
            (None, true) => {
                table.insert(field.to_string(), toml::Value::String(raw.to_string()));
            }
            (None, false) => {
                return Err(CliError::InvalidInput(format!("unknown key '{}'", key)));
            }
            (Some(existing), _) => {
                let value = parse_like(&existing, raw).ok_or_else(|| {
                    CliError::InvalidInput(format!("{}: cannot parse '{}'", key, raw))
                })?;
                table.insert(field.to_string(), value);
            }
        }

        let updated = toml::Value::Table(root)
            .try_into::<Config>()
            .map_err(|e| CliError::InvalidInput(format!("{}: {}", key, e)))?;
        updated.validate()?;

        *self = updated;
        Ok(())
    }

    /// Pipeline settings with the application group label applied.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            group_label: self.app.group_label.clone(),
            ..self.pipeline.clone()
        }
    }

    /// Library root: `dest` when given, else `app.classification_folder`.
    pub fn library_folder(&self, dest: Option<PathBuf>) -> PathBuf {
        dest.unwrap_or_else(|| self.app.classification_folder.clone())
    }

    /// Folder holding category folders and the ledger.
    pub fn group_folder(&self, library: &Path) -> PathBuf {
        if self.pipeline.nest_under_group {
            library.join(&self.app.group_label)
        } else {
            library.to_path_buf()
        }
    }

    /// Ledger inside the group folder.
    pub fn ledger(&self, library: &Path) -> Ledger {
        Ledger::new(
            self.group_folder(library)
                .join(&self.pipeline.ledger_file_name),
        )
    }

    /// Load the policy from `override_path`, `app.policy_path`, or the built-in default.
    pub fn load_policy(&self, override_path: Option<&Path>) -> Result<ClassificationPolicy> {
        let path = override_path.or(self.app.policy_path.as_deref());
        load_policy_file(path)
    }
}

const OPTIONAL_KEYS: [&str; 1] = ["app.policy_path"];

fn parse_like(existing: &toml::Value, raw: &str) -> Option<toml::Value> {
    match existing {
        toml::Value::String(_) => Some(toml::Value::String(raw.to_string())),
        toml::Value::Integer(_) => raw.trim().parse().ok().map(toml::Value::Integer),
        toml::Value::Float(_) => raw.trim().parse().ok().map(toml::Value::Float),
        toml::Value::Boolean(_) => raw.trim().parse().ok().map(toml::Value::Boolean),
        _ => None,
    }
}

/// Read a JSON or TOML policy file; missing files fall back to the built-in policy.
pub fn load_policy_file(path: Option<&Path>) -> Result<ClassificationPolicy> {
    let Some(path) = path else {
        debug!("No policy file configured, using built-in policy");
        return Ok(ClassificationPolicy::retail_default());
    };

    if !path.exists() {
        warn!(
            "Policy file {} not found, using built-in policy",
            path.display()
        );
        return Ok(ClassificationPolicy::retail_default());
    }

    let contents = fs::read_to_string(path)?;
    let policy = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => ClassificationPolicy::from_toml(&contents)?,
        _ => ClassificationPolicy::from_json(&contents)?,
    };
    policy.validate()?;

    info!(
        "Loaded policy from {} ({} categories)",
        path.display(),
        policy.categories.len()
    );
    Ok(policy)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppSettings::default(),
            inference: InferenceConfig::default(),
            pipeline: PipelineConfig::default(),
            settings: Settings::default(),
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            output_folder: default_output_folder(),
            classification_folder: default_classification_folder(),
            group_label: default_group_label(),
            enable_classification: true,
            policy_path: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_output_folder() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_classification_folder() -> PathBuf {
    PathBuf::from("library")
}

fn default_group_label() -> String {
    "核心案例库".to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.settings.color);
        assert_eq!(config.app.group_label, "核心案例库");
        assert_eq!(config.pipeline.batch_size, 20);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.app.policy_path = Some(PathBuf::from("policy.json"));
        config.inference.model_id = "qwen3:14b".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let loaded = Config::load(&dir.path().join("none.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_partial_file_and_legacy_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[inference]\nollama_url = \"http://gpu-box:11434\"\nnum_ctx = 8192\n\n[pipeline]\nbatch_size = 5\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.inference.endpoint_url, "http://gpu-box:11434");
        assert_eq!(config.inference.context_window, 8192);
        assert_eq!(config.inference.model_id, "qwen3:8b");
        assert_eq!(config.pipeline.batch_size, 5);
        assert_eq!(config.pipeline.cooldown_seconds, 20);
    }

    #[test]
    fn test_set_value_by_type() {
        let mut config = Config::default();
        config.set_value("inference.temperature", "0.5").unwrap();
        config.set_value("inference.max_retries", "5").unwrap();
        config.set_value("pipeline.remove_irrelevant_sources", "true").unwrap();
        config.set_value("settings.format", "json").unwrap();

        assert_eq!(config.inference.temperature, 0.5);
        assert_eq!(config.inference.max_retries, 5);
        assert!(config.pipeline.remove_irrelevant_sources);
        assert_eq!(config.settings.format, OutputFormat::Json);
    }

    #[test]
    fn test_set_value_rejects_out_of_range() {
        let mut config = Config::default();
        let err = config.set_value("inference.temperature", "3.0").unwrap_err();
        assert!(err.to_string().contains("temperature"));
        assert_eq!(config.inference.temperature, 0.3);

        let err = config.set_value("pipeline.batch_size", "0").unwrap_err();
        assert!(err.to_string().contains("batch_size"));
        assert_eq!(config.pipeline.batch_size, 20);
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let mut config = Config::default();
        assert!(config.set_value("inference.nope", "1").is_err());
        assert!(config.set_value("nosection.x", "1").is_err());
        assert!(config.set_value("temperature", "1").is_err());
        assert!(config.set_value("pipeline.batch_size", "many").is_err());
        assert!(config.set_value("settings.format", "xml").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_set_and_clear_policy_path() {
        let mut config = Config::default();
        config.set_value("app.policy_path", "/etc/curator/policy.toml").unwrap();
        assert_eq!(
            config.app.policy_path,
            Some(PathBuf::from("/etc/curator/policy.toml"))
        );
        config.set_value("app.policy_path", "").unwrap();
        assert_eq!(config.app.policy_path, None);
    }

    #[test]
    fn test_group_label_flows_into_pipeline() {
        let mut config = Config::default();
        config.app.group_label = "标杆案例".to_string();
        assert_eq!(config.pipeline_config().group_label, "标杆案例");
        assert_eq!(
            config.group_folder(Path::new("lib")),
            PathBuf::from("lib").join("标杆案例")
        );
    }

    #[test]
    fn test_policy_fallback_and_toml() {
        let dir = TempDir::new().unwrap();
        let missing = load_policy_file(Some(&dir.path().join("missing.json"))).unwrap();
        assert_eq!(missing, ClassificationPolicy::retail_default());

        let path = dir.path().join("policy.toml");
        fs::write(
            &path,
            r#"
role_definition = "你是文档分类助手。"
irrelevant_rules = ["广告软文"]

[[categories]]
name = "甲类"
desc = "甲类文档"

[[categories]]
name = "乙类"
description = "乙类文档"
"#,
        )
        .unwrap();
        let policy = load_policy_file(Some(&path)).unwrap();
        assert_eq!(policy.category_names(), vec!["甲类", "乙类"]);
    }
}
