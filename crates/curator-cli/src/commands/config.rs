//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(
    args: ConfigArgs,
    config: &mut Config,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            println!("{}", formatter.format_config(config)?);
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Set { key, value } => {
            config.set_value(&key, &value)?;
            config.save(path)?;
            println!("{}", formatter.success(&format!("Set {} = {}", key, value)));
        }
        ConfigAction::Reset => {
            *config = Config::default();
            config.save(path)?;
            println!(
                "{}",
                formatter.success(&format!("Restored defaults in {}", path.display()))
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use tempfile::TempDir;

    #[test]
    fn test_set_persists_valid_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut config = Config::default();

        execute_config(
            ConfigArgs {
                action: ConfigAction::Set {
                    key: "pipeline.cooldown_seconds".to_string(),
                    value: "5".to_string(),
                },
            },
            &mut config,
            &path,
            &formatter,
        )
        .unwrap();

        assert_eq!(Config::load(&path).unwrap().pipeline.cooldown_seconds, 5);
    }

    #[test]
    fn test_invalid_value_saves_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut config = Config::default();

        let result = execute_config(
            ConfigArgs {
                action: ConfigAction::Set {
                    key: "inference.context_window".to_string(),
                    value: "256".to_string(),
                },
            },
            &mut config,
            &path,
            &formatter,
        );

        assert!(result.is_err());
        assert!(!path.exists());
    }
}
