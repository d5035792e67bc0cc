//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Curator CLI - Classify documents into a curated library and keep its ledger clean.
#[derive(Debug, Parser)]
#[command(name = "curator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CURATOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (counts only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify every document in a folder into the library
    Classify(ClassifyArgs),

    /// Create the category folders of the active policy
    Init(LibraryArgs),

    /// Remove duplicate documents and write a cleaned ledger
    Dedupe(DedupeArgs),

    /// List stored documents that have no ledger row
    Orphans(LibraryArgs),

    /// Print the instructions sent to the model
    Prompt(PromptArgs),

    /// Show or change configuration
    Config(ConfigArgs),
}

/// Arguments for the classify command.
#[derive(Debug, Parser)]
pub struct ClassifyArgs {
    /// Folder with documents to classify (defaults to app.output_folder)
    pub source: Option<PathBuf>,

    /// Library folder (defaults to app.classification_folder)
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// JSON manifest of article titles, links and publish times
    #[arg(short, long)]
    pub articles: Option<PathBuf>,

    /// Policy file (JSON or TOML)
    #[arg(short, long)]
    pub policy: Option<PathBuf>,

    /// Delete source files classified as irrelevant
    #[arg(long)]
    pub remove_irrelevant: bool,

    /// Documents between cooldown pauses
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Cooldown pause length in seconds
    #[arg(long)]
    pub cooldown: Option<u64>,
}

/// Arguments for commands that only need the library location.
#[derive(Debug, Parser)]
pub struct LibraryArgs {
    /// Library folder (defaults to app.classification_folder)
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// Policy file (JSON or TOML)
    #[arg(short, long)]
    pub policy: Option<PathBuf>,
}

/// Arguments for the dedupe command.
#[derive(Debug, Parser)]
pub struct DedupeArgs {
    /// Library folder (defaults to app.classification_folder)
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// Policy file (JSON or TOML)
    #[arg(short, long)]
    pub policy: Option<PathBuf>,

    /// Report what would be removed without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Leave category folders alone
    #[arg(long, conflicts_with = "skip_ledger")]
    pub skip_storage: bool,

    /// Leave the ledger alone
    #[arg(long)]
    pub skip_ledger: bool,
}

/// Arguments for the prompt command.
#[derive(Debug, Parser)]
pub struct PromptArgs {
    /// Policy file (JSON or TOML)
    #[arg(short, long)]
    pub policy: Option<PathBuf>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the active configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Change one value, e.g. `inference.temperature 0.5`
    Set {
        /// Dotted key: section.field
        key: String,
        /// New value
        value: String,
    },

    /// Restore default configuration
    Reset,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_command() {
        let cli = Cli::parse_from([
            "curator",
            "classify",
            "downloads",
            "--dest",
            "library",
            "--remove-irrelevant",
        ]);
        match cli.command {
            Command::Classify(args) => {
                assert_eq!(args.source, Some(PathBuf::from("downloads")));
                assert_eq!(args.dest, Some(PathBuf::from("library")));
                assert!(args.remove_irrelevant);
                assert!(args.batch_size.is_none());
            }
            _ => panic!("Expected Classify command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["curator", "prompt", "--format", "json", "--no-color"]);
        assert!(cli.no_color);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
    }

    #[test]
    fn test_config_set() {
        let cli = Cli::parse_from(["curator", "config", "set", "inference.temperature", "0.5"]);
        match cli.command {
            Command::Config(ConfigArgs {
                action: ConfigAction::Set { key, value },
            }) => {
                assert_eq!(key, "inference.temperature");
                assert_eq!(value, "0.5");
            }
            _ => panic!("Expected config set"),
        }
    }

    #[test]
    fn test_dedupe_skip_flags_conflict() {
        let result = Cli::try_parse_from(["curator", "dedupe", "--skip-storage", "--skip-ledger"]);
        assert!(result.is_err());
    }
}
