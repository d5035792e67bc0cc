//! Output formatting for the CLI.

use crate::config::{Config, OutputFormat};
use crate::error::Result;
use colored::*;
use curator_dedup::{LedgerDedupOutcome, StorageReport};
use curator_pipeline::{Orphan, RunSummary};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Active output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format the result of a classification run.
    pub fn format_run_summary(&self, summary: &RunSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
            OutputFormat::Quiet => Ok(format!(
                "{} {} {}",
                summary.recorded, summary.irrelevant, summary.failed
            )),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Outcome", "Documents"]);
                builder.push_record(["Recorded".to_string(), summary.recorded.to_string()]);
                for (category, count) in &summary.per_category {
                    builder.push_record([format!("  {}", category), count.to_string()]);
                }
                builder.push_record(["Irrelevant".to_string(), summary.irrelevant.to_string()]);
                builder.push_record([
                    "Already stored".to_string(),
                    summary.already_stored.to_string(),
                ]);
                builder.push_record(["Empty".to_string(), summary.empty.to_string()]);
                builder.push_record(["Failed".to_string(), summary.failed.to_string()]);
                builder.push_record([
                    "Handled".to_string(),
                    format!("{}/{}", summary.handled, summary.total),
                ]);

                let mut lines = vec![self.table(builder)];
                if summary.sources_removed > 0 {
                    lines.push(self.info(&format!(
                        "Removed {} irrelevant source file(s)",
                        summary.sources_removed
                    )));
                }
                for (file, reason) in &summary.failures {
                    lines.push(self.error(&format!("{}: {}", file, reason)));
                }
                if let (Some(path), Some(rows)) = (&summary.ledger_path, summary.ledger_rows) {
                    lines.push(self.success(&format!(
                        "Ledger {} holds {} row(s)",
                        path.display(),
                        rows
                    )));
                }
                if summary.cancelled {
                    lines.push(self.warning("Run cancelled before all documents were handled"));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format a storage dedup report.
    pub fn format_storage_report(&self, report: &StorageReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Quiet => Ok(report
                .removed_files()
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let verb = if report.dry_run { "Would remove" } else { "Removed" };
                let mut builder = Builder::default();
                builder.push_record(["Folder", "Kept", verb]);
                for folder in &report.folders {
                    builder.push_record([
                        folder.folder.display().to_string(),
                        folder.kept.to_string(),
                        folder.removed.len().to_string(),
                    ]);
                }

                let mut lines = vec![self.table(builder)];
                for path in report.removed_files() {
                    lines.push(format!("  - {}", path.display()));
                }
                for missing in &report.missing {
                    lines.push(self.warning(&format!("{} not found, skipped", missing.display())));
                }
                for (path, reason) in &report.failed {
                    lines.push(self.error(&format!("{}: {}", path.display(), reason)));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format a ledger dedup outcome.
    pub fn format_ledger_outcome(&self, outcome: &LedgerDedupOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "output_path": outcome.output_path,
                "original_rows": outcome.original_rows,
                "kept_rows": outcome.kept_rows,
                "removed_rows": outcome.removed_rows(),
                "written": outcome.written,
            }))?),
            OutputFormat::Quiet => Ok(outcome.removed_rows().to_string()),
            OutputFormat::Table => {
                let message = format!(
                    "Ledger: {} -> {} row(s), {} duplicate(s)",
                    outcome.original_rows,
                    outcome.kept_rows,
                    outcome.removed_rows()
                );
                if outcome.written {
                    Ok(format!(
                        "{}\n{}",
                        self.success(&message),
                        self.info(&format!("Cleaned ledger: {}", outcome.output_path.display()))
                    ))
                } else {
                    Ok(self.info(&format!("[dry run] {}", message)))
                }
            }
        }
    }

    /// Format orphaned documents.
    pub fn format_orphans(&self, orphans: &[Orphan]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(orphans)?),
            OutputFormat::Quiet => Ok(orphans
                .iter()
                .map(|o| o.path.display().to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if orphans.is_empty() {
                    return Ok(self.success("Every stored document has a ledger row."));
                }

                let mut builder = Builder::default();
                builder.push_record(["Category", "Title", "Path"]);
                for orphan in orphans {
                    builder.push_record([
                        orphan.category.clone(),
                        orphan.title.clone(),
                        orphan.path.display().to_string(),
                    ]);
                }
                Ok(self.table(builder))
            }
        }
    }

    /// Format the rendered model instructions.
    pub fn format_prompt(&self, prompt: &str) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(
                &serde_json::json!({ "prompt": prompt }),
            )?),
            _ => Ok(prompt.to_string()),
        }
    }

    /// Format the configuration.
    pub fn format_config(&self, config: &Config) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(config)?),
            _ => Ok(toml::to_string_pretty(config)?),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
