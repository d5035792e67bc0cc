//! Storage deduplication and the Deduplicator entry point

use crate::config::DedupConfig;
use crate::error::{DedupError, Result};
use crate::ledger::{cleaned_path, dedupe_records, LedgerDedupOutcome};
use crate::report::{FolderReport, StorageReport};
use curator_ledger::Ledger;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

fn version_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.+?)\s*\((\d+)\)$").expect("valid regex"))
}

/// Split a file stem into its base name and optional ` (N)` version
///
/// ```
/// use curator_dedup::split_version;
///
/// assert_eq!(split_version("Report (3)"), ("Report".to_string(), Some(3)));
/// assert_eq!(split_version("Report"), ("Report".to_string(), None));
/// ```
pub fn split_version(stem: &str) -> (String, Option<u64>) {
    if let Some(caps) = version_suffix().captures(stem) {
        let base = caps[1].trim().to_string();
        if let Ok(version) = caps[2].parse::<u64>() {
            return (base, Some(version));
        }
    }
    (stem.trim().to_string(), None)
}

/// Removes duplicate documents from storage and duplicate ledger rows
///
/// # Examples
///
/// ```no_run
/// use curator_dedup::{Deduplicator, DedupConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dedup = Deduplicator::new(DedupConfig::default().with_dry_run(true));
/// let report = dedup.dedupe_storage("library/核心案例库", &["运营操作类"])?;
/// println!("{}", report.summary());
/// # Ok(())
/// # }
/// ```
pub struct Deduplicator {
    config: DedupConfig,
}

impl Deduplicator {
    /// Create a new Deduplicator with the given configuration
    pub fn new(config: DedupConfig) -> Self {
        Self { config }
    }

    /// Create a Deduplicator with default configuration
    pub fn default_config() -> Self {
        Self::new(DedupConfig::default())
    }

    /// Active configuration
    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    /// Collapse versioned duplicates inside each of `subfolders` of `folder`
    ///
    /// Missing subfolders are skipped with a warning. A failed delete is
    /// recorded and does not stop the pass.
    pub fn dedupe_storage<S: AsRef<str>>(
        &self,
        folder: impl AsRef<Path>,
        subfolders: &[S],
    ) -> Result<StorageReport> {
        let folder = folder.as_ref();
        if !folder.is_dir() {
            return Err(DedupError::FolderNotFound(folder.to_path_buf()));
        }

        let mut report = StorageReport {
            dry_run: self.config.dry_run,
            ..StorageReport::default()
        };

        for subfolder in subfolders {
            let path = folder.join(subfolder.as_ref());
            if !path.is_dir() {
                warn!("Folder {} not found, skipping", path.display());
                report.missing.push(path);
                continue;
            }

            match self.dedupe_folder(&path, &mut report.failed) {
                Ok(folder_report) => report.folders.push(folder_report),
                Err(e) => {
                    warn!("Could not scan {}: {}", path.display(), e);
                    report.failed.push((path, e.to_string()));
                }
            }
        }

        info!(
            "Storage dedup {}: {} file(s) {}",
            folder.display(),
            report.total_removed(),
            if self.config.dry_run { "would be removed" } else { "removed" }
        );
        Ok(report)
    }

    fn dedupe_folder(
        &self,
        path: &Path,
        failed: &mut Vec<(PathBuf, String)>,
    ) -> Result<FolderReport> {
        // base name -> [(version, file name)]
        let mut groups: BTreeMap<String, Vec<(Option<u64>, String)>> = BTreeMap::new();

        for entry in fs::read_dir(path)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_path = entry.path();
            if file_path.extension().and_then(|e| e.to_str()) != Some(self.config.extension.as_str()) {
                continue;
            }
            let Some(stem) = file_path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Some(file_name) = file_path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };

            let (base, version) = split_version(stem);
            groups
                .entry(base)
                .or_default()
                .push((version, file_name.to_string()));
        }

        let mut folder_report = FolderReport {
            folder: path.to_path_buf(),
            kept: groups.len(),
            removed: Vec::new(),
        };

        for (base, mut versions) in groups {
            if versions.len() < 2 {
                continue;
            }
            // None (the un-suffixed original) sorts before any Some(n)
            versions.sort();
            debug!("{}: keeping {}", base, versions[0].1);

            for (_, file_name) in versions.into_iter().skip(1) {
                let target = path.join(&file_name);
                if self.config.dry_run {
                    info!("[dry run] would remove {}", target.display());
                    folder_report.removed.push(target);
                    continue;
                }
                match fs::remove_file(&target) {
                    Ok(()) => {
                        info!("Removed duplicate {}", target.display());
                        folder_report.removed.push(target);
                    }
                    Err(e) => {
                        warn!("Failed to remove {}: {}", target.display(), e);
                        failed.push((target, e.to_string()));
                    }
                }
            }
        }

        Ok(folder_report)
    }

    /// Write a deduplicated copy of `ledger` next to it
    ///
    /// In dry-run mode nothing is written; the outcome still describes what
    /// the cleaned ledger would contain.
    pub fn dedupe_ledger(&self, ledger: &Ledger) -> Result<LedgerDedupOutcome> {
        if !ledger.exists() {
            return Err(DedupError::LedgerNotFound(ledger.path().to_path_buf()));
        }

        let records = ledger.read()?;
        let original_rows = records.len();
        let mut kept = dedupe_records(records);
        let output_path = cleaned_path(ledger.path());

        if self.config.dry_run {
            curator_ledger::renumber(&mut kept);
        } else {
            Ledger::new(&output_path).write(&mut kept)?;
        }

        info!(
            "Ledger dedup {}: {} -> {} rows ({})",
            ledger.path().display(),
            original_rows,
            kept.len(),
            output_path.display()
        );

        Ok(LedgerDedupOutcome {
            output_path,
            original_rows,
            kept_rows: kept.len(),
            records: kept,
            written: !self.config.dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), name).unwrap();
    }

    fn names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_split_version_variants() {
        assert_eq!(split_version("A (2)"), ("A".to_string(), Some(2)));
        assert_eq!(split_version("A(10)"), ("A".to_string(), Some(10)));
        assert_eq!(split_version("(2)"), ("(2)".to_string(), None));
        assert_eq!(split_version("Q3 (draft)"), ("Q3 (draft)".to_string(), None));
    }

    #[test]
    fn test_original_survives() {
        let dir = TempDir::new().unwrap();
        let ops = dir.path().join("运营操作类");
        fs::create_dir(&ops).unwrap();
        touch(&ops, "A.md");
        touch(&ops, "A (2).md");
        touch(&ops, "A (3).md");
        touch(&ops, "B.md");

        let report = Deduplicator::default_config()
            .dedupe_storage(dir.path(), &["运营操作类"])
            .unwrap();

        assert_eq!(names(&ops), vec!["A.md", "B.md"]);
        assert_eq!(report.total_removed(), 2);
        assert_eq!(report.folders[0].kept, 2);
    }

    #[test]
    fn test_lowest_suffix_survives_without_original() {
        let dir = TempDir::new().unwrap();
        let ops = dir.path().join("ops");
        fs::create_dir(&ops).unwrap();
        touch(&ops, "A (3).md");
        touch(&ops, "A (2).md");
        touch(&ops, "A (10).md");

        Deduplicator::default_config()
            .dedupe_storage(dir.path(), &["ops"])
            .unwrap();

        assert_eq!(names(&ops), vec!["A (2).md"]);
    }

    #[test]
    fn test_other_extensions_untouched() {
        let dir = TempDir::new().unwrap();
        let ops = dir.path().join("ops");
        fs::create_dir(&ops).unwrap();
        touch(&ops, "A.md");
        touch(&ops, "A (2).txt");
        touch(&ops, "A (2).md.bak");

        let report = Deduplicator::default_config()
            .dedupe_storage(dir.path(), &["ops"])
            .unwrap();

        assert_eq!(report.total_removed(), 0);
        assert_eq!(names(&ops).len(), 3);
    }

    #[test]
    fn test_missing_subfolder_is_skipped() {
        let dir = TempDir::new().unwrap();
        let ops = dir.path().join("ops");
        fs::create_dir(&ops).unwrap();
        touch(&ops, "A.md");
        touch(&ops, "A (2).md");

        let report = Deduplicator::default_config()
            .dedupe_storage(dir.path(), &["missing", "ops"])
            .unwrap();

        assert_eq!(report.missing, vec![dir.path().join("missing")]);
        assert_eq!(report.total_removed(), 1);
    }

    #[test]
    fn test_missing_root_is_error() {
        let dir = TempDir::new().unwrap();
        let result = Deduplicator::default_config()
            .dedupe_storage(dir.path().join("nope"), &["ops"]);
        assert!(matches!(result, Err(DedupError::FolderNotFound(_))));
    }

    #[test]
    fn test_dry_run_keeps_files() {
        let dir = TempDir::new().unwrap();
        let ops = dir.path().join("ops");
        fs::create_dir(&ops).unwrap();
        touch(&ops, "A.md");
        touch(&ops, "A (2).md");

        let dedup = Deduplicator::new(DedupConfig::default().with_dry_run(true));
        let report = dedup.dedupe_storage(dir.path(), &["ops"]).unwrap();

        assert!(report.dry_run);
        assert_eq!(report.removed_files(), vec![&ops.join("A (2).md")]);
        assert_eq!(names(&ops).len(), 2);
    }
}
