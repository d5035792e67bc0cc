//! Results of a storage dedup pass

use serde::Serialize;
use std::path::PathBuf;

/// What happened in one category folder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FolderReport {
    /// Folder that was scanned
    pub folder: PathBuf,

    /// Files that survived (one per base name)
    pub kept: usize,

    /// Files removed, or that would be removed in dry-run mode
    pub removed: Vec<PathBuf>,
}

/// Outcome of [`crate::Deduplicator::dedupe_storage`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StorageReport {
    /// Per-folder results, in the order requested
    pub folders: Vec<FolderReport>,

    /// Requested subfolders that do not exist
    pub missing: Vec<PathBuf>,

    /// Files whose removal failed, with the reason
    pub failed: Vec<(PathBuf, String)>,

    /// Whether this was a dry run
    pub dry_run: bool,
}

impl StorageReport {
    /// Files removed across all folders
    pub fn total_removed(&self) -> usize {
        self.folders.iter().map(|f| f.removed.len()).sum()
    }

    /// Every removed file, folder by folder
    pub fn removed_files(&self) -> Vec<&PathBuf> {
        self.folders.iter().flat_map(|f| f.removed.iter()).collect()
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let verb = if self.dry_run { "Would remove" } else { "Removed" };
        let mut lines = vec![
            "Storage Dedup Summary".to_string(),
            "=====================".to_string(),
        ];

        for folder in &self.folders {
            lines.push(format!(
                "{}: kept {}, {} {}",
                folder.folder.display(),
                folder.kept,
                verb.to_lowercase(),
                folder.removed.len()
            ));
        }
        for missing in &self.missing {
            lines.push(format!("{}: missing, skipped", missing.display()));
        }
        for (path, reason) in &self.failed {
            lines.push(format!("{}: delete failed ({})", path.display(), reason));
        }

        lines.push(String::new());
        lines.push(format!("{} {} file(s)", verb, self.total_removed()));
        lines.join("\n")
    }
}
