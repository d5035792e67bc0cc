//! Reconciliation between category storage and the ledger
//!
//! Placement and the ledger write are separate steps, so an interrupted run
//! can leave stored files with no ledger row. The scan only reports them.

use crate::error::Result;
use curator_domain::{normalize_for_matching, title_from_file_name};
use curator_ledger::Ledger;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A stored document with no matching ledger row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Orphan {
    /// Category folder the file is in
    pub category: String,

    /// Stored file
    pub path: PathBuf,

    /// Title derived from the file name
    pub title: String,
}

/// List files under `group_folder/<category>` that the ledger does not record
///
/// Files are matched to rows by category and normalized title. Missing
/// category folders and a missing ledger are treated as empty.
pub fn find_orphans<S: AsRef<str>>(
    group_folder: &Path,
    categories: &[S],
    ledger: &Ledger,
    extension: &str,
) -> Result<Vec<Orphan>> {
    let recorded: HashSet<(String, String)> = ledger
        .read()?
        .into_iter()
        .map(|r| (r.category, normalize_for_matching(&r.title)))
        .collect();

    let mut orphans = Vec::new();
    for category in categories {
        let category = category.as_ref();
        let folder = group_folder.join(category);
        if !folder.is_dir() {
            continue;
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&folder)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(extension))
            .collect();
        paths.sort();

        for path in paths {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let title = title_from_file_name(file_name);
            let key = (category.to_string(), normalize_for_matching(&title));
            if !recorded.contains(&key) {
                orphans.push(Orphan {
                    category: category.to_string(),
                    path: path.clone(),
                    title,
                });
            }
        }
    }

    Ok(orphans)
}
