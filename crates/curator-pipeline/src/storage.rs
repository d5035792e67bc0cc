//! Loading source documents and preparing category storage

use crate::error::{PipelineError, Result};
use curator_domain::{normalize_for_matching, ArticleInfo, Document};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Documents read from a source directory
#[derive(Debug, Default)]
pub struct LoadedDocuments {
    /// Readable documents, sorted by file name
    pub documents: Vec<Document>,

    /// Files that could not be read, with the reason
    pub failures: Vec<(PathBuf, String)>,
}

/// Create `group_folder/<category>` for every category
///
/// Existing folders are left alone.
pub fn initialize_category_folders<S: AsRef<str>>(
    group_folder: &Path,
    categories: &[S],
) -> io::Result<()> {
    for category in categories {
        let path = group_folder.join(category.as_ref());
        fs::create_dir_all(&path)?;
        debug!("Category folder ready: {}", path.display());
    }
    Ok(())
}

/// Read every file with `extension` directly inside `dir`
///
/// Content that is not valid UTF-8 is kept as an empty document so the run
/// reports it as empty instead of failing.
pub fn load_documents(dir: &Path, extension: &str) -> Result<LoadedDocuments> {
    if !dir.is_dir() {
        return Err(PipelineError::SourceNotFound(dir.to_path_buf()));
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) == Some(extension) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut loaded = LoadedDocuments::default();
    for path in paths {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            warn!("Skipping non-UTF-8 file name {}", path.display());
            loaded
                .failures
                .push((path.clone(), "file name is not valid UTF-8".to_string()));
            continue;
        };
        let file_name = file_name.to_string();

        match fs::read(&path) {
            Ok(bytes) => {
                let raw_text = String::from_utf8(bytes).unwrap_or_else(|_| {
                    warn!("{} is not valid UTF-8, treating as empty", path.display());
                    String::new()
                });
                loaded
                    .documents
                    .push(Document::new(file_name, raw_text).with_source_path(&path));
            }
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                loaded.failures.push((path, e.to_string()));
            }
        }
    }

    Ok(loaded)
}

/// Attach link and publish time from `articles` to matching documents
///
/// Matching compares normalized titles; the first article with a given key
/// wins. Documents without a match are returned unchanged.
pub fn match_articles(documents: Vec<Document>, articles: &[ArticleInfo]) -> Vec<Document> {
    let mut by_key: HashMap<String, &ArticleInfo> = HashMap::new();
    for article in articles {
        by_key
            .entry(normalize_for_matching(&article.title))
            .or_insert(article);
    }

    documents
        .into_iter()
        .map(|doc| match by_key.get(&doc.match_key()) {
            Some(article) => doc.with_article(article),
            None => doc,
        })
        .collect()
}

/// Read an article manifest: a JSON array of `{title, link, create_time}`
pub fn load_articles(path: &Path) -> Result<Vec<ArticleInfo>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
