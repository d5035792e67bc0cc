//! Documents entering the pipeline and the article metadata matched to them

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

fn dated_title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\[\d{4}-\d{2}-\d{2}\](.*)$").expect("valid regex"))
}

fn non_word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\W+").expect("valid regex"))
}

/// Derive a human title from a stored file name
///
/// The last extension is dropped, and an export prefix of the form
/// `[YYYY-MM-DD]` is removed when present.
///
/// ```
/// use curator_domain::title_from_file_name;
///
/// assert_eq!(title_from_file_name("[2024-03-01]胖东来运营考核标准.md"), "胖东来运营考核标准");
/// assert_eq!(title_from_file_name("plain.md"), "plain");
/// ```
pub fn title_from_file_name(file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);

    match dated_title_pattern().captures(base) {
        Some(caps) => caps
            .get(1)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
        None => base.trim().to_string(),
    }
}

/// Reduce a title to its letters and digits, lowercased, for fuzzy matching
///
/// CJK characters count as letters.
pub fn normalize_for_matching(text: &str) -> String {
    non_word_pattern().replace_all(text, "").to_lowercase()
}

/// Metadata for one exported article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleInfo {
    /// Article title as published
    pub title: String,

    /// Link to the original article
    #[serde(default)]
    pub link: Option<String>,

    /// Publish time as unix seconds
    #[serde(default)]
    pub create_time: Option<i64>,
}

/// A document to classify
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File name used for storage placement
    pub file_name: String,

    /// Display title recorded in the ledger
    pub title: String,

    /// Raw marked-up content
    pub raw_text: String,

    /// Where the document currently lives, if materialized on disk
    pub source_path: Option<PathBuf>,

    /// Link to the original article
    pub link: Option<String>,

    /// Publish time as unix seconds
    pub publish_timestamp: Option<i64>,
}

impl Document {
    /// Create an in-memory document; the title is derived from the file name
    pub fn new(file_name: impl Into<String>, raw_text: impl Into<String>) -> Self {
        let file_name = file_name.into();
        Self {
            title: title_from_file_name(&file_name),
            file_name,
            raw_text: raw_text.into(),
            source_path: None,
            link: None,
            publish_timestamp: None,
        }
    }

    /// Record where the document lives on disk
    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// Attach article metadata (link and publish time)
    pub fn with_article(mut self, article: &ArticleInfo) -> Self {
        self.link = article.link.clone();
        self.publish_timestamp = article.create_time;
        self
    }

    /// Normalized title used for metadata matching
    pub fn match_key(&self) -> String {
        normalize_for_matching(&self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_with_date_prefix() {
        assert_eq!(
            title_from_file_name("[2024-01-05] 山姆的生意经.md"),
            "山姆的生意经"
        );
    }

    #[test]
    fn test_title_without_prefix() {
        assert_eq!(title_from_file_name("  report (2).md"), "report (2)");
        assert_eq!(title_from_file_name("no_extension"), "no_extension");
    }

    #[test]
    fn test_normalize_for_matching() {
        assert_eq!(normalize_for_matching("Hello, World!"), "helloworld");
        assert_eq!(normalize_for_matching("胖东来“红内裤事件”"), "胖东来红内裤事件");
        assert_eq!(normalize_for_matching("A b_C 1"), "ab_c1");
    }

    #[test]
    fn test_document_with_article() {
        let article = ArticleInfo {
            title: "Title".to_string(),
            link: Some("https://example.com/a".to_string()),
            create_time: Some(1_700_000_000),
        };
        let doc = Document::new("[2023-11-14]Title.md", "body").with_article(&article);
        assert_eq!(doc.title, "Title");
        assert_eq!(doc.link.as_deref(), Some("https://example.com/a"));
        assert_eq!(doc.publish_timestamp, Some(1_700_000_000));
        assert_eq!(doc.match_key(), "title");
    }
}
