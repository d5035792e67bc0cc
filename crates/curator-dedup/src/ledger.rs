//! Ledger row deduplication

use chrono::{NaiveDate, NaiveDateTime};
use curator_domain::LedgerRecord;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

fn trailing_version() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\(\d+\)$").expect("valid regex"))
}

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Outcome of a ledger dedup pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerDedupOutcome {
    /// Where the cleaned ledger was (or would be) written
    pub output_path: PathBuf,

    /// Rows in the input ledger
    pub original_rows: usize,

    /// Rows kept
    pub kept_rows: usize,

    /// The kept rows, numbered 1..N
    pub records: Vec<LedgerRecord>,

    /// False for dry runs
    pub written: bool,
}

impl LedgerDedupOutcome {
    /// Rows dropped as duplicates
    pub fn removed_rows(&self) -> usize {
        self.original_rows - self.kept_rows
    }
}

/// Title key used to detect duplicate rows
///
/// `.md` remnants and a trailing ` (N)` version are removed, then the result
/// is trimmed.
pub fn normalize_title(title: &str) -> String {
    let without_ext = title.replace(".md", "");
    trailing_version()
        .replace(&without_ext, "")
        .trim()
        .to_string()
}

/// Parse an ingestion date as written by this tool or by a spreadsheet
pub fn parse_ledger_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Path of the cleaned artifact for `ledger_path`: `<stem>_cleaned.csv`
pub fn cleaned_path(ledger_path: &Path) -> PathBuf {
    let stem = ledger_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ledger".to_string());
    ledger_path.with_file_name(format!("{}_cleaned.csv", stem))
}

/// Keep the earliest row per (category, normalized title)
///
/// Rows are stably sorted by ingestion date, unparseable dates last, and the
/// result stays in that order.
pub fn dedupe_records(mut records: Vec<LedgerRecord>) -> Vec<LedgerRecord> {
    records.sort_by_key(|r| match parse_ledger_date(&r.ingestion_date) {
        Some(date) => (false, Some(date)),
        None => (true, None),
    });

    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert((r.category.clone(), normalize_title(&r.title))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DedupConfig, DedupError, Deduplicator};
    use curator_ledger::Ledger;
    use tempfile::TempDir;

    fn row(category: &str, title: &str, date: &str) -> LedgerRecord {
        LedgerRecord {
            sequence_number: 0,
            group_label: "核心案例库".to_string(),
            category: category.to_string(),
            title: title.to_string(),
            ingestion_date: date.to_string(),
            source_link: String::new(),
            publish_date: String::new(),
        }
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("foo (2).md"), "foo");
        assert_eq!(normalize_title(" foo(12) "), "foo(12)");
        assert_eq!(normalize_title("foo(12)"), "foo");
        assert_eq!(normalize_title("foo"), "foo");
    }

    #[test]
    fn test_parse_ledger_date() {
        assert!(parse_ledger_date("2024-01-02").is_some());
        assert!(parse_ledger_date("2024/1/2").is_some());
        assert!(parse_ledger_date("2024-01-02 08:30:00").is_some());
        assert!(parse_ledger_date("yesterday").is_none());
        assert!(parse_ledger_date("").is_none());
    }

    #[test]
    fn test_keeps_earliest_row() {
        let kept = dedupe_records(vec![
            row("经营决策类", "foo", "2024-01-02"),
            row("经营决策类", "foo", "2024-01-01"),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].ingestion_date, "2024-01-01");
    }

    #[test]
    fn test_same_title_in_other_category_is_kept() {
        let kept = dedupe_records(vec![
            row("经营决策类", "foo", "2024-01-02"),
            row("运营操作类", "foo", "2024-01-01"),
            row("经营决策类", "foo (2)", "2024-01-03"),
        ]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_unparseable_dates_sort_last() {
        let kept = dedupe_records(vec![
            row("a", "x", "not a date"),
            row("a", "x", "2024-05-01"),
            row("a", "y", "2023-01-01"),
        ]);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].title, "y");
        assert_eq!(kept[1].ingestion_date, "2024-05-01");
    }

    #[test]
    fn test_stable_for_equal_dates() {
        let kept = dedupe_records(vec![
            row("a", "first", "2024-01-01"),
            row("a", "first (2)", "2024-01-01"),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "first");
    }

    #[test]
    fn test_cleaned_path() {
        assert_eq!(
            cleaned_path(Path::new("/data/资料汇总.csv")),
            PathBuf::from("/data/资料汇总_cleaned.csv")
        );
    }

    #[test]
    fn test_dedupe_ledger_writes_new_file() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::in_folder(dir.path());
        ledger
            .write(&mut [
                row("经营决策类", "foo", "2024-01-02"),
                row("经营决策类", "foo (2)", "2024-01-01"),
                row("运营操作类", "bar", "2024-01-03"),
            ])
            .unwrap();
        let before = std::fs::read(ledger.path()).unwrap();

        let outcome = Deduplicator::default_config().dedupe_ledger(&ledger).unwrap();

        assert_eq!(outcome.original_rows, 3);
        assert_eq!(outcome.kept_rows, 2);
        assert_eq!(outcome.removed_rows(), 1);
        assert!(outcome.written);
        assert_eq!(std::fs::read(ledger.path()).unwrap(), before);

        let cleaned = Ledger::new(&outcome.output_path).read().unwrap();
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[0].title, "foo (2)");
        assert_eq!(cleaned[0].sequence_number, 1);
        assert_eq!(cleaned[1].sequence_number, 2);
    }

    #[test]
    fn test_dedupe_ledger_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::in_folder(dir.path());
        ledger.write(&mut [row("a", "x", "2024-01-01")]).unwrap();

        let dedup = Deduplicator::new(DedupConfig::default().with_dry_run(true));
        let outcome = dedup.dedupe_ledger(&ledger).unwrap();

        assert!(!outcome.written);
        assert!(!outcome.output_path.exists());
    }

    #[test]
    fn test_dedupe_missing_ledger() {
        let dir = TempDir::new().unwrap();
        let result = Deduplicator::default_config().dedupe_ledger(&Ledger::in_folder(dir.path()));
        assert!(matches!(result, Err(DedupError::LedgerNotFound(_))));
    }
}
