//! CSV-backed ledger file

use crate::error::{LedgerError, Result};
use curator_domain::{LedgerRecord, LEDGER_HEADERS};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name used for the ledger inside a group folder
pub const DEFAULT_LEDGER_FILE_NAME: &str = "资料汇总.csv";

const BOM: &str = "\u{feff}";

/// Rewrite sequence numbers as 1..N in the current order
pub fn renumber(records: &mut [LedgerRecord]) {
    for (index, record) in records.iter_mut().enumerate() {
        record.sequence_number = index as u64 + 1;
    }
}

/// Handle to a ledger file on disk
///
/// The file does not need to exist; a missing ledger reads as empty and is
/// created on the first write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    /// Open (or prepare to create) the ledger at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ledger named [`DEFAULT_LEDGER_FILE_NAME`] inside `folder`
    pub fn in_folder(folder: impl AsRef<Path>) -> Self {
        Self::new(folder.as_ref().join(DEFAULT_LEDGER_FILE_NAME))
    }

    /// Path of the ledger file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the file exists
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read every row
    pub fn read(&self) -> Result<Vec<LedgerRecord>> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let bytes = fs::read(&self.path)?;
        let text = String::from_utf8(bytes)
            .map_err(|_| LedgerError::InvalidEncoding(self.path.clone()))?;
        let text = text.trim_start_matches(BOM);
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let mut records: Vec<LedgerRecord> = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }

        debug!("Read {} ledger rows from {}", records.len(), self.path.display());
        Ok(records)
    }

    /// Replace the ledger contents, renumbering rows 1..N
    pub fn write(&self, records: &mut [LedgerRecord]) -> Result<()> {
        renumber(records);

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(BOM.as_bytes().to_vec());
        writer.write_record(LEDGER_HEADERS)?;
        for record in records.iter() {
            writer.serialize(record)?;
        }
        let contents = writer
            .into_inner()
            .map_err(|e| LedgerError::Io(e.into_error()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.path.with_extension("csv.tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(&tmp_path, &self.path)?;

        debug!("Wrote {} ledger rows to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Append `new_records` after the existing rows
    ///
    /// Returns the combined rows as written, numbered 1..N. Appending nothing
    /// leaves the file untouched.
    pub fn append(&self, new_records: &[LedgerRecord]) -> Result<Vec<LedgerRecord>> {
        let mut records = self.read()?;
        if new_records.is_empty() {
            return Ok(records);
        }

        let existing = records.len();
        records.extend_from_slice(new_records);
        self.write(&mut records)?;

        info!(
            "Ledger {}: appended {} row(s) to {} existing",
            self.path.display(),
            new_records.len(),
            existing
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(category: &str, title: &str, date: &str) -> LedgerRecord {
        LedgerRecord {
            sequence_number: 0,
            group_label: "核心案例库".to_string(),
            category: category.to_string(),
            title: title.to_string(),
            ingestion_date: date.to_string(),
            source_link: "https://mp.weixin.qq.com/s/abc".to_string(),
            publish_date: String::new(),
        }
    }

    #[test]
    fn test_missing_ledger_reads_empty() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::in_folder(dir.path());
        assert!(!ledger.exists());
        assert!(ledger.read().unwrap().is_empty());
    }

    #[test]
    fn test_write_has_bom_and_headers() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::in_folder(dir.path().join("核心案例库"));
        ledger
            .write(&mut [record("运营操作类", "标题, 带逗号", "2024-01-01")])
            .unwrap();

        let raw = fs::read_to_string(ledger.path()).unwrap();
        assert!(raw.starts_with("\u{feff}序号,大类,小类,文档名称,入库日期,来源,发布日期\n"));
        assert!(raw.contains("1,核心案例库,运营操作类,\"标题, 带逗号\",2024-01-01"));
        assert!(!dir.path().join("核心案例库").join("资料汇总.csv.tmp").exists());
    }

    #[test]
    fn test_append_renumbers_densely() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::in_folder(dir.path());

        let mut first: Vec<_> = (0..10)
            .map(|i| record("经营决策类", &format!("old {i}"), "2024-01-01"))
            .collect();
        ledger.write(&mut first).unwrap();

        let new: Vec<_> = (0..5)
            .map(|i| record("创新实践类", &format!("new {i}"), "2024-02-01"))
            .collect();
        let combined = ledger.append(&new).unwrap();

        let reread = ledger.read().unwrap();
        assert_eq!(combined, reread);
        let numbers: Vec<u64> = reread.iter().map(|r| r.sequence_number).collect();
        assert_eq!(numbers, (1..=15).collect::<Vec<u64>>());
        assert_eq!(reread[0].title, "old 0");
        assert_eq!(reread[14].title, "new 4");
    }

    #[test]
    fn test_append_nothing_does_not_create_file() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::in_folder(dir.path());
        assert!(ledger.append(&[]).unwrap().is_empty());
        assert!(!ledger.exists());
    }

    #[test]
    fn test_reads_hand_edited_ledger() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.csv");
        fs::write(
            &path,
            "序号,大类,小类,文档名称,入库日期,来源,发布日期\n7,核心案例库,运营操作类,A,2024/1/2,,\n,核心案例库,合规风控类,B,,,\n",
        )
        .unwrap();

        let records = Ledger::new(&path).read().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sequence_number, 7);
        assert_eq!(records[0].ingestion_date, "2024/1/2");
        assert_eq!(records[1].sequence_number, 0);
        assert_eq!(records[1].category, "合规风控类");
    }

    #[test]
    fn test_non_utf8_ledger_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.csv");
        fs::write(&path, [0xd0, 0xf2, 0xba, 0xc5]).unwrap();
        assert!(matches!(
            Ledger::new(&path).read(),
            Err(LedgerError::InvalidEncoding(_))
        ));
    }
}
