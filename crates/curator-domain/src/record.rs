//! Ledger rows

use serde::{Deserialize, Deserializer, Serialize};

/// One row of the summary ledger
///
/// Column headers are the ones the deployed ledger has always used:
/// `序号,大类,小类,文档名称,入库日期,来源,发布日期`. Dates are kept as text so
/// that hand-edited rows with odd dates survive a read/write cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Dense 1..N row number, reassigned on every write
    #[serde(rename = "序号", deserialize_with = "lenient_sequence", default)]
    pub sequence_number: u64,

    /// Top-level group label
    #[serde(rename = "大类", default)]
    pub group_label: String,

    /// Assigned category
    #[serde(rename = "小类", default)]
    pub category: String,

    /// Document title
    #[serde(rename = "文档名称", default)]
    pub title: String,

    /// Date the document was stored (`YYYY-MM-DD`)
    #[serde(rename = "入库日期", default)]
    pub ingestion_date: String,

    /// Link to the original article
    #[serde(rename = "来源", default)]
    pub source_link: String,

    /// Publish date of the original article (`YYYY-MM-DD`)
    #[serde(rename = "发布日期", default)]
    pub publish_date: String,
}

/// Column headers in write order
pub const LEDGER_HEADERS: [&str; 7] = ["序号", "大类", "小类", "文档名称", "入库日期", "来源", "发布日期"];

fn lenient_sequence<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().parse::<f64>().map(|n| n as u64).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_field_names_match_headers() {
        let record = LedgerRecord {
            sequence_number: 1,
            group_label: "核心案例库".to_string(),
            category: "运营操作类".to_string(),
            title: "t".to_string(),
            ingestion_date: "2024-01-01".to_string(),
            source_link: String::new(),
            publish_date: String::new(),
        };
        let value = serde_json::to_value(&record).unwrap();
        for header in LEDGER_HEADERS {
            assert!(value.get(header).is_some(), "missing {header}");
        }
    }

    #[test]
    fn test_sequence_accepts_float_and_garbage() {
        let record: LedgerRecord =
            serde_json::from_str(r#"{"序号": "3.0", "小类": "a"}"#).unwrap();
        assert_eq!(record.sequence_number, 3);
        let record: LedgerRecord = serde_json::from_str(r#"{"序号": "n/a"}"#).unwrap();
        assert_eq!(record.sequence_number, 0);
    }
}
