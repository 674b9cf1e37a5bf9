use serde::{Deserialize, Serialize};

use super::enums::{DocType, RecordStatus};

/// A monetary amount as it appeared in the text, plus its numeric value.
/// Identity is the numeric value — two amounts with different surface
/// forms but the same value are the same amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedAmount {
    pub text: String,
    #[serde(rename = "amount")]
    pub value: i64,
}

impl PartialEq for ExtractedAmount {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for ExtractedAmount {}

impl std::hash::Hash for ExtractedAmount {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

/// Structured facts pulled out of one source file. Built once per file
/// by the extraction stage and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub filename: String,
    #[serde(rename = "type")]
    pub doc_type: DocType,
    /// Normalized `YYYY.MM.DD` date strings, deduplicated.
    pub dates: Vec<String>,
    pub amounts: Vec<ExtractedAmount>,
    pub parties: Vec<String>,
    pub keywords: Vec<String>,
    pub raw_text: String,
}

impl ParsedDocument {
    /// Distinct amount values in this document, in first-seen order.
    fn distinct_values(&self) -> Vec<i64> {
        let mut seen = Vec::new();
        for a in &self.amounts {
            if !seen.contains(&a.value) {
                seen.push(a.value);
            }
        }
        seen
    }

    /// A document carrying more than one distinct amount value is
    /// internally inconsistent.
    pub fn has_conflict(&self) -> bool {
        self.distinct_values().len() > 1
    }

    /// Warning text listing all conflicting values, largest first.
    /// Empty when there is no conflict.
    pub fn conflict_message(&self) -> String {
        let mut values = self.distinct_values();
        if values.len() <= 1 {
            return String::new();
        }
        values.sort_unstable_by(|a, b| b.cmp(a));
        let listed: Vec<String> = values
            .iter()
            .map(|v| format!("{}원", format_thousands(*v)))
            .collect();
        format!("[경고] 금액 불일치 ({})", listed.join(" vs "))
    }
}

/// The externally-facing per-document record. Ids are assigned by local
/// ingestion order (`doc_00`, `doc_01`, …) and stay stable for the
/// lifetime of the project snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub name: String,
    /// Representative date, or the "날짜 없음" sentinel.
    pub date: String,
    pub all_dates: Vec<String>,
    #[serde(rename = "docType")]
    pub doc_type: DocType,
    /// Derived title: first non-blank line of the raw text.
    pub summary: String,
    /// Representative amount; 0 when the document carries none.
    pub amount: i64,
    pub all_amounts: Vec<ExtractedAmount>,
    pub parties: Vec<String>,
    pub keywords: Vec<String>,
    pub status: RecordStatus,
    pub message: String,
    pub raw_text: String,
    pub children: Option<Vec<DocumentRecord>>,
}

/// Group an integer with thousands separators: 50000000 → "50,000,000".
pub fn format_thousands(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if negative {
        format!("-{out}")
    } else {
        out
    }
}
