//! Response adaptation: parsed facts → externally-facing records.
//!
//! Collapses the extracted fact lists into one representative value per
//! document and assigns the local identifier space. Re-adapting the
//! same input yields byte-identical records.

use crate::models::{DocumentRecord, ParsedDocument, RecordStatus};

/// Sentinel for documents with no extractable date.
const NO_DATE: &str = "날짜 없음";

/// Sentinel for documents with no usable title line.
const NO_TITLE: &str = "제목 없음";

/// Maximum title length, in characters.
const TITLE_MAX_CHARS: usize = 50;

/// Adapt a batch in ingestion order; the index becomes the local id
/// (`doc_00`, `doc_01`, …).
pub fn adapt(documents: &[ParsedDocument]) -> Vec<DocumentRecord> {
    documents
        .iter()
        .enumerate()
        .map(|(index, doc)| adapt_document(doc, index))
        .collect()
}

/// Adapt one parsed document into its record shape.
pub fn adapt_document(doc: &ParsedDocument, index: usize) -> DocumentRecord {
    let has_conflict = doc.has_conflict();

    DocumentRecord {
        id: format!("doc_{index:02}"),
        name: doc.filename.clone(),
        date: select_primary_date(&doc.dates),
        all_dates: doc.dates.clone(),
        doc_type: doc.doc_type,
        summary: extract_title(&doc.raw_text),
        amount: select_primary_amount(doc),
        all_amounts: doc.amounts.clone(),
        parties: doc.parties.clone(),
        keywords: doc.keywords.clone(),
        status: if has_conflict {
            RecordStatus::Warning
        } else {
            RecordStatus::Normal
        },
        message: doc.conflict_message(),
        raw_text: doc.raw_text.clone(),
        children: None,
    }
}

/// Earliest date wins — for these documents that is most likely the
/// origination date. Normalized strings sort chronologically.
fn select_primary_date(dates: &[String]) -> String {
    dates
        .iter()
        .min()
        .cloned()
        .unwrap_or_else(|| NO_DATE.to_string())
}

/// Largest amount wins — most likely the headline budget figure.
fn select_primary_amount(doc: &ParsedDocument) -> i64 {
    doc.amounts.iter().map(|a| a.value).max().unwrap_or(0)
}

/// First non-blank line of the raw text, truncated to 50 characters.
fn extract_title(raw_text: &str) -> String {
    let Some(line) = raw_text.lines().map(str::trim).find(|l| !l.is_empty()) else {
        return NO_TITLE.to_string();
    };
    line.chars().take(TITLE_MAX_CHARS).collect()
}
