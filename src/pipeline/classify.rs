//! Document classification: filename/keyword heuristics → category.

use crate::models::DocType;

/// Trigger keywords per category. Order is significant: the change
/// categories must be probed before the generic contract category so
/// that "변경계약서" never lands on plain `Contract`, and a specific
/// design-change filename never lands on `ChangeContract`.
const TRIGGER_TABLE: &[(DocType, &[&str])] = &[
    (DocType::DesignChange, &["설계변경"]),
    (DocType::ChangeContract, &["변경계약", "변경"]),
    (DocType::Contract, &["계약서", "계약", "용역"]),
    (DocType::Proposal, &["기안", "품의"]),
    (DocType::Completion, &["준공", "검수", "납품"]),
    (DocType::Expenditure, &["지출", "정산", "집행", "결산"]),
];

/// Assign a document category.
///
/// A specific upstream type is trusted verbatim. Otherwise the filename
/// is matched against the trigger table first (higher precision), then
/// the full text; the first matching table row wins. A document that
/// matches nothing stays uncategorized — there is no retry.
pub fn classify(filename: &str, raw_text: &str, upstream: DocType) -> DocType {
    if upstream != DocType::Uncategorized {
        return upstream;
    }

    let filename = filename.to_lowercase();
    for (doc_type, triggers) in TRIGGER_TABLE {
        if triggers.iter().any(|kw| filename.contains(kw)) {
            return *doc_type;
        }
    }

    let text = raw_text.to_lowercase();
    for (doc_type, triggers) in TRIGGER_TABLE {
        if triggers.iter().any(|kw| text.contains(kw)) {
            return *doc_type;
        }
    }

    DocType::Uncategorized
}
