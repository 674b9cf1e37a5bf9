//! Cross-document consistency checks over one analysis batch.
//!
//! Stateless and I/O-free: groups the batch by document category and
//! runs a fixed battery of checks against the administrative workflow
//! (기안 → 계약 → 집행 → 정산).

use std::collections::HashMap;

use crate::models::{
    format_thousands, DocType, FindingKind, ParsedDocument, Severity, ValidationFinding,
    ValidationResult, ValidationStatus,
};

/// Run every check over the batch. Only the earliest-ingested document
/// of each category participates in the pairwise checks; later
/// documents of the same category are treated as secondary copies.
pub fn validate(documents: &[ParsedDocument]) -> ValidationResult {
    let by_type = group_by_type(documents);
    let mut findings = Vec::new();

    check_required_documents(&by_type, &mut findings);
    check_amount_consistency(&by_type, &mut findings);
    check_date_order(&by_type, &mut findings);
    check_change_pair(&by_type, &mut findings);

    let errors = findings
        .iter()
        .filter(|f| f.severity == Severity::Error)
        .count();
    let warnings = findings.len() - errors;

    let status = if errors > 0 {
        ValidationStatus::Error
    } else if warnings > 0 {
        ValidationStatus::Warning
    } else {
        ValidationStatus::Ok
    };

    ValidationResult {
        status,
        summary: summarize(documents.len(), errors, warnings),
        findings,
    }
}

fn group_by_type<'a>(documents: &'a [ParsedDocument]) -> HashMap<DocType, Vec<&'a ParsedDocument>> {
    let mut groups: HashMap<DocType, Vec<&ParsedDocument>> = HashMap::new();
    for doc in documents {
        groups.entry(doc.doc_type).or_default().push(doc);
    }
    groups
}

fn primary<'a>(
    groups: &'a HashMap<DocType, Vec<&'a ParsedDocument>>,
    doc_type: DocType,
) -> Option<&'a ParsedDocument> {
    groups.get(&doc_type).and_then(|g| g.first().copied())
}

/// A proposal without any contract means the workflow stalled after
/// origination.
fn check_required_documents(
    groups: &HashMap<DocType, Vec<&ParsedDocument>>,
    findings: &mut Vec<ValidationFinding>,
) {
    let Some(proposal) = primary(groups, DocType::Proposal) else {
        return;
    };
    if groups.contains_key(&DocType::Contract) {
        return;
    }
    findings.push(ValidationFinding {
        kind: FindingKind::MissingDocument,
        severity: Severity::Warning,
        message: "기안서는 있는데 계약서가 없습니다".into(),
        related_filenames: vec![proposal.filename.clone()],
    });
}

/// Proposal and contract must agree on their first extracted amount.
fn check_amount_consistency(
    groups: &HashMap<DocType, Vec<&ParsedDocument>>,
    findings: &mut Vec<ValidationFinding>,
) {
    let (Some(proposal), Some(contract)) = (
        primary(groups, DocType::Proposal),
        primary(groups, DocType::Contract),
    ) else {
        return;
    };
    let (Some(proposal_amount), Some(contract_amount)) =
        (proposal.amounts.first(), contract.amounts.first())
    else {
        return;
    };
    if proposal_amount.value == contract_amount.value {
        return;
    }
    findings.push(ValidationFinding {
        kind: FindingKind::AmountMismatch,
        severity: Severity::Error,
        message: format!(
            "기안서 금액({}원)과 계약서 금액({}원)이 다릅니다",
            format_thousands(proposal_amount.value),
            format_thousands(contract_amount.value)
        ),
        related_filenames: vec![proposal.filename.clone(), contract.filename.clone()],
    });
}

/// The proposal must not postdate the contract. Normalized YYYY.MM.DD
/// strings compare correctly as plain strings.
fn check_date_order(
    groups: &HashMap<DocType, Vec<&ParsedDocument>>,
    findings: &mut Vec<ValidationFinding>,
) {
    let (Some(proposal), Some(contract)) = (
        primary(groups, DocType::Proposal),
        primary(groups, DocType::Contract),
    ) else {
        return;
    };
    let (Some(proposal_date), Some(contract_date)) =
        (proposal.dates.first(), contract.dates.first())
    else {
        return;
    };
    if proposal_date <= contract_date {
        return;
    }
    findings.push(ValidationFinding {
        kind: FindingKind::DateOrder,
        severity: Severity::Warning,
        message: format!(
            "기안 날짜({proposal_date})가 계약 날짜({contract_date})보다 늦습니다"
        ),
        related_filenames: vec![proposal.filename.clone(), contract.filename.clone()],
    });
}

/// A design-change document must be paired with a change contract.
fn check_change_pair(
    groups: &HashMap<DocType, Vec<&ParsedDocument>>,
    findings: &mut Vec<ValidationFinding>,
) {
    let Some(design_change) = primary(groups, DocType::DesignChange) else {
        return;
    };
    if groups.contains_key(&DocType::ChangeContract) {
        return;
    }
    findings.push(ValidationFinding {
        kind: FindingKind::MissingChangeContract,
        severity: Severity::Warning,
        message: "설계변경 기안은 있는데 변경계약서가 없습니다".into(),
        related_filenames: vec![design_change.filename.clone()],
    });
}

fn summarize(total: usize, errors: usize, warnings: usize) -> String {
    if errors > 0 {
        format!("{total}개 문서 검증 완료: {errors}개 오류, {warnings}개 경고")
    } else if warnings > 0 {
        format!("{total}개 문서 검증 완료: {warnings}개 경고")
    } else {
        format!("{total}개 문서 검증 완료: 문제 없음")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExtractedAmount;

    fn doc(
        filename: &str,
        doc_type: DocType,
        dates: &[&str],
        amounts: &[i64],
    ) -> ParsedDocument {
        ParsedDocument {
            filename: filename.into(),
            doc_type,
            dates: dates.iter().map(|d| d.to_string()).collect(),
            amounts: amounts
                .iter()
                .map(|&value| ExtractedAmount {
                    text: format!("{}원", format_thousands(value)),
                    value,
                })
                .collect(),
            parties: vec![],
            keywords: vec![],
            raw_text: String::new(),
        }
    }

    #[test]
    fn clean_pair_validates_ok() {
        let docs = vec![
            doc("01_기안.hwp", DocType::Proposal, &["2024.03.01"], &[50_000_000]),
            doc("02_계약서.hwp", DocType::Contract, &["2024.03.05"], &[50_000_000]),
        ];
        let result = validate(&docs);
        assert_eq!(result.status, ValidationStatus::Ok);
        assert!(result.findings.is_empty());
        assert_eq!(result.summary, "2개 문서 검증 완료: 문제 없음");
    }

    #[test]
    fn proposal_without_contract_warns() {
        let docs = vec![doc(
            "01_기안.hwp",
            DocType::Proposal,
            &["2024.03.01"],
            &[50_000_000],
        )];
        let result = validate(&docs);
        assert_eq!(result.status, ValidationStatus::Warning);
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].kind, FindingKind::MissingDocument);
        assert_eq!(result.findings[0].related_filenames, vec!["01_기안.hwp"]);
    }

    #[test]
    fn amount_mismatch_is_an_error() {
        let docs = vec![
            doc("01_기안.hwp", DocType::Proposal, &["2024.03.01"], &[50_000_000]),
            doc("02_계약서.hwp", DocType::Contract, &["2024.03.05"], &[30_000_000]),
        ];
        let result = validate(&docs);
        assert_eq!(result.status, ValidationStatus::Error);
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].kind, FindingKind::AmountMismatch);
        assert!(result.findings[0].message.contains("50,000,000원"));
        assert!(result.findings[0].message.contains("30,000,000원"));
        assert_eq!(result.summary, "2개 문서 검증 완료: 1개 오류, 0개 경고");
    }

    #[test]
    fn proposal_dated_after_contract_warns() {
        let docs = vec![
            doc("01_기안.hwp", DocType::Proposal, &["2024.03.10"], &[50_000_000]),
            doc("02_계약서.hwp", DocType::Contract, &["2024.03.05"], &[50_000_000]),
        ];
        let result = validate(&docs);
        assert_eq!(result.status, ValidationStatus::Warning);
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].kind, FindingKind::DateOrder);
        assert_eq!(result.summary, "2개 문서 검증 완료: 1개 경고");
    }

    #[test]
    fn design_change_without_change_contract_warns() {
        let docs = vec![
            doc("01_기안.hwp", DocType::Proposal, &[], &[]),
            doc("02_계약서.hwp", DocType::Contract, &[], &[]),
            doc("05_설계변경.hwp", DocType::DesignChange, &["2024.03.20"], &[]),
        ];
        let result = validate(&docs);
        let kinds: Vec<FindingKind> = result.findings.iter().map(|f| f.kind).collect();
        assert_eq!(kinds, vec![FindingKind::MissingChangeContract]);
    }

    #[test]
    fn empty_fact_lists_are_tolerated() {
        let docs = vec![
            doc("01_기안.hwp", DocType::Proposal, &[], &[]),
            doc("02_계약서.hwp", DocType::Contract, &[], &[]),
        ];
        let result = validate(&docs);
        assert_eq!(result.status, ValidationStatus::Ok);
    }

    #[test]
    fn only_earliest_document_per_type_participates() {
        // Second proposal disagrees with the contract, but only the
        // first proposal is compared.
        let docs = vec![
            doc("01_기안.hwp", DocType::Proposal, &["2024.03.01"], &[50_000_000]),
            doc("01b_기안_수정.hwp", DocType::Proposal, &["2024.04.01"], &[99_000_000]),
            doc("02_계약서.hwp", DocType::Contract, &["2024.03.05"], &[50_000_000]),
        ];
        let result = validate(&docs);
        assert_eq!(result.status, ValidationStatus::Ok);
    }

    #[test]
    fn checks_run_independently_and_accumulate() {
        // Mismatched amount AND reversed dates AND unpaired design change.
        let docs = vec![
            doc("01_기안.hwp", DocType::Proposal, &["2024.03.10"], &[50_000_000]),
            doc("02_계약서.hwp", DocType::Contract, &["2024.03.05"], &[30_000_000]),
            doc("05_설계변경.hwp", DocType::DesignChange, &[], &[]),
        ];
        let result = validate(&docs);
        assert_eq!(result.status, ValidationStatus::Error);
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.warning_count(), 2);
        assert_eq!(result.summary, "3개 문서 검증 완료: 1개 오류, 2개 경고");
    }

    #[test]
    fn empty_batch_validates_ok() {
        let result = validate(&[]);
        assert_eq!(result.status, ValidationStatus::Ok);
        assert_eq!(result.summary, "0개 문서 검증 완료: 문제 없음");
    }
}
