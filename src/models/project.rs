use serde::{Deserialize, Serialize};

use super::document::DocumentRecord;
use super::enums::{FindingKind, Severity, ValidationStatus};

/// One issue surfaced by the cross-document consistency checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationFinding {
    #[serde(rename = "type")]
    pub kind: FindingKind,
    pub severity: Severity,
    pub message: String,
    #[serde(rename = "relatedFilenames")]
    pub related_filenames: Vec<String>,
}

/// Outcome of a validator run over one batch of parsed documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub status: ValidationStatus,
    pub findings: Vec<ValidationFinding>,
    /// One-line human-readable count summary.
    pub summary: String,
}

impl ValidationResult {
    pub fn warning_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count()
    }
}

/// Aggregate result for one analyzed folder. `summary` stays `None`
/// until the remote enrichment phase merges its output in; by then it
/// contains only local-space identifiers in fileId positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub id: String,
    pub name: String,
    #[serde(rename = "fileCount")]
    pub file_count: usize,
    /// Number of records currently flagged with warning status.
    pub warnings: usize,
    pub files: Vec<DocumentRecord>,
    pub validation: ValidationResult,
    pub summary: Option<serde_json::Value>,
}
