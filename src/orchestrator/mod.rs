//! Analysis orchestrator: local extraction pipeline + remote
//! enrichment state machine.
//!
//! `analyze_folder` runs the synchronous local phase on the calling
//! task and returns the local-only snapshot immediately; a spawned
//! background task then drives upload → analysis start (with retry) →
//! polling → merge, reporting progress only through the project store.

pub mod merge;
pub mod store;

pub use store::*;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::config::AnalysisConfig;
use crate::models::{
    DocumentRecord, JobState, ProjectSnapshot, RecordStatus, Severity, ValidationResult,
};
use crate::pipeline::{adapt, classify, extract_facts, validate, DecoderRegistry};
use crate::remote::{AnalysisClient, RemoteJobStatus};

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("failed to read folder {path}: {source}")]
    FolderRead {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Poll result for the foreground caller. The merged project is only
/// attached once the job is done; the local snapshot remains readable
/// through `list_projects` either way.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisStatus {
    #[serde(rename = "projectId")]
    pub project_id: String,
    /// `None` when no analysis was ever started for this project.
    pub status: Option<JobState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectSnapshot>,
}

/// Owns the project store and drives both analysis phases.
pub struct Orchestrator {
    config: AnalysisConfig,
    registry: DecoderRegistry,
    client: Arc<dyn AnalysisClient>,
    store: Arc<ProjectStore>,
}

impl Orchestrator {
    pub fn new(
        config: AnalysisConfig,
        registry: DecoderRegistry,
        client: Arc<dyn AnalysisClient>,
    ) -> Self {
        Self {
            config,
            registry,
            client,
            store: Arc::new(ProjectStore::new()),
        }
    }

    /// Analyze every supported file directly inside `path`.
    ///
    /// Local extraction, validation, and adaptation run before this
    /// returns; the remote phase never blocks the caller. The returned
    /// snapshot always carries `summary: None`.
    pub async fn analyze_folder(&self, path: &Path) -> Result<ProjectSnapshot, OrchestratorError> {
        let project_id = folder_name(path);
        let files = self.scan_folder(path)?;
        tracing::info!(project = %project_id, files = files.len(), "Analyzing folder");

        let mut parsed = Vec::new();
        for file in &files {
            let filename = file_name(file);
            match self.registry.decode(file) {
                Ok(text) => {
                    let mut doc = extract_facts(&filename, &text);
                    doc.doc_type = classify(&filename, &doc.raw_text, doc.doc_type);
                    parsed.push(doc);
                }
                Err(e) => {
                    tracing::warn!(file = %filename, error = %e, "Decode failed — skipping file");
                }
            }
        }

        let validation = validate(&parsed);
        tracing::info!(project = %project_id, summary = %validation.summary, "Validation finished");

        let mut records = adapt(&parsed);
        annotate_findings(&mut records, &validation);

        let warnings = records
            .iter()
            .filter(|r| r.status == RecordStatus::Warning)
            .count();

        let snapshot = ProjectSnapshot {
            id: project_id.clone(),
            name: project_id.clone(),
            file_count: records.len(),
            warnings,
            files: records,
            validation,
            summary: None,
        };

        let job_id = self.store.begin(snapshot.clone());

        let store = self.store.clone();
        let client = self.client.clone();
        let config = self.config.clone();
        tokio::spawn(async move {
            run_remote_phase(store, client, config, project_id, job_id, files).await;
        });

        Ok(snapshot)
    }

    /// Polling accessor for the enrichment phase.
    pub fn get_analysis_status(&self, project_id: &str) -> AnalysisStatus {
        let status = self.store.state(project_id);
        let project = if status == Some(JobState::Done) {
            self.store.snapshot(project_id)
        } else {
            None
        };
        AnalysisStatus {
            project_id: project_id.to_string(),
            status,
            project,
        }
    }

    /// All cached project snapshots.
    pub fn list_projects(&self) -> Vec<ProjectSnapshot> {
        self.store.snapshots()
    }

    /// Document records of one cached project.
    pub fn project_files(&self, project_id: &str) -> Vec<DocumentRecord> {
        self.store.files(project_id)
    }

    /// Supported files directly in `path`, sorted by name so ingestion
    /// order (and thus local id assignment) is deterministic. Numbered
    /// handover filenames sort in workflow order.
    fn scan_folder(&self, path: &Path) -> Result<Vec<PathBuf>, OrchestratorError> {
        let entries = std::fs::read_dir(path).map_err(|source| OrchestratorError::FolderRead {
            path: path.to_path_buf(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(error = %e, "Unreadable directory entry — skipping");
                    continue;
                }
            };
            let file = entry.path();
            if !file.is_file() {
                continue;
            }
            let Some(extension) = file.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if self.registry.supports(extension) {
                files.push(file);
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Project-level findings are also surfaced on the first record so a
/// record-level consumer cannot miss them.
fn annotate_findings(records: &mut [DocumentRecord], validation: &ValidationResult) {
    let Some(first) = records.first_mut() else {
        return;
    };
    for finding in &validation.findings {
        first.status = RecordStatus::Warning;
        let prefix = match finding.severity {
            Severity::Error => "[오류]",
            Severity::Warning => "[경고]",
        };
        let line = format!("{prefix} {}", finding.message);
        if first.message.is_empty() {
            first.message = line;
        } else {
            first.message = format!("{}\n{line}", first.message);
        }
    }
}

/// Background phase: health probe → upload → start (retried) → poll →
/// merge. All outcomes are reported through the store; nothing is ever
/// thrown back into the foreground path.
async fn run_remote_phase(
    store: Arc<ProjectStore>,
    client: Arc<dyn AnalysisClient>,
    config: AnalysisConfig,
    project_id: String,
    job_id: Uuid,
    files: Vec<PathBuf>,
) {
    if !store.set_state(&project_id, job_id, JobState::Analyzing) {
        tracing::debug!(project = %project_id, "Job superseded before remote phase started");
        return;
    }

    // Opportunistic liveness probe; failure is logged, not fatal.
    if let Err(e) = client.health().await {
        tracing::warn!(project = %project_id, error = %e, "Health probe failed");
    }

    if files.is_empty() {
        tracing::debug!(project = %project_id, "No files to upload");
    } else {
        match client.upload_files(&files).await {
            Ok(resp) => {
                tracing::info!(project = %project_id, uploaded = resp.uploaded.len(), "Upload complete");
            }
            Err(e) => {
                // Upload failure does not fail the job; the start call decides.
                tracing::warn!(project = %project_id, error = %e, "Upload failed");
            }
        }
    }

    let mut response = None;
    for attempt in 1..=config.max_start_attempts {
        match client.start_analysis().await {
            Ok(r) => {
                response = Some(r);
                break;
            }
            Err(e) if e.is_retryable() && attempt < config.max_start_attempts => {
                let backoff = config.retry_backoff * attempt;
                tracing::warn!(
                    project = %project_id,
                    attempt,
                    backoff_secs = backoff.as_secs(),
                    error = %e,
                    "Analysis start failed — retrying"
                );
                tokio::time::sleep(backoff).await;
            }
            Err(e) => {
                tracing::error!(project = %project_id, attempt, error = %e, "Analysis start failed");
                store.set_state(&project_id, job_id, JobState::Error);
                return;
            }
        }
    }
    let Some(response) = response else {
        store.set_state(&project_id, job_id, JobState::Error);
        return;
    };

    match response.task_id {
        Some(task_id) => {
            store.set_remote_task(&project_id, job_id, &task_id);
            tracing::info!(project = %project_id, task = %task_id, "Analysis started — polling");
            poll_and_merge(&store, client.as_ref(), &config, &project_id, job_id, &task_id).await;
        }
        None => {
            // Legacy servers answer synchronously.
            if response.success {
                if let Some(result) = response.result {
                    finish_merge(&store, &project_id, job_id, result);
                    return;
                }
            }
            tracing::error!(project = %project_id, "Analysis start returned neither task id nor result");
            store.set_state(&project_id, job_id, JobState::Error);
        }
    }
}

async fn poll_and_merge(
    store: &ProjectStore,
    client: &dyn AnalysisClient,
    config: &AnalysisConfig,
    project_id: &str,
    job_id: Uuid,
    task_id: &str,
) {
    for attempt in 1..=config.max_polls {
        tokio::time::sleep(config.poll_interval).await;

        let status = match client.job_status(task_id).await {
            Ok(s) => s,
            Err(e) => {
                // Transient poll failures never abort the job.
                tracing::debug!(project = %project_id, attempt, error = %e, "Poll failed — retrying");
                continue;
            }
        };

        match status.status {
            RemoteJobStatus::Done => {
                let result = status.result.unwrap_or_else(|| Value::Object(Default::default()));
                tracing::info!(project = %project_id, polls = attempt, "Remote analysis done");
                finish_merge(store, project_id, job_id, result);
                return;
            }
            RemoteJobStatus::Error => {
                tracing::error!(
                    project = %project_id,
                    error = status.error.as_deref().unwrap_or("unspecified"),
                    "Remote analysis failed"
                );
                store.set_state(project_id, job_id, JobState::Error);
                return;
            }
            RemoteJobStatus::Pending | RemoteJobStatus::Running => {}
        }
    }

    tracing::error!(project = %project_id, polls = config.max_polls, "Remote analysis timed out");
    store.set_state(project_id, job_id, JobState::Error);
}

fn finish_merge(store: &ProjectStore, project_id: &str, job_id: Uuid, result: Value) {
    let merged = store.update_snapshot(project_id, job_id, |snapshot| {
        let mapped = merge::merge_remote_result(snapshot, &result);
        tracing::info!(project = %project_id, mapped_ids = mapped, "Remote result merged");
    });
    if merged {
        store.set_state(project_id, job_id, JobState::Done);
    } else {
        tracing::debug!(project = %project_id, "Job superseded — discarding remote result");
    }
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
