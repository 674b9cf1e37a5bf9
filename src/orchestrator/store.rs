//! Keyed store for per-project analysis jobs and cached snapshots.
//!
//! One entry per project id; starting a new analysis replaces the
//! entry atomically. Every write from a background task carries the
//! job token it was spawned with — writes from a superseded job are
//! rejected, so an orphaned task can never touch the replacement entry.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use crate::models::{DocumentRecord, JobState, ProjectSnapshot};

/// State for one analysis job. Owned exclusively by the store.
#[derive(Debug, Clone)]
pub struct ProjectEntry {
    pub job_id: Uuid,
    pub state: JobState,
    pub remote_task_id: Option<String>,
    pub snapshot: ProjectSnapshot,
}

/// Shared project cache: foreground creates entries and reads status,
/// the owning background task mutates state and merges results.
pub struct ProjectStore {
    inner: Mutex<HashMap<String, ProjectEntry>>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Register a fresh job for the snapshot's project id, superseding
    /// any previous job. Returns the token the owning task must present
    /// on every subsequent write.
    pub fn begin(&self, snapshot: ProjectSnapshot) -> Uuid {
        let job_id = Uuid::new_v4();
        let entry = ProjectEntry {
            job_id,
            state: JobState::Pending,
            remote_task_id: None,
            snapshot,
        };
        self.inner
            .lock()
            .unwrap()
            .insert(entry.snapshot.id.clone(), entry);
        job_id
    }

    /// Transition the job state. Refused when the token is stale or the
    /// job already reached a terminal state.
    pub fn set_state(&self, project_id: &str, job_id: Uuid, state: JobState) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let Some(entry) = inner.get_mut(project_id) else {
            return false;
        };
        if entry.job_id != job_id || entry.state.is_terminal() {
            return false;
        }
        entry.state = state;
        true
    }

    /// Record the remote task id for an in-flight job.
    pub fn set_remote_task(&self, project_id: &str, job_id: Uuid, task_id: &str) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let Some(entry) = inner.get_mut(project_id) else {
            return false;
        };
        if entry.job_id != job_id {
            return false;
        }
        entry.remote_task_id = Some(task_id.to_string());
        true
    }

    /// Mutate the cached snapshot under the lock. Refused for stale
    /// tokens, so a superseded merge is dropped whole.
    pub fn update_snapshot<F>(&self, project_id: &str, job_id: Uuid, mutate: F) -> bool
    where
        F: FnOnce(&mut ProjectSnapshot),
    {
        let mut inner = self.inner.lock().unwrap();
        let Some(entry) = inner.get_mut(project_id) else {
            return false;
        };
        if entry.job_id != job_id {
            return false;
        }
        mutate(&mut entry.snapshot);
        true
    }

    pub fn state(&self, project_id: &str) -> Option<JobState> {
        self.inner.lock().unwrap().get(project_id).map(|e| e.state)
    }

    pub fn snapshot(&self, project_id: &str) -> Option<ProjectSnapshot> {
        self.inner
            .lock()
            .unwrap()
            .get(project_id)
            .map(|e| e.snapshot.clone())
    }

    /// All cached snapshots, in unspecified order.
    pub fn snapshots(&self) -> Vec<ProjectSnapshot> {
        self.inner
            .lock()
            .unwrap()
            .values()
            .map(|e| e.snapshot.clone())
            .collect()
    }

    pub fn files(&self, project_id: &str) -> Vec<DocumentRecord> {
        self.inner
            .lock()
            .unwrap()
            .get(project_id)
            .map(|e| e.snapshot.files.clone())
            .unwrap_or_default()
    }
}

impl Default for ProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ValidationResult, ValidationStatus};

    fn snapshot(id: &str) -> ProjectSnapshot {
        ProjectSnapshot {
            id: id.into(),
            name: id.into(),
            file_count: 0,
            warnings: 0,
            files: vec![],
            validation: ValidationResult {
                status: ValidationStatus::Ok,
                findings: vec![],
                summary: "0개 문서 검증 완료: 문제 없음".into(),
            },
            summary: None,
        }
    }

    #[test]
    fn begin_starts_pending() {
        let store = ProjectStore::new();
        store.begin(snapshot("festival"));
        assert_eq!(store.state("festival"), Some(JobState::Pending));
    }

    #[test]
    fn owning_job_walks_the_state_machine() {
        let store = ProjectStore::new();
        let job = store.begin(snapshot("festival"));
        assert!(store.set_state("festival", job, JobState::Analyzing));
        assert!(store.set_state("festival", job, JobState::Done));
        assert_eq!(store.state("festival"), Some(JobState::Done));
    }

    #[test]
    fn terminal_state_is_never_left() {
        let store = ProjectStore::new();
        let job = store.begin(snapshot("festival"));
        assert!(store.set_state("festival", job, JobState::Error));
        assert!(!store.set_state("festival", job, JobState::Analyzing));
        assert_eq!(store.state("festival"), Some(JobState::Error));
    }

    #[test]
    fn superseded_job_cannot_write() {
        let store = ProjectStore::new();
        let old_job = store.begin(snapshot("festival"));
        let new_job = store.begin(snapshot("festival"));

        // The orphaned task keeps running but every write is refused.
        assert!(!store.set_state("festival", old_job, JobState::Done));
        assert!(!store.update_snapshot("festival", old_job, |s| {
            s.name = "stale".into();
        }));

        assert_eq!(store.state("festival"), Some(JobState::Pending));
        assert!(store.set_state("festival", new_job, JobState::Analyzing));
        assert_eq!(store.snapshot("festival").unwrap().name, "festival");
    }

    #[test]
    fn update_snapshot_mutates_under_lock() {
        let store = ProjectStore::new();
        let job = store.begin(snapshot("festival"));
        assert!(store.update_snapshot("festival", job, |s| {
            s.name = "벚꽃축제 인수인계".into();
            s.summary = Some(serde_json::json!({"overview": {}}));
        }));
        let snap = store.snapshot("festival").unwrap();
        assert_eq!(snap.name, "벚꽃축제 인수인계");
        assert!(snap.summary.is_some());
    }

    #[test]
    fn unknown_project_reads_empty() {
        let store = ProjectStore::new();
        assert_eq!(store.state("nope"), None);
        assert!(store.snapshot("nope").is_none());
        assert!(store.files("nope").is_empty());
    }

    #[test]
    fn projects_are_independent() {
        let store = ProjectStore::new();
        let a = store.begin(snapshot("a"));
        let _b = store.begin(snapshot("b"));
        assert!(store.set_state("a", a, JobState::Done));
        assert_eq!(store.state("b"), Some(JobState::Pending));
        assert_eq!(store.snapshots().len(), 2);
    }
}
