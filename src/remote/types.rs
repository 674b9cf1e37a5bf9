//! Wire types for the remote analysis server.
//!
//! The structured analysis payload itself stays a `serde_json::Value`:
//! its shape is owned by the server and consumed generically by the
//! merge step.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response to `POST /upload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub uploaded: Vec<String>,
}

/// Response to `POST /analyze`. Current servers return a task id for
/// polling; legacy servers answer synchronously with the result inline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
}

/// Response to `GET /analyze/status/{task_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: RemoteJobStatus,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteJobStatus {
    Pending,
    Running,
    Done,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_response_with_task_id() {
        let resp: AnalyzeResponse =
            serde_json::from_str(r#"{"success": true, "async": true, "task_id": "task-42"}"#)
                .unwrap();
        assert!(resp.success);
        assert_eq!(resp.task_id.as_deref(), Some("task-42"));
        assert!(resp.result.is_none());
    }

    #[test]
    fn legacy_synchronous_analyze_response() {
        let resp: AnalyzeResponse =
            serde_json::from_str(r#"{"success": true, "result": {"name": "벚꽃축제"}}"#).unwrap();
        assert!(resp.task_id.is_none());
        assert_eq!(resp.result.unwrap()["name"], "벚꽃축제");
    }

    #[test]
    fn status_response_variants() {
        let pending: StatusResponse = serde_json::from_str(r#"{"status": "pending"}"#).unwrap();
        assert_eq!(pending.status, RemoteJobStatus::Pending);

        let running: StatusResponse = serde_json::from_str(r#"{"status": "running"}"#).unwrap();
        assert_eq!(running.status, RemoteJobStatus::Running);

        let done: StatusResponse =
            serde_json::from_str(r#"{"status": "done", "result": {}}"#).unwrap();
        assert_eq!(done.status, RemoteJobStatus::Done);
        assert!(done.result.is_some());

        let failed: StatusResponse =
            serde_json::from_str(r#"{"status": "error", "error": "model crashed"}"#).unwrap();
        assert_eq!(failed.status, RemoteJobStatus::Error);
        assert_eq!(failed.error.as_deref(), Some("model crashed"));
    }

    #[test]
    fn upload_response_defaults() {
        let resp: UploadResponse = serde_json::from_str("{}").unwrap();
        assert!(!resp.success);
        assert!(resp.uploaded.is_empty());
    }
}
