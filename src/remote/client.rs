//! HTTP client for the remote analysis server.
//!
//! Trait-based so the orchestrator can run against a mock in tests.
//! Per-call timeouts come from `AnalysisConfig`; retry policy lives
//! with the orchestrator, not here.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::types::{AnalyzeResponse, StatusResponse, UploadResponse};
use super::RemoteError;
use crate::config::AnalysisConfig;

/// The remote analysis collaborator, as the orchestrator sees it.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Liveness probe, consumed opportunistically.
    async fn health(&self) -> Result<(), RemoteError>;

    /// Upload the project's source files as one multipart set.
    async fn upload_files(&self, paths: &[PathBuf]) -> Result<UploadResponse, RemoteError>;

    /// Ask the server to start analyzing the uploaded set.
    async fn start_analysis(&self) -> Result<AnalyzeResponse, RemoteError>;

    /// Poll one analysis job.
    async fn job_status(&self, task_id: &str) -> Result<StatusResponse, RemoteError>;
}

/// Production client backed by reqwest.
pub struct HttpAnalysisClient {
    base_url: String,
    client: reqwest::Client,
    upload_timeout: Duration,
    start_timeout: Duration,
    status_timeout: Duration,
    health_timeout: Duration,
}

impl HttpAnalysisClient {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            base_url: config.remote_base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            upload_timeout: config.upload_timeout,
            start_timeout: config.start_timeout,
            status_timeout: config.status_timeout,
            health_timeout: config.health_timeout,
        }
    }

    fn transport_error(&self, e: reqwest::Error, timeout: Duration) -> RemoteError {
        if e.is_connect() {
            RemoteError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            RemoteError::Timeout(timeout.as_secs())
        } else {
            RemoteError::Http(e.to_string())
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl AnalysisClient for HttpAnalysisClient {
    async fn health(&self) -> Result<(), RemoteError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(self.health_timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e, self.health_timeout))?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn upload_files(&self, paths: &[PathBuf]) -> Result<UploadResponse, RemoteError> {
        let url = format!("{}/upload", self.base_url);

        let mut form = reqwest::multipart::Form::new();
        for path in paths {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| RemoteError::UploadRead(format!("{}: {e}", path.display())))?;
            let filename = file_name(path);
            form = form.part(
                "files",
                reqwest::multipart::Part::bytes(bytes).file_name(filename),
            );
        }

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .timeout(self.upload_timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e, self.upload_timeout))?;
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| RemoteError::ResponseParsing(e.to_string()))
    }

    async fn start_analysis(&self) -> Result<AnalyzeResponse, RemoteError> {
        let url = format!("{}/analyze", self.base_url);
        let response = self
            .client
            .post(&url)
            .timeout(self.start_timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e, self.start_timeout))?;
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| RemoteError::ResponseParsing(e.to_string()))
    }

    async fn job_status(&self, task_id: &str) -> Result<StatusResponse, RemoteError> {
        let url = format!("{}/analyze/status/{task_id}", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(self.status_timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e, self.status_timeout))?;
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| RemoteError::ResponseParsing(e.to_string()))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Mock client for tests — scripted responses, call counters.
pub struct MockAnalysisClient {
    start_script: Mutex<VecDeque<Result<AnalyzeResponse, RemoteError>>>,
    status_script: Mutex<VecDeque<Result<StatusResponse, RemoteError>>>,
    pub health_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
    pub start_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    uploaded: Mutex<Vec<String>>,
}

impl MockAnalysisClient {
    pub fn new() -> Self {
        Self {
            start_script: Mutex::new(VecDeque::new()),
            status_script: Mutex::new(VecDeque::new()),
            health_calls: AtomicUsize::new(0),
            upload_calls: AtomicUsize::new(0),
            start_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            uploaded: Mutex::new(Vec::new()),
        }
    }

    /// Queue the next `start_analysis` outcome (FIFO).
    pub fn push_start(&self, response: Result<AnalyzeResponse, RemoteError>) {
        self.start_script.lock().unwrap().push_back(response);
    }

    /// Queue the next `job_status` outcome (FIFO).
    pub fn push_status(&self, response: Result<StatusResponse, RemoteError>) {
        self.status_script.lock().unwrap().push_back(response);
    }

    /// Filenames seen by `upload_files`.
    pub fn uploaded_names(&self) -> Vec<String> {
        self.uploaded.lock().unwrap().clone()
    }
}

impl Default for MockAnalysisClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalysisClient for MockAnalysisClient {
    async fn health(&self) -> Result<(), RemoteError> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn upload_files(&self, paths: &[PathBuf]) -> Result<UploadResponse, RemoteError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        let names: Vec<String> = paths.iter().map(|p| file_name(p)).collect();
        self.uploaded.lock().unwrap().extend(names.clone());
        Ok(UploadResponse {
            success: true,
            uploaded: names,
        })
    }

    async fn start_analysis(&self) -> Result<AnalyzeResponse, RemoteError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        self.start_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(RemoteError::Http("mock: no scripted start response".into()))
            })
    }

    async fn job_status(&self, _task_id: &str) -> Result<StatusResponse, RemoteError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.status_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(RemoteError::Http("mock: no scripted status response".into()))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::types::RemoteJobStatus;

    #[test]
    fn http_client_trims_trailing_slash() {
        let config = AnalysisConfig {
            remote_base_url: "http://localhost:8888/".into(),
            ..AnalysisConfig::default()
        };
        let client = HttpAnalysisClient::new(&config);
        assert_eq!(client.base_url, "http://localhost:8888");
    }

    #[tokio::test]
    async fn mock_scripts_start_responses_in_order() {
        let mock = MockAnalysisClient::new();
        mock.push_start(Err(RemoteError::Status {
            status: 503,
            body: String::new(),
        }));
        mock.push_start(Ok(AnalyzeResponse {
            success: true,
            task_id: Some("task-1".into()),
            result: None,
        }));

        assert!(mock.start_analysis().await.is_err());
        let ok = mock.start_analysis().await.unwrap();
        assert_eq!(ok.task_id.as_deref(), Some("task-1"));
        assert_eq!(mock.start_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn mock_records_uploaded_filenames() {
        let mock = MockAnalysisClient::new();
        let paths = vec![PathBuf::from("/tmp/01_기안.hwp"), PathBuf::from("/tmp/02_계약서.hwp")];
        let resp = mock.upload_files(&paths).await.unwrap();
        assert!(resp.success);
        assert_eq!(mock.uploaded_names(), vec!["01_기안.hwp", "02_계약서.hwp"]);
    }

    #[tokio::test]
    async fn mock_status_script_drains_to_error() {
        let mock = MockAnalysisClient::new();
        mock.push_status(Ok(StatusResponse {
            status: RemoteJobStatus::Running,
            result: None,
            error: None,
        }));

        assert_eq!(
            mock.job_status("t").await.unwrap().status,
            RemoteJobStatus::Running
        );
        assert!(mock.job_status("t").await.is_err());
    }
}
