use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "HandoverAI";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File extensions the analyzer will consider at all. A file is only
/// picked up when a decoder is actually registered for its extension.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["hwp", "hwpx", "pdf", "txt", "docx", "xlsx", "md"];

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}

/// Get the application data directory (~/.local/share/HandoverAI or
/// platform equivalent; falls back to the home directory).
pub fn app_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .expect("Cannot determine data directory")
        .join(APP_NAME)
}

/// Default folder scanned when the caller does not supply one.
pub fn default_data_dir() -> PathBuf {
    app_data_dir().join("my_data")
}

/// Knobs for the remote enrichment phase. Defaults mirror the fixed
/// schedule of the analysis workflow: 3 start attempts with linear
/// 10s backoff, then a 5s poll for at most 10 minutes.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Base URL of the remote analysis server.
    pub remote_base_url: String,
    pub upload_timeout: Duration,
    pub start_timeout: Duration,
    pub status_timeout: Duration,
    pub health_timeout: Duration,
    /// Total attempts for the analysis-start call.
    pub max_start_attempts: u32,
    /// Backoff unit; attempt N waits N × this.
    pub retry_backoff: Duration,
    pub poll_interval: Duration,
    pub max_polls: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            remote_base_url: "http://localhost:8888".into(),
            upload_timeout: Duration::from_secs(300),
            start_timeout: Duration::from_secs(60),
            status_timeout: Duration::from_secs(10),
            health_timeout: Duration::from_secs(10),
            max_start_attempts: 3,
            retry_backoff: Duration::from_secs(10),
            poll_interval: Duration::from_secs(5),
            max_polls: 120,
        }
    }
}
