pub mod client;
pub mod types;

pub use client::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum RemoteError {
    #[error("cannot connect to analysis server at {0}")]
    Connection(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("analysis server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to read upload file: {0}")]
    UploadRead(String),

    #[error("failed to parse server response: {0}")]
    ResponseParsing(String),

    #[error("HTTP client error: {0}")]
    Http(String),
}

impl RemoteError {
    /// Transient transport failures worth retrying: connection refused,
    /// timeouts, and 5xx statuses (Cloudflare's 524 proxy timeout
    /// included).
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Timeout(_) => true,
            Self::Status { status, .. } => (500..=599).contains(status),
            _ => false,
        }
    }
}
