//! handover — analyzer for public-institution handover document sets.
//!
//! Three stages: local fact extraction with workflow consistency
//! checks (synchronous, never blocks on the network), remote AI
//! enrichment (background task per analysis), and a structural merge
//! that rewrites the remote service's file identifiers into the local
//! identifier space.
//!
//! Format decoding is a collaborator concern — register one
//! [`pipeline::TextDecoder`] per file extension and hand the registry
//! to the [`Orchestrator`].

pub mod config;
pub mod models;
pub mod orchestrator;
pub mod pipeline;
pub mod remote;

pub use config::AnalysisConfig;
pub use models::{
    DocumentRecord, ExtractedAmount, ParsedDocument, ProjectSnapshot, ValidationFinding,
    ValidationResult,
};
pub use orchestrator::{AnalysisStatus, Orchestrator, OrchestratorError};
pub use pipeline::{DecoderRegistry, TextDecoder};
pub use remote::{AnalysisClient, HttpAnalysisClient, RemoteError};

use tracing_subscriber::EnvFilter;

/// Initialize tracing for binaries embedding the analyzer. Library
/// callers with their own subscriber should skip this.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
