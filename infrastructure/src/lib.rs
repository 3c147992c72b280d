//! Infrastructure layer for config-council
//!
//! Adapters for the application layer's ports: HTTP reviewer providers,
//! filesystem artifact snapshots, configuration files, credential lookup,
//! and the JSONL report log.

pub mod artifact;
pub mod config;
pub mod logging;
pub mod reviewers;
pub mod secrets;

// Re-export commonly used types
pub use artifact::FsArtifactSource;
pub use config::{
    default_config_toml, ConfigLoader, FileConfig, ProviderKind, ReviewerEntry,
};
pub use logging::JsonlReportLog;
pub use reviewers::{
    build_reviewers, GeminiReviewer, OpenAiReviewer, StaticReviewer,
};
pub use secrets::ApiKeyStore;
