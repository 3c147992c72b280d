//! Application layer for config-council
//!
//! Use cases orchestrating the review council, and the ports they consume.
//! Adapters (HTTP providers, filesystem, configuration files) live in the
//! infrastructure layer; this crate only knows the interfaces.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ReviewParams;
pub use ports::{
    artifact_source::{ArtifactError, ArtifactSource},
    progress::{NoProgress, ReviewProgress},
    reviewer_client::ReviewerClient,
};
pub use use_cases::{
    consensus_engine::{ConsensusEngine, EngineError},
    review_session::{ReviewSession, SessionRecord, DEFAULT_HISTORY_LIMIT},
};
