//! Ports: interfaces the application layer consumes.
//!
//! Implementations (adapters) live in the infrastructure and presentation
//! layers and are injected at construction time.

pub mod artifact_source;
pub mod progress;
pub mod reviewer_client;

pub use artifact_source::{ArtifactError, ArtifactSource};
pub use progress::{NoProgress, ReviewProgress};
pub use reviewer_client::ReviewerClient;
