//! Artifact source port
//!
//! Supplies the immutable file snapshot a review request is built from.

use council_domain::ArtifactFile;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while snapshotting an artifact tree.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("artifact root {0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("no reviewable files found under {0}")]
    Empty(PathBuf),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Provides the ordered list of files forming the artifact under review.
///
/// The snapshot is taken once per request; the engine treats it as opaque
/// and immutable for the duration of the review cycle.
pub trait ArtifactSource: Send + Sync {
    fn snapshot(&self, root: &Path) -> Result<Vec<ArtifactFile>, ArtifactError>;
}
