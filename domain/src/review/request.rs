//! Review request types: the immutable input to one consensus run.

use crate::core::error::DomainError;
use std::path::PathBuf;
use std::time::Duration;

/// Default time budget shared by every reviewer in a run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// One file of the artifact under review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    /// Path relative to the artifact root.
    pub path: String,
    pub content: String,
}

impl ArtifactFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// An immutable snapshot of the artifact plus the run parameters.
///
/// The request carries one `timeout` shared by all reviewers; the engine
/// derives a single deadline instant from it at dispatch time, so one slow
/// reviewer can neither extend the cycle nor starve the others.
#[derive(Debug, Clone)]
pub struct ReviewRequest {
    /// Root directory the file paths are relative to.
    pub artifact_root: PathBuf,
    /// Ordered file snapshot under review.
    pub files: Vec<ArtifactFile>,
    /// Identifier tying logs, outcomes, and the report together.
    pub correlation_id: String,
    /// Shared time budget for the whole run.
    pub timeout: Duration,
}

impl ReviewRequest {
    pub fn new(
        artifact_root: impl Into<PathBuf>,
        files: Vec<ArtifactFile>,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            artifact_root: artifact_root.into(),
            files,
            correlation_id: correlation_id.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Contract check performed by the engine before dispatch.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.correlation_id.trim().is_empty() {
            return Err(DomainError::MissingCorrelationId);
        }
        if self.files.is_empty() {
            return Err(DomainError::EmptyArtifact);
        }
        Ok(())
    }

    /// Total content size across all files, for logging.
    pub fn content_len(&self) -> usize {
        self.files.iter().map(|f| f.content.len()).sum()
    }
}
