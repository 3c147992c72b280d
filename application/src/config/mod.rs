//! Application-level review parameters.
//!
//! Everything the engine and its collaborators need is passed in
//! explicitly at construction time (nothing is read from ambient global
//! state) so the engine stays testable and reentrant across concurrent
//! review cycles for different artifacts.

use council_domain::{DedupConfig, Deduplicator, DomainError};
use std::time::Duration;

/// Tunable parameters for one review council, typically produced from the
/// infrastructure layer's file configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewParams {
    /// Shared time budget per review cycle.
    pub timeout: Duration,
    /// Line window within which two anchors count as the same issue.
    pub line_tolerance: u32,
    /// Minimum message similarity for a duplicate pair.
    pub similarity_threshold: f64,
    /// Providers drop findings they are less confident about than this.
    pub min_confidence: u8,
    /// Past reports retained by the session.
    pub history_limit: usize,
}

impl Default for ReviewParams {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            line_tolerance: 3,
            similarity_threshold: 0.6,
            min_confidence: 80,
            history_limit: crate::use_cases::review_session::DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl ReviewParams {
    /// Build the deduplicator these parameters describe.
    pub fn deduplicator(&self) -> Result<Deduplicator, DomainError> {
        Ok(Deduplicator::new(DedupConfig::new(
            self.line_tolerance,
            self.similarity_threshold,
        )?))
    }
}
