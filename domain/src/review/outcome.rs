//! Reviewer outcome types: the tagged result of one reviewer invocation.

use super::finding::Finding;
use super::report::ReviewerSummary;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a reviewer failed to contribute findings.
///
/// All four variants are reviewer-local: they downgrade that reviewer's
/// contribution to empty but never abort the engine run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The deadline elapsed before the provider responded.
    #[error("deadline exceeded before the reviewer responded")]
    Timeout,

    /// Network, DNS, or connection failure, or an unexpected HTTP status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider signalled backpressure.
    #[error("rate limited by the provider")]
    RateLimited,

    /// The provider answered, but the body could not be parsed into findings.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Result of one reviewer invocation. Exactly one outcome exists per
/// configured reviewer per engine run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewerOutcome {
    /// The reviewer that produced this outcome.
    pub reviewer: String,
    /// Findings reported on success; empty on failure.
    pub findings: Vec<Finding>,
    /// Failure reason, if the reviewer did not succeed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReason>,
}

impl ReviewerOutcome {
    /// Creates a successful outcome carrying the reviewer's findings.
    pub fn success(reviewer: impl Into<String>, findings: Vec<Finding>) -> Self {
        Self {
            reviewer: reviewer.into(),
            findings,
            failure: None,
        }
    }

    /// Creates a failed outcome; the reviewer contributes no findings.
    pub fn failure(reviewer: impl Into<String>, reason: FailureReason) -> Self {
        Self {
            reviewer: reviewer.into(),
            findings: Vec::new(),
            failure: Some(reason),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Diagnostic view embedded in the [`ConsensusReport`].
    ///
    /// [`ConsensusReport`]: super::report::ConsensusReport
    pub fn summary(&self) -> ReviewerSummary {
        ReviewerSummary {
            reviewer: self.reviewer.clone(),
            reported: self.findings.len(),
            failure: self.failure.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::finding::{Category, Location, Severity};

    #[test]
    fn test_success_outcome() {
        let finding = Finding::new(
            Severity::Low,
            Category::Improvement,
            Location::file("CLAUDE.md"),
            "could add examples",
        );
        let outcome = ReviewerOutcome::success("openai/gpt-5.2-codex", vec![finding]);
        assert!(outcome.is_success());
        assert_eq!(outcome.summary().reported, 1);
        assert!(outcome.summary().failure.is_none());
    }

    #[test]
    fn test_failure_outcome() {
        let outcome = ReviewerOutcome::failure("gemini/gemini-3-pro-preview", FailureReason::Timeout);
        assert!(!outcome.is_success());
        assert!(outcome.findings.is_empty());
        assert_eq!(outcome.summary().failure, Some(FailureReason::Timeout));
    }

    #[test]
    fn test_failure_reason_display() {
        assert_eq!(
            FailureReason::RateLimited.to_string(),
            "rate limited by the provider"
        );
        assert!(
            FailureReason::Transport("connection refused".into())
                .to_string()
                .contains("connection refused")
        );
    }
}
