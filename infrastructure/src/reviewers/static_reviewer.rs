//! Deterministic canned reviewer.
//!
//! The config-selectable test variant of the council: returns a fixed
//! response after an optional delay, with no network involved. Used for
//! offline smoke runs (`provider = "static"`) and deterministic tests.

use async_trait::async_trait;
use council_application::ReviewerClient;
use council_domain::{FailureReason, Finding, ReviewRequest};
use std::time::Duration;

/// Reviewer that always reports the same findings (or the same failure).
pub struct StaticReviewer {
    id: String,
    findings: Vec<Finding>,
    failure: Option<FailureReason>,
    delay: Duration,
}

impl StaticReviewer {
    /// A reviewer that reports nothing and approves everything.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            findings: Vec::new(),
            failure: None,
            delay: Duration::ZERO,
        }
    }

    pub fn with_findings(mut self, findings: Vec<Finding>) -> Self {
        self.findings = findings;
        self
    }

    pub fn with_failure(mut self, reason: FailureReason) -> Self {
        self.failure = Some(reason);
        self
    }

    /// Simulated latency before the canned response.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl ReviewerClient for StaticReviewer {
    fn id(&self) -> &str {
        &self.id
    }

    async fn review(&self, _request: &ReviewRequest) -> Result<Vec<Finding>, FailureReason> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.failure {
            Some(reason) => Err(reason.clone()),
            None => Ok(self.findings.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{ArtifactFile, Category, Location, Severity};

    fn request() -> ReviewRequest {
        ReviewRequest::new(
            "/tmp/demo",
            vec![ArtifactFile::new("CLAUDE.md", "# Project\n")],
            "review-static-test",
        )
    }

    #[tokio::test]
    async fn test_returns_canned_findings() {
        let finding = Finding::new(
            Severity::Low,
            Category::Improvement,
            Location::file("CLAUDE.md"),
            "canned finding",
        );
        let reviewer = StaticReviewer::new("static/smoke").with_findings(vec![finding.clone()]);

        let result = reviewer.review(&request()).await.unwrap();
        assert_eq!(result, vec![finding]);
    }

    #[tokio::test]
    async fn test_returns_canned_failure() {
        let reviewer =
            StaticReviewer::new("static/down").with_failure(FailureReason::RateLimited);
        let result = reviewer.review(&request()).await;
        assert_eq!(result, Err(FailureReason::RateLimited));
    }
}
