//! Review session use case
//!
//! Top-level entry point for the CLI layer: owns one engine invocation per
//! review cycle, records outcomes in a bounded history, and exposes the
//! retry policy.

use crate::ports::progress::{NoProgress, ReviewProgress};
use crate::ports::reviewer_client::ReviewerClient;
use crate::use_cases::consensus_engine::{ConsensusEngine, EngineError};
use chrono::{DateTime, Utc};
use council_domain::{ConsensusReport, ReviewRequest};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

/// Default number of past reports retained for audit/debugging.
pub const DEFAULT_HISTORY_LIMIT: usize = 16;

/// One completed review cycle in the session history.
///
/// The report inside is a value: recorded once, never mutated.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionRecord {
    pub completed_at: DateTime<Utc>,
    pub report: ConsensusReport,
}

/// Drives the "review, fix, review again" loop for one artifact.
///
/// The session itself never retries: a `fail` verdict means the caller is
/// expected to apply fixes and run another cycle, while `indeterminate`
/// signals reviewer unavailability and needs human attention.
pub struct ReviewSession {
    engine: ConsensusEngine,
    reviewers: Vec<Arc<dyn ReviewerClient>>,
    history: VecDeque<SessionRecord>,
    history_limit: usize,
}

impl ReviewSession {
    pub fn new(engine: ConsensusEngine, reviewers: Vec<Arc<dyn ReviewerClient>>) -> Self {
        Self {
            engine,
            reviewers,
            history: VecDeque::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Cap the retained history; a limit of zero is clamped to one so the
    /// latest report is always available.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    /// Identifiers of the configured council, in dispatch order.
    pub fn reviewer_ids(&self) -> Vec<&str> {
        self.reviewers.iter().map(|r| r.id()).collect()
    }

    /// Run one review cycle and record the report.
    pub async fn run_cycle(
        &mut self,
        request: ReviewRequest,
    ) -> Result<ConsensusReport, EngineError> {
        self.run_cycle_with_progress(request, &NoProgress).await
    }

    /// Run one review cycle with progress callbacks.
    pub async fn run_cycle_with_progress(
        &mut self,
        request: ReviewRequest,
        progress: &dyn ReviewProgress,
    ) -> Result<ConsensusReport, EngineError> {
        let report = self
            .engine
            .run_with_progress(request, &self.reviewers, progress)
            .await?;

        self.history.push_back(SessionRecord {
            completed_at: Utc::now(),
            report: report.clone(),
        });
        while self.history.len() > self.history_limit {
            self.history.pop_front();
        }
        debug!(
            cycles = self.history.len(),
            verdict = %report.verdict,
            "review cycle recorded"
        );

        Ok(report)
    }

    /// True iff the caller should fix the artifact and run another cycle.
    ///
    /// `indeterminate` deliberately returns false: it usually means the
    /// council was unavailable, not that the artifact is fixable.
    pub fn should_retry(report: &ConsensusReport) -> bool {
        report.verdict.is_fail()
    }

    /// Past cycles, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &SessionRecord> {
        self.history.iter()
    }

    pub fn last_report(&self) -> Option<&ConsensusReport> {
        self.history.back().map(|record| &record.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use council_domain::{
        ArtifactFile, Category, DedupConfig, Deduplicator, FailureReason, Finding, Location,
        Severity, Verdict,
    };

    struct CannedReviewer {
        id: String,
        findings: Vec<Finding>,
    }

    #[async_trait]
    impl ReviewerClient for CannedReviewer {
        fn id(&self) -> &str {
            &self.id
        }

        async fn review(
            &self,
            _request: &ReviewRequest,
        ) -> Result<Vec<Finding>, FailureReason> {
            Ok(self.findings.clone())
        }
    }

    fn session(findings: Vec<Finding>) -> ReviewSession {
        let engine = ConsensusEngine::new(Deduplicator::new(DedupConfig::default()));
        let reviewers: Vec<Arc<dyn ReviewerClient>> = vec![Arc::new(CannedReviewer {
            id: "static/canned".into(),
            findings,
        })];
        ReviewSession::new(engine, reviewers)
    }

    fn request() -> ReviewRequest {
        ReviewRequest::new(
            "/tmp/artifact",
            vec![ArtifactFile::new("CLAUDE.md", "# Project\n")],
            "review-session-test",
        )
    }

    fn blocking_finding() -> Finding {
        Finding::new(
            Severity::Critical,
            Category::Security,
            Location::new("CLAUDE.md", Some(2)),
            "secrets inlined in project instructions",
        )
    }

    #[tokio::test]
    async fn test_should_retry_only_on_fail() {
        let mut failing = session(vec![blocking_finding()]);
        let report = failing.run_cycle(request()).await.unwrap();
        assert_eq!(report.verdict, Verdict::Fail);
        assert!(ReviewSession::should_retry(&report));

        let mut passing = session(Vec::new());
        let report = passing.run_cycle(request()).await.unwrap();
        assert_eq!(report.verdict, Verdict::Pass);
        assert!(!ReviewSession::should_retry(&report));
    }

    #[tokio::test]
    async fn test_indeterminate_is_not_a_retry_trigger() {
        let engine = ConsensusEngine::new(Deduplicator::new(DedupConfig::default()));
        struct Down;
        #[async_trait]
        impl ReviewerClient for Down {
            fn id(&self) -> &str {
                "static/down"
            }
            async fn review(
                &self,
                _request: &ReviewRequest,
            ) -> Result<Vec<Finding>, FailureReason> {
                Err(FailureReason::Transport("connection refused".into()))
            }
        }
        let mut session = ReviewSession::new(engine, vec![Arc::new(Down)]);

        let report = session.run_cycle(request()).await.unwrap();
        assert_eq!(report.verdict, Verdict::Indeterminate);
        assert!(!ReviewSession::should_retry(&report));
    }

    #[tokio::test]
    async fn test_history_is_bounded_and_ordered() {
        let mut session = session(Vec::new()).with_history_limit(2);

        for _ in 0..3 {
            session.run_cycle(request()).await.unwrap();
        }

        assert_eq!(session.history().count(), 2);
        assert!(session.last_report().is_some());
        let mut previous: Option<DateTime<Utc>> = None;
        for record in session.history() {
            if let Some(earlier) = previous {
                assert!(record.completed_at >= earlier);
            }
            previous = Some(record.completed_at);
        }
    }

    #[tokio::test]
    async fn test_rerun_over_unchanged_artifact_is_deterministic() {
        let mut session = session(vec![blocking_finding()]);

        let first = session.run_cycle(request()).await.unwrap();
        let second = session.run_cycle(request()).await.unwrap();

        assert_eq!(first.findings, second.findings);
        assert_eq!(first.verdict, second.verdict);
    }

    #[tokio::test]
    async fn test_reviewer_ids_follow_dispatch_order() {
        let session = session(Vec::new());
        assert_eq!(session.reviewer_ids(), vec!["static/canned"]);
    }
}
