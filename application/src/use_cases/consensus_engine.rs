//! Consensus engine use case
//!
//! Fans one review request out to every configured reviewer in parallel,
//! collects outcomes under a single shared deadline, deduplicates the
//! findings, and computes the verdict.

use crate::ports::progress::{NoProgress, ReviewProgress};
use crate::ports::reviewer_client::ReviewerClient;
use council_domain::{
    ConsensusReport, Deduplicator, DomainError, FailureReason, Finding, ReviewRequest,
    ReviewerOutcome, Verdict,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that abort an engine run before any reviewer is invoked.
///
/// These are programming-contract violations, not runtime reviewer
/// failures; reviewer failures are recorded in the report instead.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("no reviewers configured")]
    NoReviewers,

    #[error("duplicate reviewer id: {0}")]
    DuplicateReviewer(String),

    #[error(transparent)]
    InvalidRequest(#[from] DomainError),
}

/// Orchestrates one consensus run over the configured council.
///
/// Synchronous from the caller's perspective (`run` returns only after
/// every reviewer has settled or the shared deadline has elapsed) but
/// internally concurrent: one task per reviewer, none blocking another.
pub struct ConsensusEngine {
    dedup: Deduplicator,
}

impl ConsensusEngine {
    /// Thresholds are injected rather than read from ambient state, so the
    /// engine stays testable and reentrant across concurrent cycles.
    pub fn new(dedup: Deduplicator) -> Self {
        Self { dedup }
    }

    /// Execute one run with no progress reporting.
    pub async fn run(
        &self,
        request: ReviewRequest,
        reviewers: &[Arc<dyn ReviewerClient>],
    ) -> Result<ConsensusReport, EngineError> {
        self.run_with_progress(request, reviewers, &NoProgress).await
    }

    /// Execute one run with progress callbacks.
    pub async fn run_with_progress(
        &self,
        request: ReviewRequest,
        reviewers: &[Arc<dyn ReviewerClient>],
        progress: &dyn ReviewProgress,
    ) -> Result<ConsensusReport, EngineError> {
        if reviewers.is_empty() {
            return Err(EngineError::NoReviewers);
        }
        let mut seen = BTreeSet::new();
        for reviewer in reviewers {
            if !seen.insert(reviewer.id()) {
                return Err(EngineError::DuplicateReviewer(reviewer.id().to_string()));
            }
        }
        request.validate()?;

        let correlation_id = request.correlation_id.clone();
        info!(
            correlation_id = %correlation_id,
            reviewers = reviewers.len(),
            files = request.files.len(),
            "starting consensus run"
        );
        progress.on_dispatch(reviewers.len());

        let outcomes = self.dispatch(request, reviewers, progress).await;

        let per_reviewer: BTreeMap<String, Vec<Finding>> = outcomes
            .iter()
            .filter(|outcome| outcome.is_success())
            .map(|outcome| (outcome.reviewer.clone(), outcome.findings.clone()))
            .collect();

        let (findings, verdict) = if per_reviewer.is_empty() {
            warn!(
                correlation_id = %correlation_id,
                "all reviewers failed; verdict is indeterminate"
            );
            (Vec::new(), Verdict::Indeterminate)
        } else {
            let merged = self.dedup.merge(&per_reviewer);
            let verdict = if merged.iter().any(Finding::is_blocking) {
                Verdict::Fail
            } else {
                Verdict::Pass
            };
            (merged, verdict)
        };

        progress.on_complete(&verdict);
        info!(
            correlation_id = %correlation_id,
            verdict = %verdict,
            findings = findings.len(),
            "consensus run complete"
        );

        let summaries = outcomes.iter().map(ReviewerOutcome::summary).collect();
        Ok(ConsensusReport::new(
            correlation_id,
            verdict,
            findings,
            summaries,
        ))
    }

    /// Fan out to every reviewer and fan results back in.
    ///
    /// One cancellation token is tied to the shared deadline: when it fires,
    /// still-pending reviewers settle as `Failure(timeout)` immediately,
    /// so the engine never waits on a straggler past the deadline. Each
    /// reviewer owns exactly one write-once slot, and the returned outcomes
    /// follow configuration order, not completion order.
    async fn dispatch(
        &self,
        request: ReviewRequest,
        reviewers: &[Arc<dyn ReviewerClient>],
        progress: &dyn ReviewProgress,
    ) -> Vec<ReviewerOutcome> {
        let request = Arc::new(request);
        let deadline = Instant::now() + request.timeout;
        let cancel = CancellationToken::new();

        let mut join_set = JoinSet::new();
        for (slot, reviewer) in reviewers.iter().enumerate() {
            let reviewer = Arc::clone(reviewer);
            let request = Arc::clone(&request);
            let cancel = cancel.clone();
            join_set.spawn(async move {
                let outcome = tokio::select! {
                    result = reviewer.review(&request) => match result {
                        Ok(findings) => ReviewerOutcome::success(reviewer.id(), findings),
                        Err(reason) => ReviewerOutcome::failure(reviewer.id(), reason),
                    },
                    _ = cancel.cancelled() => {
                        ReviewerOutcome::failure(reviewer.id(), FailureReason::Timeout)
                    }
                };
                (slot, outcome)
            });
        }

        let deadline_guard = tokio::spawn({
            let cancel = cancel.clone();
            async move {
                tokio::time::sleep_until(deadline).await;
                cancel.cancel();
            }
        });

        let mut slots: Vec<Option<ReviewerOutcome>> =
            (0..reviewers.len()).map(|_| None).collect();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((slot, outcome)) => {
                    match &outcome.failure {
                        None => debug!(
                            reviewer = %outcome.reviewer,
                            findings = outcome.findings.len(),
                            "reviewer responded"
                        ),
                        Some(reason) => warn!(
                            reviewer = %outcome.reviewer,
                            "reviewer failed: {reason}"
                        ),
                    }
                    progress.on_reviewer_settled(&outcome);
                    slots[slot] = Some(outcome);
                }
                Err(join_error) => {
                    // Slot stays empty; backfilled below so no outcome is
                    // ever silently dropped.
                    warn!("reviewer task aborted: {join_error}");
                }
            }
        }
        deadline_guard.abort();

        slots
            .into_iter()
            .enumerate()
            .map(|(slot, outcome)| {
                outcome.unwrap_or_else(|| {
                    ReviewerOutcome::failure(
                        reviewers[slot].id(),
                        FailureReason::Transport(
                            "reviewer task aborted before producing an outcome".to_string(),
                        ),
                    )
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use council_domain::{ArtifactFile, Category, DedupConfig, Location, Severity};
    use std::time::Duration;

    /// Deterministic reviewer for engine tests: canned response after an
    /// optional delay.
    struct FakeReviewer {
        id: String,
        response: Result<Vec<Finding>, FailureReason>,
        delay: Duration,
    }

    impl FakeReviewer {
        fn reporting(id: &str, findings: Vec<Finding>) -> Arc<dyn ReviewerClient> {
            Arc::new(Self {
                id: id.to_string(),
                response: Ok(findings),
                delay: Duration::ZERO,
            })
        }

        fn failing(id: &str, reason: FailureReason) -> Arc<dyn ReviewerClient> {
            Arc::new(Self {
                id: id.to_string(),
                response: Err(reason),
                delay: Duration::ZERO,
            })
        }

        fn slow(id: &str, delay: Duration) -> Arc<dyn ReviewerClient> {
            Arc::new(Self {
                id: id.to_string(),
                response: Ok(Vec::new()),
                delay,
            })
        }
    }

    #[async_trait]
    impl ReviewerClient for FakeReviewer {
        fn id(&self) -> &str {
            &self.id
        }

        async fn review(
            &self,
            _request: &ReviewRequest,
        ) -> Result<Vec<Finding>, FailureReason> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.response.clone()
        }
    }

    fn engine() -> ConsensusEngine {
        ConsensusEngine::new(Deduplicator::new(DedupConfig::default()))
    }

    fn request() -> ReviewRequest {
        ReviewRequest::new(
            "/tmp/artifact",
            vec![ArtifactFile::new("CLAUDE.md", "# Project\n")],
            "review-test",
        )
        .with_timeout(Duration::from_secs(30))
    }

    fn finding(severity: Severity, line: u32, message: &str) -> Finding {
        Finding::new(
            severity,
            Category::Security,
            Location::new("CLAUDE.md", Some(line)),
            message,
        )
    }

    #[tokio::test]
    async fn test_one_blocking_reviewer_fails_the_review() {
        // Union semantics: reviewer B reporting nothing does not outvote
        // reviewer A's high-severity finding.
        let reviewers = vec![
            FakeReviewer::reporting(
                "alpha",
                vec![finding(Severity::High, 3, "shell hook runs untrusted code")],
            ),
            FakeReviewer::reporting("beta", Vec::new()),
        ];

        let report = engine().run(request(), &reviewers).await.unwrap();
        assert_eq!(report.verdict, Verdict::Fail);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.reviewers.len(), 2);
    }

    #[tokio::test]
    async fn test_all_reviewers_failing_is_indeterminate() {
        let reviewers = vec![
            FakeReviewer::failing("alpha", FailureReason::RateLimited),
            FakeReviewer::failing(
                "beta",
                FailureReason::Transport("connection refused".into()),
            ),
        ];

        let report = engine().run(request(), &reviewers).await.unwrap();
        assert_eq!(report.verdict, Verdict::Indeterminate);
        assert!(report.findings.is_empty());
        assert_eq!(report.failed_reviewers().count(), 2);
    }

    #[tokio::test]
    async fn test_low_and_medium_findings_pass() {
        let reviewers = vec![
            FakeReviewer::reporting(
                "alpha",
                vec![finding(Severity::Medium, 2, "overview section is thin")],
            ),
            FakeReviewer::reporting(
                "beta",
                vec![finding(Severity::Low, 20, "trailing whitespace in config")],
            ),
        ];

        let report = engine().run(request(), &reviewers).await.unwrap();
        assert_eq!(report.verdict, Verdict::Pass);
        assert_eq!(report.findings.len(), 2);
    }

    #[tokio::test]
    async fn test_partial_failure_still_merges_survivors() {
        let reviewers = vec![
            FakeReviewer::failing("alpha", FailureReason::RateLimited),
            FakeReviewer::reporting(
                "beta",
                vec![finding(Severity::Critical, 8, "credentials stored in plaintext")],
            ),
        ];

        let report = engine().run(request(), &reviewers).await.unwrap();
        assert_eq!(report.verdict, Verdict::Fail);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.succeeded_reviewers().count(), 1);
        assert_eq!(report.failed_reviewers().count(), 1);
    }

    #[tokio::test]
    async fn test_corroborated_finding_carries_both_sources() {
        let reviewers = vec![
            FakeReviewer::reporting(
                "alpha",
                vec![finding(
                    Severity::High,
                    12,
                    "unvalidated user input reaches the shell",
                )],
            ),
            FakeReviewer::reporting(
                "beta",
                vec![finding(
                    Severity::Medium,
                    13,
                    "user input passed to shell without validation",
                )],
            ),
        ];

        let report = engine().run(request(), &reviewers).await.unwrap();
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].severity, Severity::High);
        assert!(report.findings[0].is_corroborated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_reviewer_settles_as_timeout() {
        let reviewers = vec![
            FakeReviewer::reporting("alpha", Vec::new()),
            FakeReviewer::slow("laggard", Duration::from_secs(600)),
        ];

        let started = Instant::now();
        let report = engine().run(request(), &reviewers).await.unwrap();
        // Paused clock: elapsed tracks virtual time, which must stop at the
        // 30s deadline instead of the laggard's 600s sleep.
        assert!(started.elapsed() < Duration::from_secs(31));

        assert_eq!(report.verdict, Verdict::Pass);
        let laggard = report
            .reviewers
            .iter()
            .find(|r| r.reviewer == "laggard")
            .unwrap();
        assert_eq!(laggard.failure, Some(FailureReason::Timeout));
    }

    #[tokio::test]
    async fn test_completion_order_does_not_change_report() {
        let make = |first_delay: u64, second_delay: u64| {
            vec![
                Arc::new(FakeReviewer {
                    id: "alpha".into(),
                    response: Ok(vec![finding(Severity::High, 4, "deny rules absent for rm")]),
                    delay: Duration::from_millis(first_delay),
                }) as Arc<dyn ReviewerClient>,
                Arc::new(FakeReviewer {
                    id: "beta".into(),
                    response: Ok(vec![finding(Severity::Low, 30, "missing memory section")]),
                    delay: Duration::from_millis(second_delay),
                }) as Arc<dyn ReviewerClient>,
            ]
        };

        let fast_alpha = engine().run(request(), &make(1, 20)).await.unwrap();
        let fast_beta = engine().run(request(), &make(20, 1)).await.unwrap();

        assert_eq!(fast_alpha.findings, fast_beta.findings);
        assert_eq!(
            fast_alpha
                .reviewers
                .iter()
                .map(|r| r.reviewer.clone())
                .collect::<Vec<_>>(),
            fast_beta
                .reviewers
                .iter()
                .map(|r| r.reviewer.clone())
                .collect::<Vec<_>>(),
        );
    }

    #[tokio::test]
    async fn test_empty_reviewer_set_fails_fast() {
        let result = engine().run(request(), &[]).await;
        assert!(matches!(result, Err(EngineError::NoReviewers)));
    }

    #[tokio::test]
    async fn test_duplicate_reviewer_ids_fail_fast() {
        let reviewers = vec![
            FakeReviewer::reporting("alpha", Vec::new()),
            FakeReviewer::reporting("alpha", Vec::new()),
        ];
        let result = engine().run(request(), &reviewers).await;
        assert!(matches!(result, Err(EngineError::DuplicateReviewer(_))));
    }

    #[tokio::test]
    async fn test_empty_artifact_fails_fast() {
        let reviewers = vec![FakeReviewer::reporting("alpha", Vec::new())];
        let empty = ReviewRequest::new("/tmp/artifact", Vec::new(), "review-test");
        let result = engine().run(empty, &reviewers).await;
        assert!(matches!(
            result,
            Err(EngineError::InvalidRequest(DomainError::EmptyArtifact))
        ));
    }
}
