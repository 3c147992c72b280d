//! Consensus report types: the immutable output of one engine run.

use super::finding::{Finding, Severity};
use super::outcome::FailureReason;
use serde::{Deserialize, Serialize};

/// Overall verdict of a consensus run.
///
/// `Indeterminate` means "we could not obtain enough signal to decide",
/// which is distinct from `Pass` (signal obtained, no serious issues).
/// Callers must not conflate the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// No blocking findings in the merged set.
    Pass,
    /// At least one critical or high finding survived the merge.
    Fail,
    /// No reviewer succeeded; nothing can be concluded.
    Indeterminate,
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, Verdict::Fail)
    }

    pub fn is_indeterminate(&self) -> bool {
        matches!(self, Verdict::Indeterminate)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Pass => write!(f, "pass"),
            Verdict::Fail => write!(f, "fail"),
            Verdict::Indeterminate => write!(f, "indeterminate"),
        }
    }
}

/// Per-reviewer diagnostic line of a report: what the reviewer contributed
/// before deduplication, or why it contributed nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewerSummary {
    pub reviewer: String,
    /// Findings reported before deduplication.
    pub reported: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReason>,
}

impl ReviewerSummary {
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}

/// Tally of merged findings by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }
}

/// Output of one consensus run. Created fresh per review cycle and never
/// mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusReport {
    pub correlation_id: String,
    pub verdict: Verdict,
    /// Merged, deduplicated findings, sorted by descending severity.
    pub findings: Vec<Finding>,
    /// One summary per configured reviewer, in configuration order.
    pub reviewers: Vec<ReviewerSummary>,
}

impl ConsensusReport {
    pub fn new(
        correlation_id: impl Into<String>,
        verdict: Verdict,
        findings: Vec<Finding>,
        reviewers: Vec<ReviewerSummary>,
    ) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            verdict,
            findings,
            reviewers,
        }
    }

    /// Returns an iterator over the reviewers that produced findings.
    pub fn succeeded_reviewers(&self) -> impl Iterator<Item = &ReviewerSummary> {
        self.reviewers.iter().filter(|r| r.succeeded())
    }

    /// Returns an iterator over the reviewers that failed.
    pub fn failed_reviewers(&self) -> impl Iterator<Item = &ReviewerSummary> {
        self.reviewers.iter().filter(|r| !r.succeeded())
    }

    /// Merged findings that would fail the review on their own.
    pub fn blocking_findings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_blocking())
    }

    /// Severity tally over the merged findings.
    pub fn severity_counts(&self) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for finding in &self.findings {
            match finding.severity {
                Severity::Critical => counts.critical += 1,
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }
}
