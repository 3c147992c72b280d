//! Progress notification port
//!
//! Defines the interface for reporting progress during a review cycle.

use council_domain::{ReviewerOutcome, Verdict};

/// Callback for progress updates while the council is working.
///
/// Implementations live in the presentation layer and can display progress
/// in various ways (console spinner, plain log lines, etc.)
pub trait ReviewProgress: Send + Sync {
    /// Called once when the engine dispatches to the council.
    fn on_dispatch(&self, total_reviewers: usize);

    /// Called as each reviewer settles, in completion order.
    fn on_reviewer_settled(&self, outcome: &ReviewerOutcome);

    /// Called once the verdict is computed.
    fn on_complete(&self, verdict: &Verdict);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ReviewProgress for NoProgress {
    fn on_dispatch(&self, _total_reviewers: usize) {}
    fn on_reviewer_settled(&self, _outcome: &ReviewerOutcome) {}
    fn on_complete(&self, _verdict: &Verdict) {}
}
