//! Reviewer client port
//!
//! Defines the interface for invoking one external reviewer.

use async_trait::async_trait;
use council_domain::{FailureReason, Finding, ReviewRequest};

/// One external reviewer in the council.
///
/// Implementations wrap a single provider API and must uphold three
/// contracts:
///
/// - Never let a raw transport error escape: every failure mode maps to a
///   [`FailureReason`].
/// - Respect `request.timeout`: return [`FailureReason::Timeout`] rather
///   than blocking past the deadline. A bounded retry (e.g. one retry on
///   rate limiting) is allowed, but never past the deadline.
/// - Stay stateless per call, so one client instance can be shared behind
///   an `Arc` across concurrent review cycles.
#[async_trait]
pub trait ReviewerClient: Send + Sync {
    /// Stable reviewer identifier (e.g. `openai/gpt-5.2-codex`), used as
    /// finding provenance and in report summaries.
    fn id(&self) -> &str;

    /// Review the artifact and report findings.
    async fn review(&self, request: &ReviewRequest) -> Result<Vec<Finding>, FailureReason>;
}
