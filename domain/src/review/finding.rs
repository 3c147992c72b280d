//! Finding types: the normalized unit of an issue report.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Issue severity, ordered so that `Low < Medium < High < Critical`.
///
/// # Example
///
/// ```
/// use council_domain::Severity;
///
/// assert!(Severity::Critical > Severity::High);
/// assert!(Severity::High.is_blocking());
/// assert!(!Severity::Medium.is_blocking());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// A blocking severity fails the whole review on its own.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Severity::Critical | Severity::High)
    }

    /// Parse a provider-reported severity string, falling back to `Medium`
    /// for anything unrecognized.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "low" => Severity::Low,
            _ => Severity::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Issue category, mirroring the review taxonomy used by the providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Security,
    BestPractice,
    Missing,
    Improvement,
}

impl Category {
    /// Parse a provider-reported category, falling back to `Improvement`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "security" => Category::Security,
            "best_practice" | "best-practice" => Category::BestPractice,
            "missing" => Category::Missing,
            _ => Category::Improvement,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Security => "security",
            Category::BestPractice => "best_practice",
            Category::Missing => "missing",
            Category::Improvement => "improvement",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where in the artifact a finding points: a relative file path plus an
/// optional line anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Path relative to the artifact root. Empty when the finding applies
    /// to the artifact as a whole.
    pub path: String,
    /// 1-indexed line number, if the reviewer anchored the issue to one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl Location {
    pub fn new(path: impl Into<String>, line: Option<u32>) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }

    /// Location covering a whole file.
    pub fn file(path: impl Into<String>) -> Self {
        Self::new(path, None)
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Path with a leading `./` stripped and backslashes unified, so the
    /// same file reported by different providers compares equal.
    pub fn normalized_path(&self) -> String {
        let unified = self.path.replace('\\', "/");
        unified
            .strip_prefix("./")
            .unwrap_or(&unified)
            .to_string()
    }

    /// Whether two line anchors are compatible: both absent, or both
    /// present within `tolerance` lines of each other.
    pub fn lines_within(&self, other: &Location, tolerance: u32) -> bool {
        match (self.line, other.line) {
            (None, None) => true,
            (Some(a), Some(b)) => a.abs_diff(b) <= tolerance,
            _ => false,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}", self.normalized_path(), line),
            None => write!(f, "{}", self.normalized_path()),
        }
    }
}

/// An issue reported against a specific artifact location.
///
/// The `sources` set records every reviewer that independently reported
/// this finding; it grows as duplicates are merged and never shrinks.
/// A finding with two or more sources represents independent corroboration.
///
/// # Example
///
/// ```
/// use council_domain::{Category, Finding, Location, Severity};
///
/// let finding = Finding::new(
///     Severity::High,
///     Category::Security,
///     Location::file(".claude/settings.json").with_line(12),
///     "permissions allow unrestricted shell access",
/// )
/// .with_fix("restrict Bash to an explicit allowlist")
/// .with_source("openai/gpt-5.2-codex");
///
/// assert!(finding.is_blocking());
/// assert_eq!(finding.sources.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub category: Category,
    pub location: Location,
    /// Human-readable description of the issue.
    pub message: String,
    /// Suggested remediation, if the reviewer offered one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
    /// Reviewer identifiers that reported this finding.
    pub sources: BTreeSet<String>,
}

impl Finding {
    pub fn new(
        severity: Severity,
        category: Category,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            location,
            message: message.into(),
            suggested_fix: None,
            sources: BTreeSet::new(),
        }
    }

    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.suggested_fix = Some(fix.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.sources.insert(source.into());
        self
    }

    /// Whether this finding alone is enough to fail the review.
    pub fn is_blocking(&self) -> bool {
        self.severity.is_blocking()
    }

    /// Whether two or more reviewers independently reported this finding.
    pub fn is_corroborated(&self) -> bool {
        self.sources.len() >= 2
    }
}
