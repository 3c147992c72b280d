//! File-based configuration model (`council.toml`).

use council_application::ReviewParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete configuration loaded from TOML sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Review engine tuning.
    pub review: ReviewSection,
    /// The council members, in dispatch order.
    pub reviewers: Vec<ReviewerEntry>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            review: ReviewSection::default(),
            reviewers: vec![
                ReviewerEntry::new(ProviderKind::Openai, "gpt-5.2-codex"),
                ReviewerEntry::new(ProviderKind::Gemini, "gemini-3-pro-preview"),
            ],
        }
    }
}

impl FileConfig {
    /// Translate the `[review]` section into engine parameters.
    pub fn review_params(&self) -> ReviewParams {
        ReviewParams {
            timeout: Duration::from_secs(self.review.timeout_secs),
            line_tolerance: self.review.line_tolerance,
            similarity_threshold: self.review.similarity_threshold,
            min_confidence: self.review.min_confidence,
            history_limit: self.review.history_limit,
        }
    }
}

/// `[review]` section: engine thresholds and limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewSection {
    /// Shared deadline for one review cycle, in seconds.
    pub timeout_secs: u64,
    /// Jaccard message similarity above which findings merge.
    pub similarity_threshold: f64,
    /// Line window within which anchors count as the same issue.
    pub line_tolerance: u32,
    /// Providers drop findings below this confidence.
    pub min_confidence: u8,
    /// Past reports the session retains.
    pub history_limit: usize,
}

impl Default for ReviewSection {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            similarity_threshold: 0.6,
            line_tolerance: 3,
            min_confidence: 80,
            history_limit: 16,
        }
    }
}

/// Which provider implementation backs a reviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Openai,
    Gemini,
    /// Deterministic canned reviewer, for tests and offline smoke runs.
    Static,
}

/// One `[[reviewers]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewerEntry {
    pub provider: ProviderKind,
    pub model: String,
    /// Environment variable holding the API key; defaults per provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
}

impl ReviewerEntry {
    pub fn new(provider: ProviderKind, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            api_key_env: None,
        }
    }

    /// Environment variable to resolve this reviewer's key from.
    pub fn key_env(&self) -> &str {
        self.api_key_env.as_deref().unwrap_or(match self.provider {
            ProviderKind::Openai => "OPENAI_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::Static => "",
        })
    }
}

/// Default configuration rendered as TOML, for `--init-config`.
pub fn default_config_toml() -> String {
    toml::to_string_pretty(&FileConfig::default()).unwrap_or_default()
}
