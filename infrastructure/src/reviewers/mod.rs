//! Reviewer provider adapters.
//!
//! One implementation per provider, all speaking the shared prompt and
//! payload shape, plus the factory that assembles the council from file
//! configuration and resolved credentials.

pub mod gemini;
pub mod openai;
pub mod payload;
pub mod prompt;
pub mod static_reviewer;

pub use gemini::GeminiReviewer;
pub use openai::OpenAiReviewer;
pub use static_reviewer::StaticReviewer;

use crate::config::{FileConfig, ProviderKind};
use crate::secrets::ApiKeyStore;
use council_application::ReviewerClient;
use std::sync::Arc;
use tracing::{info, warn};

/// Build the council from configuration.
///
/// Entries whose credentials cannot be resolved are skipped with a
/// warning rather than failing construction; deciding whether an empty
/// council is fatal is the caller's job.
pub fn build_reviewers(
    config: &FileConfig,
    keys: &ApiKeyStore,
) -> Vec<Arc<dyn ReviewerClient>> {
    let min_confidence = config.review.min_confidence;
    let mut reviewers: Vec<Arc<dyn ReviewerClient>> = Vec::new();

    for entry in &config.reviewers {
        match entry.provider {
            ProviderKind::Openai => match keys.resolve(entry.key_env()) {
                Some(key) => reviewers.push(Arc::new(OpenAiReviewer::new(
                    key,
                    entry.model.clone(),
                    min_confidence,
                ))),
                None => warn!(
                    model = %entry.model,
                    env = %entry.key_env(),
                    "skipping OpenAI reviewer: API key not configured"
                ),
            },
            ProviderKind::Gemini => match keys.resolve(entry.key_env()) {
                Some(key) => reviewers.push(Arc::new(GeminiReviewer::new(
                    key,
                    entry.model.clone(),
                    min_confidence,
                ))),
                None => warn!(
                    model = %entry.model,
                    env = %entry.key_env(),
                    "skipping Gemini reviewer: API key not configured"
                ),
            },
            ProviderKind::Static => {
                reviewers.push(Arc::new(StaticReviewer::new(format!(
                    "static/{}",
                    entry.model
                ))));
            }
        }
    }

    info!(council = reviewers.len(), "reviewer council assembled");
    reviewers
}
