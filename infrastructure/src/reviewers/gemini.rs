//! Google Gemini reviewer adapter (generateContent API).

use super::payload::parse_findings;
use super::prompt::{build_review_prompt, REVIEW_SYSTEM_PROMPT};
use async_trait::async_trait;
use council_application::ReviewerClient;
use council_domain::{FailureReason, Finding, ReviewRequest};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

const RATE_LIMIT_BACKOFF: Duration = Duration::from_millis(1500);

const MAX_OUTPUT_TOKENS: u32 = 2048;

/// Reviewer backed by a Gemini model.
///
/// Gemini has no separate system role in this API shape, so the system
/// instructions are folded into the single user prompt.
pub struct GeminiReviewer {
    id: String,
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
    min_confidence: u8,
}

impl GeminiReviewer {
    pub fn new(api_key: String, model: impl Into<String>, min_confidence: u8) -> Self {
        let model = model.into();
        Self {
            id: format!("gemini/{model}"),
            endpoint: format!(
                "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent"
            ),
            api_key,
            client: reqwest::Client::new(),
            min_confidence,
        }
    }

    async fn request_once(&self, prompt: &str) -> Result<Vec<Finding>, FailureReason> {
        let body = serde_json::json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {
                "temperature": 0.1,
                "maxOutputTokens": MAX_OUTPUT_TOKENS,
            },
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| FailureReason::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FailureReason::RateLimited);
        }
        if !status.is_success() {
            return Err(FailureReason::Transport(format!("HTTP {status}")));
        }

        let generated: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| FailureReason::MalformedResponse(e.to_string()))?;
        let content = generated.text();
        if content.is_empty() {
            return Err(FailureReason::MalformedResponse(
                "response contained no candidates".to_string(),
            ));
        }

        parse_findings(&self.id, &content, self.min_confidence)
    }
}

#[async_trait]
impl ReviewerClient for GeminiReviewer {
    fn id(&self) -> &str {
        &self.id
    }

    async fn review(&self, request: &ReviewRequest) -> Result<Vec<Finding>, FailureReason> {
        let deadline = Instant::now() + request.timeout;
        let prompt = format!("{REVIEW_SYSTEM_PROMPT}\n\n{}", build_review_prompt(request));

        let mut retried = false;
        loop {
            let attempt = tokio::time::timeout_at(deadline, self.request_once(&prompt)).await;
            let result = match attempt {
                Err(_) => return Err(FailureReason::Timeout),
                Ok(result) => result,
            };

            match result {
                Err(FailureReason::RateLimited)
                    if !retried && Instant::now() + RATE_LIMIT_BACKOFF < deadline =>
                {
                    debug!(reviewer = %self.id, "rate limited, retrying once");
                    retried = true;
                    tokio::time::sleep(RATE_LIMIT_BACKOFF).await;
                }
                other => return other,
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reviewer_id_and_endpoint_include_model() {
        let reviewer = GeminiReviewer::new("key".into(), "gemini-3-pro-preview", 80);
        assert_eq!(reviewer.id(), "gemini/gemini-3-pro-preview");
        assert!(reviewer.endpoint.contains("gemini-3-pro-preview:generateContent"));
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": "{\"issues\":"}, {"text": " []}"}]}}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.text(), "{\"issues\": []}");
    }

    #[test]
    fn test_empty_response_has_no_text() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.text().is_empty());
    }
}
