//! OpenAI reviewer adapter (chat completions API).

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

const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Backoff before the single rate-limit retry.
const RATE_LIMIT_BACKOFF: Duration = Duration::from_millis(1500);

const MAX_OUTPUT_TOKENS: u32 = 2048;

/// Reviewer backed by an OpenAI chat model.
///
/// Stateless per call: the request carries everything, so one instance is
/// safely shared across concurrent review cycles.
pub struct OpenAiReviewer {
    id: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
    min_confidence: u8,
}

impl OpenAiReviewer {
    pub fn new(api_key: String, model: impl Into<String>, min_confidence: u8) -> Self {
        let model = model.into();
        Self {
            id: format!("openai/{model}"),
            api_key,
            model,
            client: reqwest::Client::new(),
            min_confidence,
        }
    }

    async fn request_once(&self, prompt: &str) -> Result<Vec<Finding>, FailureReason> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": REVIEW_SYSTEM_PROMPT},
                {"role": "user", "content": prompt},
            ],
            "max_tokens": MAX_OUTPUT_TOKENS,
            "temperature": 0.1,
        });

        let response = self
            .client
            .post(OPENAI_ENDPOINT)
            .bearer_auth(&self.api_key)
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

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| FailureReason::MalformedResponse(e.to_string()))?;
        let content = completion
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .ok_or_else(|| {
                FailureReason::MalformedResponse("response contained no choices".to_string())
            })?;

        parse_findings(&self.id, content, self.min_confidence)
    }
}

#[async_trait]
impl ReviewerClient for OpenAiReviewer {
    fn id(&self) -> &str {
        &self.id
    }

    async fn review(&self, request: &ReviewRequest) -> Result<Vec<Finding>, FailureReason> {
        let deadline = Instant::now() + request.timeout;
        let prompt = build_review_prompt(request);

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
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}
