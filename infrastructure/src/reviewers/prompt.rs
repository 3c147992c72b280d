//! Shared review prompt construction.
//!
//! Every provider receives the same instructions and the same artifact
//! rendering, so their findings land in one parseable shape regardless of
//! which model produced them.

use council_domain::ReviewRequest;

/// System role given to chat-style providers.
pub const REVIEW_SYSTEM_PROMPT: &str =
    "You are an expert Claude Code configuration reviewer. Respond only with valid JSON.";

/// Upper bound on artifact text shipped to a provider.
const MAX_ARTIFACT_CHARS: usize = 10_000;

/// Build the user prompt for one review request.
pub fn build_review_prompt(request: &ReviewRequest) -> String {
    let artifact = render_artifact(request);

    format!(
        r#"Review the following configuration for:
1. Security issues (permissions too broad, missing denials, exposed secrets)
2. Best practice violations (missing patterns, anti-patterns)
3. Missing components (essential elements not present)
4. Improvement opportunities

Respond with ONLY valid JSON (no markdown code blocks):
{{"issues": [{{"severity": "critical|high|medium|low", "category": "security|best_practice|missing|improvement", "message": "description under 100 chars", "suggestion": "fix under 100 chars", "file": "relative path if applicable", "line": 12, "confidence": 85}}]}}

Only include findings with confidence >= 80.

CONFIGURATION TO REVIEW:
{artifact}"#
    )
}

/// Render the artifact snapshot as sectioned text, truncated to the
/// provider budget.
fn render_artifact(request: &ReviewRequest) -> String {
    let mut text = String::new();
    for file in &request.files {
        text.push_str(&format!("=== {} ===\n{}\n\n", file.path, file.content));
    }
    truncate_chars(&text, MAX_ARTIFACT_CHARS)
}

/// Truncate on a character boundary, annotating the cut.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{truncated}\n[... truncated at {max_chars} chars]")
}
