//! Provider response payload parsing.
//!
//! Every provider is asked for the same JSON shape:
//!
//! ```json
//! {"issues": [{"severity": "...", "category": "...", "message": "...",
//!              "suggestion": "...", "file": "...", "line": 12,
//!              "confidence": 85}]}
//! ```
//!
//! Models wrap JSON in markdown fences or prose often enough that the
//! parser hunts for the object before decoding. A body with no decodable
//! object is a malformed response, never an empty success.

use council_domain::{Category, FailureReason, Finding, Location, Severity};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct IssueSheet {
    #[serde(default)]
    issues: Vec<IssueEntry>,
}

#[derive(Debug, Deserialize)]
struct IssueEntry {
    severity: Option<String>,
    category: Option<String>,
    message: Option<String>,
    suggestion: Option<String>,
    file: Option<String>,
    line: Option<u32>,
    confidence: Option<u8>,
}

/// Extract the JSON object from a model response that may wrap it in
/// markdown fences or surrounding prose.
pub fn extract_json(content: &str) -> Option<&str> {
    let content = content.trim();

    if content.starts_with('{') && content.ends_with('}') {
        return Some(content);
    }

    let fenced = if let Some(after) = content.split("```json").nth(1) {
        after.split("```").next()
    } else if content.contains("```") {
        content.split("```").nth(1)
    } else {
        None
    };
    let candidate = fenced.unwrap_or(content);

    let start = candidate.find('{')?;
    let end = candidate.rfind('}')?;
    (end > start).then(|| candidate[start..=end].trim())
}

/// Parse a provider response body into findings attributed to `reviewer`.
///
/// Issues below `min_confidence` are dropped, as are entries with no
/// message. Unknown severities and categories degrade to `medium` /
/// `improvement` rather than failing the whole response.
pub fn parse_findings(
    reviewer: &str,
    content: &str,
    min_confidence: u8,
) -> Result<Vec<Finding>, FailureReason> {
    let json = extract_json(content).ok_or_else(|| {
        FailureReason::MalformedResponse("no JSON object in response body".to_string())
    })?;

    let sheet: IssueSheet = serde_json::from_str(json)
        .map_err(|e| FailureReason::MalformedResponse(e.to_string()))?;

    let findings = sheet
        .issues
        .into_iter()
        .filter(|entry| entry.confidence.unwrap_or(0) >= min_confidence)
        .filter_map(|entry| {
            let message = entry.message?;
            if message.trim().is_empty() {
                return None;
            }
            let severity = entry
                .severity
                .as_deref()
                .map(Severity::parse_lenient)
                .unwrap_or(Severity::Medium);
            let category = entry
                .category
                .as_deref()
                .map(Category::parse_lenient)
                .unwrap_or(Category::Improvement);
            let location = Location::new(entry.file.unwrap_or_default(), entry.line);

            let mut finding =
                Finding::new(severity, category, location, message).with_source(reviewer);
            if let Some(suggestion) = entry.suggestion
                && !suggestion.trim().is_empty()
            {
                finding = finding.with_fix(suggestion);
            }
            Some(finding)
        })
        .collect();

    Ok(findings)
}
