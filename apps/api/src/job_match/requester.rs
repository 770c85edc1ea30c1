//! LLM Match Requester — builds the bounded job-match prompt and makes one model call.

use tracing::debug;

use crate::job_match::prompts::{JOB_MATCH_PROMPT_TEMPLATE, JOB_MATCH_SYSTEM};
use crate::llm_client::{CompletionProvider, CompletionRequest, LlmError};

/// Job text longer than this (in characters) is cut before prompting.
pub const MAX_JOB_TEXT_CHARS: usize = 4000;
pub const TRUNCATION_MARKER: &str = "\n\n[Job description truncated]";
/// Output budget for the structured report.
pub const MATCH_MAX_TOKENS: u32 = 1500;
/// Pinned so repeated runs on the same input stay close to reproducible.
pub const MATCH_TEMPERATURE: f32 = 0.0;

/// Cuts `text` to `MAX_JOB_TEXT_CHARS` characters, appending a marker when anything was dropped.
pub fn truncate_job_text(text: &str) -> String {
    match text.char_indices().nth(MAX_JOB_TEXT_CHARS) {
        Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

pub fn build_match_request(
    job_text: &str,
    keyword_hint: &[String],
    portfolio_summary: &str,
) -> CompletionRequest {
    let keywords = if keyword_hint.is_empty() {
        "(none)".to_string()
    } else {
        keyword_hint.join(", ")
    };
    let portfolio = if portfolio_summary.trim().is_empty() {
        "(no portfolio details configured)"
    } else {
        portfolio_summary
    };

    let prompt = JOB_MATCH_PROMPT_TEMPLATE
        .replace("{keywords}", &keywords)
        .replace("{portfolio}", portfolio)
        .replace("{job_text}", &truncate_job_text(job_text));

    CompletionRequest {
        system: JOB_MATCH_SYSTEM.to_string(),
        prompt,
        max_tokens: MATCH_MAX_TOKENS,
        temperature: MATCH_TEMPERATURE,
    }
}

/// Asks the model for a match report and returns its raw text. Provider failures are
/// returned to the caller untouched; nothing is retried here.
pub async fn request_match(
    llm: &dyn CompletionProvider,
    job_text: &str,
    keyword_hint: &[String],
    portfolio_summary: &str,
) -> Result<String, LlmError> {
    let request = build_match_request(job_text, keyword_hint, portfolio_summary);
    debug!(
        "Requesting job match: prompt {} chars, {} keyword hints",
        request.prompt.len(),
        keyword_hint.len()
    );
    llm.complete(&request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_not_truncated() {
        assert_eq!(truncate_job_text("Rust engineer"), "Rust engineer");
    }

    #[test]
    fn test_text_at_limit_is_not_truncated() {
        let text = "a".repeat(MAX_JOB_TEXT_CHARS);
        assert_eq!(truncate_job_text(&text), text);
    }

    #[test]
    fn test_long_text_is_cut_with_marker() {
        let text = "b".repeat(MAX_JOB_TEXT_CHARS + 500);
        let cut = truncate_job_text(&text);
        assert!(cut.ends_with(TRUNCATION_MARKER));
        assert_eq!(
            cut.chars().count(),
            MAX_JOB_TEXT_CHARS + TRUNCATION_MARKER.chars().count()
        );
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let text = "é".repeat(MAX_JOB_TEXT_CHARS + 1);
        let cut = truncate_job_text(&text);
        assert!(cut.starts_with(&"é".repeat(MAX_JOB_TEXT_CHARS)));
    }

    #[test]
    fn test_request_carries_decoding_settings_and_context() {
        let request = build_match_request(
            "Senior Rust engineer",
            &["Rust".to_string(), "Docker".to_string()],
            "Sam — Engineer",
        );
        assert_eq!(request.temperature, 0.0);
        assert_eq!(request.max_tokens, MATCH_MAX_TOKENS);
        assert_eq!(request.system, JOB_MATCH_SYSTEM);
        assert!(request.prompt.contains("Rust, Docker"));
        assert!(request.prompt.contains("Sam — Engineer"));
        assert!(request.prompt.contains("Senior Rust engineer"));
        assert!(!request.prompt.contains("{job_text}"));
    }

    #[test]
    fn test_request_marks_missing_hints_and_portfolio() {
        let request = build_match_request("Barista", &[], "  ");
        assert!(request.prompt.contains("(none)"));
        assert!(request.prompt.contains("(no portfolio details configured)"));
    }
}
