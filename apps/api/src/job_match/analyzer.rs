//! Job match orchestration — the single entry point callers use.
//!
//! Flow: validate input → URL short-circuit → extract keywords → (telemetry, detached) →
//!       request match → repair & parse → finalize.
//!
//! Apart from empty input, every path returns a `JobAnalysisResult`. A failed model call and
//! unusable model output both degrade to the keyword-only fallback.

use std::sync::Arc;

use tracing::{info, warn};

use crate::job_match::finalize::{
    analysis_failed_gap, fallback_result, finalize, url_guidance_result,
};
use crate::job_match::keywords::{KeywordMatchSet, KeywordMatcher};
use crate::job_match::repair::parse_model_json;
use crate::job_match::requester::request_match;
use crate::job_match::result::JobAnalysisResult;
use crate::job_match::JobMatchError;
use crate::llm_client::CompletionProvider;
use crate::portfolio::PortfolioConfig;
use crate::telemetry::{spawn_record, KeywordUsageTracker};

/// Analyzes job descriptions against one portfolio. Holds no mutable state; share via `Arc`.
pub struct JobMatchAnalyzer {
    llm: Arc<dyn CompletionProvider>,
    usage: Arc<dyn KeywordUsageTracker>,
    matcher: KeywordMatcher,
    portfolio_summary: String,
}

impl JobMatchAnalyzer {
    pub fn new(
        llm: Arc<dyn CompletionProvider>,
        portfolio: &PortfolioConfig,
        usage: Arc<dyn KeywordUsageTracker>,
    ) -> Self {
        Self {
            llm,
            usage,
            matcher: KeywordMatcher::new(&portfolio.keywords),
            portfolio_summary: portfolio.profile.summary(),
        }
    }

    pub fn extract_keywords(&self, job_text: &str) -> KeywordMatchSet {
        self.matcher.extract(job_text)
    }

    pub async fn analyze_job(&self, input: &str) -> Result<JobAnalysisResult, JobMatchError> {
        let job_text = input.trim();
        if job_text.is_empty() {
            return Err(JobMatchError::EmptyInput);
        }

        if is_job_posting_url(job_text) {
            info!("Job match input is a URL; asking for pasted text instead");
            return Ok(url_guidance_result());
        }

        let matches = self.extract_keywords(job_text);
        if matches.is_empty() {
            info!("Job match found no portfolio keywords in the job text");
        } else {
            info!(
                "Job match keywords: {} matched ({} critical)",
                matches.total(),
                matches.critical.len()
            );
        }

        let hint: Vec<String> = matches.all().cloned().collect();
        spawn_record(self.usage.clone(), hint.clone());

        let result = match request_match(
            self.llm.as_ref(),
            job_text,
            &hint,
            &self.portfolio_summary,
        )
        .await
        {
            Ok(raw) => finalize(parse_model_json(&raw), &matches),
            Err(e) => {
                warn!("Job match model call failed, using keyword fallback: {e}");
                fallback_result(&matches, analysis_failed_gap())
            }
        };

        info!("Job match complete: score {}", result.match_score);
        Ok(result)
    }
}

/// True when the whole input is a single absolute http(s) URL with a host.
pub fn is_job_posting_url(input: &str) -> bool {
    let candidate = input.trim();
    if candidate.is_empty() || candidate.chars().any(char::is_whitespace) {
        return false;
    }

    match reqwest::Url::parse(candidate) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}
