use std::sync::Arc;

use crate::job_match::JobMatchAnalyzer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once at startup with the portfolio, LLM client and usage tracker baked in.
    pub analyzer: Arc<JobMatchAnalyzer>,
}
