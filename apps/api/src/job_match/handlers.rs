//! Axum route handlers for the Job Match API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::job_match::result::JobAnalysisResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchRequest {
    /// Missing is treated as empty so the caller gets a validation error, not a 422.
    #[serde(default)]
    pub job_description: String,
}

/// POST /api/v1/job-match
pub async fn handle_job_match(
    State(state): State<AppState>,
    Json(req): Json<JobMatchRequest>,
) -> Result<Json<JobAnalysisResult>, AppError> {
    let result = state.analyzer.analyze_job(&req.job_description).await?;
    Ok(Json(result))
}
