//! Job match analysis: deterministic keyword matching plus one bounded model call,
//! repaired and backfilled into a result that always has the full shape.

pub mod analyzer;
pub mod finalize;
pub mod handlers;
pub mod keywords;
pub mod prompts;
pub mod repair;
pub mod requester;
pub mod result;

use thiserror::Error;

pub use analyzer::JobMatchAnalyzer;
pub use result::JobAnalysisResult;

/// The only input the analyzer refuses. Everything else yields a result.
#[derive(Debug, Error)]
pub enum JobMatchError {
    #[error("Job description cannot be empty")]
    EmptyInput,
}
