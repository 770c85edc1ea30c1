//! Result Merger / Validator — the only place that turns model output into a `JobAnalysisResult`.
//!
//! The parsed model object is never trusted: each field is checked against the contract and
//! backfilled. Deterministic keyword matches are always unioned into `atsKeywords`.

use serde_json::{Map, Value};
use tracing::warn;

use crate::job_match::keywords::KeywordMatchSet;
use crate::job_match::repair::ParseFailure;
use crate::job_match::result::{
    AtsKeywords, Confidence, Gap, JobAnalysisResult, Recommendations, Severity, Strength,
};

/// Used when the model's score is missing or not numeric.
pub const DEFAULT_MATCH_SCORE: u8 = 50;
/// Keyword-only score: each critical keyword is worth 100 / N points, capped at 100.
pub const FALLBACK_SCORE_DENOMINATOR: usize = 10;
pub const DEFAULT_SUMMARY: &str =
    "Analysis complete. Review the strengths and gaps below for details.";
pub const URL_GUIDANCE_SUMMARY: &str = "I can't open links to job postings. \
    Please paste the job description text directly and I'll analyze it against my profile.";

const FALLBACK_STRENGTH_COUNT: usize = 3;
const FALLBACK_STANDOUT_COUNT: usize = 3;
const FALLBACK_HIGHLIGHT_COUNT: usize = 5;

/// Total: every input yields an on-contract result.
pub fn finalize(
    parsed: Result<Value, ParseFailure>,
    matches: &KeywordMatchSet,
) -> JobAnalysisResult {
    match parsed {
        Ok(value) => validate_parsed(&value, matches),
        Err(failure) => {
            warn!(
                "Falling back to keyword-only result: {} (raw {} chars, repaired: {:?})",
                failure.reason,
                failure.raw.len(),
                truncate_for_log(&failure.repaired)
            );
            fallback_result(matches, incomplete_analysis_gap())
        }
    }
}

/// Gap attached when the model answered but its output could not be used.
pub fn incomplete_analysis_gap() -> Gap {
    Gap {
        requirement: "Detailed analysis incomplete".to_string(),
        severity: Severity::Moderate,
        suggestion: "The AI response could not be read in full. \
            This result is based on keyword matching only; try again for a detailed assessment."
            .to_string(),
    }
}

/// Gap attached when the model call itself failed.
pub fn analysis_failed_gap() -> Gap {
    Gap {
        requirement: "Analysis Failed".to_string(),
        severity: Severity::Critical,
        suggestion: "The AI service could not be reached. \
            This result is based on keyword matching only; please try again shortly."
            .to_string(),
    }
}

/// Zero-score answer for inputs that are links rather than job text.
pub fn url_guidance_result() -> JobAnalysisResult {
    JobAnalysisResult {
        match_score: 0,
        strengths: vec![],
        gaps: vec![],
        standout_qualities: vec![],
        ats_keywords: AtsKeywords::default(),
        recommendations: Recommendations::default(),
        summary: URL_GUIDANCE_SUMMARY.to_string(),
    }
}

/// Keyword-only result built from deterministic matches.
pub fn fallback_result(matches: &KeywordMatchSet, gap: Gap) -> JobAnalysisResult {
    let critical = dedupe(matches.critical.iter().cloned());
    let recommended = dedupe(matches.recommended.iter().cloned());

    let match_score = ((critical.len() * 100) / FALLBACK_SCORE_DENOMINATOR).min(100) as u8;

    let strengths = critical
        .iter()
        .take(FALLBACK_STRENGTH_COUNT)
        .map(|keyword| Strength {
            category: "Technical Skills".to_string(),
            matched: keyword.clone(),
            evidence: "Mentioned in the job description and listed in the portfolio".to_string(),
            confidence: Confidence::High,
        })
        .collect();

    let cover_letter_focus = if critical.is_empty() {
        vec![]
    } else {
        vec![format!(
            "Hands-on experience with {}",
            critical
                .iter()
                .take(FALLBACK_STRENGTH_COUNT)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        )]
    };

    let summary = format!(
        "Keyword analysis found {} matching keywords ({} critical, {} recommended). \
         A detailed assessment was not available.",
        critical.len() + recommended.len(),
        critical.len(),
        recommended.len()
    );

    JobAnalysisResult {
        match_score,
        strengths,
        gaps: vec![gap],
        standout_qualities: recommended
            .iter()
            .take(FALLBACK_STANDOUT_COUNT)
            .cloned()
            .collect(),
        recommendations: Recommendations {
            cover_letter_focus,
            skills_to_highlight: critical
                .iter()
                .take(FALLBACK_HIGHLIGHT_COUNT)
                .cloned()
                .collect(),
            projects_to_feature: vec![],
        },
        ats_keywords: AtsKeywords {
            critical,
            recommended,
            phrasings_to_use: vec![],
        },
        summary,
    }
}

fn validate_parsed(value: &Value, matches: &KeywordMatchSet) -> JobAnalysisResult {
    let recommendations = value.get("recommendations").and_then(Value::as_object);

    JobAnalysisResult {
        match_score: coerce_score(value.get("matchScore")),
        strengths: object_items(value.get("strengths"))
            .map(|obj| Strength {
                category: string_field(obj, "category"),
                matched: string_field(obj, "match"),
                evidence: string_field(obj, "evidence"),
                confidence: obj
                    .get("confidence")
                    .and_then(Value::as_str)
                    .and_then(Confidence::parse)
                    .unwrap_or_default(),
            })
            .filter(|s| !(s.category.is_empty() && s.matched.is_empty()))
            .collect(),
        gaps: object_items(value.get("gaps"))
            .map(|obj| Gap {
                requirement: string_field(obj, "requirement"),
                severity: obj
                    .get("severity")
                    .and_then(Value::as_str)
                    .and_then(Severity::parse)
                    .unwrap_or_default(),
                suggestion: string_field(obj, "suggestion"),
            })
            .filter(|g| !g.requirement.is_empty())
            .collect(),
        standout_qualities: string_list(value.get("standoutQualities")),
        ats_keywords: merge_ats_keywords(value.get("atsKeywords"), matches),
        recommendations: Recommendations {
            cover_letter_focus: string_list(recommendations.and_then(|r| r.get("coverLetterFocus"))),
            skills_to_highlight: string_list(
                recommendations.and_then(|r| r.get("skillsToHighlight")),
            ),
            projects_to_feature: string_list(
                recommendations.and_then(|r| r.get("projectsToFeature")),
            ),
        },
        summary: value
            .get("summary")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SUMMARY)
            .to_string(),
    }
}

/// Unions deterministic matches into the model's keyword lists. Model phrasing and order come
/// first; a model entry differing only in case takes the taxonomy spelling.
fn merge_ats_keywords(model: Option<&Value>, matches: &KeywordMatchSet) -> AtsKeywords {
    let Some(model) = model.and_then(Value::as_object) else {
        return AtsKeywords {
            critical: dedupe(matches.critical.iter().cloned()),
            recommended: dedupe(matches.recommended.iter().cloned()),
            phrasings_to_use: vec![],
        };
    };

    AtsKeywords {
        critical: union_keywords(string_list(model.get("critical")), &matches.critical),
        recommended: union_keywords(string_list(model.get("recommended")), &matches.recommended),
        phrasings_to_use: string_list(model.get("phrasingsToUse")),
    }
}

fn union_keywords(model: Vec<String>, deterministic: &[String]) -> Vec<String> {
    let mut merged = dedupe(model);
    for keyword in deterministic {
        let lowered = keyword.to_lowercase();
        match merged
            .iter_mut()
            .find(|existing| existing.to_lowercase() == lowered)
        {
            Some(existing) => *existing = keyword.clone(),
            None => merged.push(keyword.clone()),
        }
    }
    merged
}

/// Case-insensitive dedupe keeping the first spelling.
fn dedupe(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}

fn coerce_score(value: Option<&Value>) -> u8 {
    let score = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };

    match score {
        Some(s) if s.is_finite() => s.round().clamp(0.0, 100.0) as u8,
        _ => DEFAULT_MATCH_SCORE,
    }
}

fn object_items(value: Option<&Value>) -> impl Iterator<Item = &Map<String, Value>> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn truncate_for_log(text: &str) -> String {
    const LIMIT: usize = 200;
    if text.chars().count() <= LIMIT {
        text.to_string()
    } else {
        format!("{}…", text.chars().take(LIMIT).collect::<String>())
    }
}
