//! The job analysis contract returned to callers. Serialized camelCase.
//!
//! Every field is always populated; see `finalize` for the backfill rules.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    #[default]
    Medium,
    Low,
}

impl Confidence {
    /// Lenient parse of a model-supplied label. Unknown labels yield `None`.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "high" => Some(Confidence::High),
            "medium" => Some(Confidence::Medium),
            "low" => Some(Confidence::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    #[default]
    Moderate,
    Minor,
}

impl Severity {
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "critical" => Some(Severity::Critical),
            "moderate" => Some(Severity::Moderate),
            "minor" => Some(Severity::Minor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strength {
    pub category: String,
    #[serde(rename = "match")]
    pub matched: String,
    pub evidence: String,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub requirement: String,
    pub severity: Severity,
    pub suggestion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsKeywords {
    pub critical: Vec<String>,
    pub recommended: Vec<String>,
    pub phrasings_to_use: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub cover_letter_focus: Vec<String>,
    pub skills_to_highlight: Vec<String>,
    pub projects_to_feature: Vec<String>,
}

/// Full match report for one job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAnalysisResult {
    /// 0 – 100
    pub match_score: u8,
    pub strengths: Vec<Strength>,
    pub gaps: Vec<Gap>,
    pub standout_qualities: Vec<String>,
    pub ats_keywords: AtsKeywords,
    pub recommendations: Recommendations,
    pub summary: String,
}

/// Full-contract check shared by tests of every analysis path.
#[cfg(test)]
pub(crate) fn assert_on_contract(result: &JobAnalysisResult) {
    assert!(result.match_score <= 100);
    assert!(!result.summary.trim().is_empty());
    let value = serde_json::to_value(result).unwrap();
    for key in [
        "matchScore",
        "strengths",
        "gaps",
        "standoutQualities",
        "atsKeywords",
        "recommendations",
        "summary",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    for key in ["critical", "recommended", "phrasingsToUse"] {
        assert!(value["atsKeywords"][key].is_array(), "atsKeywords.{key} not an array");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_serializes_camel_case_and_match_field() {
        let result = JobAnalysisResult {
            match_score: 72,
            strengths: vec![Strength {
                category: "Technical Skills".into(),
                matched: "Rust".into(),
                evidence: "Built Folio".into(),
                confidence: Confidence::High,
            }],
            gaps: vec![Gap {
                requirement: "Kubernetes".into(),
                severity: Severity::Minor,
                suggestion: "Mention container work".into(),
            }],
            standout_qualities: vec![],
            ats_keywords: AtsKeywords::default(),
            recommendations: Recommendations::default(),
            summary: "Good fit".into(),
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["matchScore"], 72);
        assert_eq!(value["strengths"][0]["match"], "Rust");
        assert_eq!(value["strengths"][0]["confidence"], "high");
        assert_eq!(value["gaps"][0]["severity"], "minor");
        assert!(value["atsKeywords"]["phrasingsToUse"].is_array());
        assert!(value["recommendations"]["coverLetterFocus"].is_array());
        assert!(value["standoutQualities"].is_array());
    }

    #[test]
    fn test_labels_parse_leniently() {
        assert_eq!(Confidence::parse(" HIGH "), Some(Confidence::High));
        assert_eq!(Confidence::parse("certain"), None);
        assert_eq!(Severity::parse("Critical"), Some(Severity::Critical));
        assert_eq!(Severity::parse("blocker"), None);
    }
}
