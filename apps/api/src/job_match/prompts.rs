// Prompts for the job-match analyzer.

/// System prompt for job matching — JSON only, nothing else.
pub const JOB_MATCH_SYSTEM: &str = "You are a recruiter assessing how well a candidate's \
    portfolio matches a job description. \
    You MUST respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Keep every phrase short; the response is cut off at a fixed token budget.";

/// Job match prompt template.
/// Replace: {job_text}, {keywords}, {portfolio}
pub const JOB_MATCH_PROMPT_TEMPLATE: &str = r#"Compare the job description to the candidate portfolio and return a JSON object with EXACTLY this shape:
{
  "matchScore": 0-100 integer,
  "strengths": [{"category": "string", "match": "string", "evidence": "string", "confidence": "high|medium|low"}],
  "gaps": [{"requirement": "string", "severity": "critical|moderate|minor", "suggestion": "string"}],
  "standoutQualities": ["string"],
  "atsKeywords": {"critical": ["string"], "recommended": ["string"], "phrasingsToUse": ["string"]},
  "recommendations": {"coverLetterFocus": ["string"], "skillsToHighlight": ["string"], "projectsToFeature": ["string"]},
  "summary": "string"
}

HARD RULES:
1. At most 5 strengths, 5 gaps, and 5 items in every other list
2. Every phrase 15 words or fewer; summary 2 sentences or fewer
3. Evidence must come from the portfolio below — do NOT invent experience
4. projectsToFeature must name projects from the portfolio
5. Output the JSON object and nothing else

KEYWORDS ALREADY MATCHED between the job and the portfolio:
{keywords}

CANDIDATE PORTFOLIO:
{portfolio}

JOB DESCRIPTION:
{job_text}"#;
