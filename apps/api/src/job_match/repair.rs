//! Response Repair & Parser — best-effort cleanup of model output before a strict JSON parse.
//!
//! These are heuristics, not a JSON parser. Each transform is a pure `&str -> String`
//! function that leaves already-clean input untouched, so `repair_json` is idempotent.
//! Transforms run left to right:
//!
//! 1. `strip_code_fences`         — drop Markdown ``` fences around the payload
//! 2. `str::trim`                 — surrounding whitespace
//! 3. `extract_outermost_object`  — cut preamble/postscript around the first `{ ... }`
//! 4. `drop_dangling_comma`       — trailing commas left by a mid-list cutoff
//! 5. `balance_delimiters`        — close an open string, then every open `[` / `{`
//! 6. `strip_commas_before_closers` — `[1, 2,]` → `[1, 2]`

use serde_json::Value;
use thiserror::Error;

/// Model output that could not be turned into a JSON object, even after repair.
/// Carries both texts for diagnostic logging.
#[derive(Debug, Clone, Error)]
#[error("model output is not a usable JSON object: {reason}")]
pub struct ParseFailure {
    pub raw: String,
    pub repaired: String,
    pub reason: String,
}

type Transform = fn(&str) -> String;

const PIPELINE: &[Transform] = &[
    strip_code_fences,
    trim,
    extract_outermost_object,
    drop_dangling_comma,
    balance_delimiters,
    strip_commas_before_closers,
];

/// Runs every repair transform in order.
pub fn repair_json(raw: &str) -> String {
    PIPELINE
        .iter()
        .fold(raw.to_string(), |text, transform| transform(&text))
}

/// Repairs then strictly parses model output. Only JSON objects are accepted.
pub fn parse_model_json(raw: &str) -> Result<Value, ParseFailure> {
    let repaired = repair_json(raw);

    let failure = |reason: String| ParseFailure {
        raw: raw.to_string(),
        repaired: repaired.clone(),
        reason,
    };

    match serde_json::from_str::<Value>(&repaired) {
        Ok(value) if value.is_object() => Ok(value),
        Ok(_) => Err(failure("top-level value is not an object".to_string())),
        Err(e) => Err(failure(e.to_string())),
    }
}

/// Tracks whether a character stream is inside a JSON string literal.
#[derive(Default)]
struct StringState {
    in_string: bool,
    escaped: bool,
}

impl StringState {
    /// Feeds one character. Returns true when `c` is structural (outside any string and not a quote).
    fn advance(&mut self, c: char) -> bool {
        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == '"' {
                self.in_string = false;
            }
            false
        } else if c == '"' {
            self.in_string = true;
            false
        } else {
            true
        }
    }
}

/// String-aware stack of expected closers. A closer that does not match the innermost
/// open delimiter is ignored, so every transform agrees on where an object ends.
#[derive(Default)]
struct Delimiters {
    strings: StringState,
    open: Vec<char>,
}

impl Delimiters {
    fn feed(&mut self, c: char) {
        if !self.strings.advance(c) {
            return;
        }
        match c {
            '{' => self.open.push('}'),
            '[' => self.open.push(']'),
            '}' | ']' if self.open.last() == Some(&c) => {
                self.open.pop();
            }
            _ => {}
        }
    }
}

fn trim(text: &str) -> String {
    text.trim().to_string()
}

/// Removes a leading ```` ``` ```` / ```` ```json ```` fence and everything from the last
/// closing fence on. Repeats for nested fences.
pub fn strip_code_fences(text: &str) -> String {
    let mut current = text.trim();

    while let Some(rest) = current.strip_prefix("```") {
        let body = match rest.split_once('\n') {
            Some((tag, remainder)) if is_fence_tag(tag) => remainder,
            _ => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        };
        let body = match body.rfind("```") {
            Some(end) => &body[..end],
            None => body,
        };
        current = body.trim();
    }

    current.to_string()
}

fn is_fence_tag(tag: &str) -> bool {
    tag.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Keeps the first top-level object: from the first `{` to its matching `}`.
/// When the object never closes (truncated output) everything from the first `{` is kept.
/// Text without any `{` is returned unchanged.
pub fn extract_outermost_object(text: &str) -> String {
    let Some(start) = text.find('{') else {
        return text.to_string();
    };

    let candidate = &text[start..];
    let mut delimiters = Delimiters::default();

    for (idx, c) in candidate.char_indices() {
        let was_open = !delimiters.open.is_empty();
        delimiters.feed(c);
        if was_open && delimiters.open.is_empty() {
            return candidate[..idx + c.len_utf8()].to_string();
        }
    }

    candidate.to_string()
}

/// A trailing comma means the model was cut off between list items.
pub fn drop_dangling_comma(text: &str) -> String {
    let mut current = text.trim_end();
    while let Some(stripped) = current.strip_suffix(',') {
        current = stripped.trim_end();
    }
    current.to_string()
}

/// Closes an unterminated string and then every still-open array/object, innermost first.
/// Stray closers that do not match the innermost open delimiter are left alone.
pub fn balance_delimiters(text: &str) -> String {
    let mut delimiters = Delimiters::default();
    for c in text.chars() {
        delimiters.feed(c);
    }

    let mut repaired = text.to_string();
    if delimiters.strings.in_string {
        if delimiters.strings.escaped {
            repaired.pop();
        }
        repaired.push('"');
    }
    repaired.extend(delimiters.open.iter().rev());
    repaired
}

/// Removes commas that directly precede a closing `]` or `}`.
pub fn strip_commas_before_closers(text: &str) -> String {
    let mut state = StringState::default();
    let mut out = String::with_capacity(text.len());

    for c in text.chars() {
        if state.advance(c) && (c == '}' || c == ']') {
            loop {
                let trimmed_len = out.trim_end().len();
                if out[..trimmed_len].ends_with(',') {
                    out.truncate(trimmed_len - 1);
                } else {
                    break;
                }
            }
        }
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "   ",
        "{\"matchScore\": 80}",
        "```json\n{\"matchScore\": 80, \"summary\": \"ok\"}\n```",
        "```\n{\"a\": 1}\n```\nHope that helps!",
        "Sure! Here is the analysis:\n{\"matchScore\": 55} Let me know.",
        "{\"matchScore\": 80, \"strengths\": [",
        "{\"matchScore\": 80, \"strengths\": [{\"category\": \"Tech\"},",
        "{\"summary\": \"cut off mid sent",
        "{\"summary\": \"ends with escape \\",
        "{\"a\": [1, 2,]}",
        "{\"a\": [1}",
        "I'm sorry, I can't produce that.",
        "[1, 2",
        "``````",
        "{\"summary\": \"uses {braces} and ``` inside\"}",
        "{\"a\": 1} and {\"b\": 2}",
    ];

    #[test]
    fn test_strip_code_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_code_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_code_fences_single_line() {
        assert_eq!(strip_code_fences("```json{\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn test_strip_code_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_code_fences(input), input);
    }

    #[test]
    fn test_strip_code_fences_drops_postscript_after_fence() {
        let input = "```json\n{\"a\": 1}\n```\nLet me know if you need more.";
        assert_eq!(strip_code_fences(input), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_drops_preamble_and_postscript() {
        let input = "Here you go: {\"a\": {\"b\": 1}} Thanks!";
        assert_eq!(extract_outermost_object(input), "{\"a\": {\"b\": 1}}");
    }

    #[test]
    fn test_extract_keeps_truncated_tail() {
        let input = "Result: {\"a\": [1, 2";
        assert_eq!(extract_outermost_object(input), "{\"a\": [1, 2");
    }

    #[test]
    fn test_extract_ignores_braces_inside_strings() {
        let input = "{\"s\": \"}\"} trailing";
        assert_eq!(extract_outermost_object(input), "{\"s\": \"}\"}");
    }

    #[test]
    fn test_extract_without_brace_is_unchanged() {
        assert_eq!(extract_outermost_object("no json"), "no json");
    }

    #[test]
    fn test_drop_dangling_comma() {
        assert_eq!(drop_dangling_comma("[1, 2, \n"), "[1, 2");
        assert_eq!(drop_dangling_comma("[1,,"), "[1");
        assert_eq!(drop_dangling_comma("[1]"), "[1]");
    }

    #[test]
    fn test_balance_closes_arrays_and_objects_in_order() {
        assert_eq!(
            balance_delimiters("{\"a\": [{\"b\": 1}"),
            "{\"a\": [{\"b\": 1}]}"
        );
    }

    #[test]
    fn test_balance_closes_open_string() {
        assert_eq!(balance_delimiters("{\"s\": \"abc"), "{\"s\": \"abc\"}");
    }

    #[test]
    fn test_balance_drops_dangling_escape_before_closing_string() {
        assert_eq!(balance_delimiters("{\"s\": \"abc\\"), "{\"s\": \"abc\"}");
    }

    #[test]
    fn test_balance_leaves_balanced_text_alone() {
        let input = "{\"a\": [1, {\"b\": \"[{\"}]}";
        assert_eq!(balance_delimiters(input), input);
    }

    #[test]
    fn test_strip_commas_before_closers() {
        assert_eq!(
            strip_commas_before_closers("{\"a\": [1, 2, ], \"b\": 3,}"),
            "{\"a\": [1, 2], \"b\": 3}"
        );
        assert_eq!(
            strip_commas_before_closers("{\"s\": \"a,]\"}"),
            "{\"s\": \"a,]\"}"
        );
    }

    #[test]
    fn test_parse_fenced_payload() {
        let value =
            parse_model_json("```json\n{\"matchScore\": 80, \"summary\": \"Strong\"}\n```")
                .unwrap();
        assert_eq!(value["matchScore"], 80);
    }

    #[test]
    fn test_parse_truncated_payload_is_recovered() {
        let value = parse_model_json("{\"matchScore\": 80, \"strengths\": [").unwrap();
        assert_eq!(value["matchScore"], 80);
        assert!(value["strengths"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_parse_truncated_inside_array_with_comma() {
        let raw = "{\"matchScore\": 64, \"gaps\": [{\"requirement\": \"Go\"},";
        let value = parse_model_json(raw).unwrap();
        assert_eq!(value["gaps"][0]["requirement"], "Go");
    }

    #[test]
    fn test_parse_no_json_fails_with_raw_text() {
        let failure = parse_model_json("I'm sorry, I can't help with that.").unwrap_err();
        assert_eq!(failure.raw, "I'm sorry, I can't help with that.");
        assert!(!failure.reason.is_empty());
    }

    #[test]
    fn test_parse_non_object_fails() {
        let failure = parse_model_json("[1, 2, 3]").unwrap_err();
        assert!(failure.reason.contains("not an object"));
    }

    #[test]
    fn test_parse_unrecoverable_truncation_fails() {
        assert!(parse_model_json("{\"matchScore\": 80, \"summary\":").is_err());
    }

    #[test]
    fn test_parse_empty_fails() {
        assert!(parse_model_json("").is_err());
    }

    #[test]
    fn test_repair_is_idempotent() {
        for sample in SAMPLES {
            let once = repair_json(sample);
            let twice = repair_json(&once);
            assert_eq!(once, twice, "repair drifted for {sample:?}");
        }
    }

    #[test]
    fn test_each_transform_is_idempotent() {
        for sample in SAMPLES {
            for transform in PIPELINE {
                let once = transform(sample);
                assert_eq!(once, transform(&once), "transform drifted for {sample:?}");
            }
        }
    }
}
