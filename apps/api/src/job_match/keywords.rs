//! Keyword Extractor — deterministic scan of a job description against the portfolio taxonomy.
//!
//! Matching is case-insensitive and whole-word. A word boundary is the start or end of the
//! text or any non-word character, which keeps `go` from matching inside `going` while still
//! letting keywords such as `C++` or `Node.js` match.

use regex::Regex;
use serde::Serialize;
use tracing::warn;

use crate::portfolio::models::{KeywordCategory, KeywordTaxonomy};

/// Taxonomy hits bucketed by category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryMatches {
    pub core: Vec<String>,
    pub technical: Vec<String>,
    pub tools: Vec<String>,
    pub soft: Vec<String>,
}

impl CategoryMatches {
    fn bucket_mut(&mut self, category: KeywordCategory) -> &mut Vec<String> {
        match category {
            KeywordCategory::Core => &mut self.core,
            KeywordCategory::Technical => &mut self.technical,
            KeywordCategory::Tools => &mut self.tools,
            KeywordCategory::Soft => &mut self.soft,
        }
    }
}

/// Per-request keyword matches. Never persisted.
///
/// Every entry of `critical` / `recommended` also sits in one `categories` bucket.
/// Duplicates across categories are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeywordMatchSet {
    pub critical: Vec<String>,
    pub recommended: Vec<String>,
    pub categories: CategoryMatches,
}

impl KeywordMatchSet {
    pub fn is_empty(&self) -> bool {
        self.critical.is_empty() && self.recommended.is_empty()
    }

    /// Critical then recommended, in match order.
    pub fn all(&self) -> impl Iterator<Item = &String> {
        self.critical.iter().chain(self.recommended.iter())
    }

    pub fn total(&self) -> usize {
        self.critical.len() + self.recommended.len()
    }
}

struct CompiledKeyword {
    category: KeywordCategory,
    keyword: String,
    pattern: Regex,
}

/// Taxonomy compiled into whole-word patterns once, reused for every request.
pub struct KeywordMatcher {
    compiled: Vec<CompiledKeyword>,
}

impl KeywordMatcher {
    pub fn new(taxonomy: &KeywordTaxonomy) -> Self {
        let mut compiled = Vec::with_capacity(taxonomy.len());

        for category in KeywordCategory::ALL {
            for keyword in taxonomy.keywords(category) {
                let trimmed = keyword.trim();
                if trimmed.is_empty() {
                    continue;
                }
                match whole_word_pattern(trimmed) {
                    Ok(pattern) => compiled.push(CompiledKeyword {
                        category,
                        keyword: trimmed.to_string(),
                        pattern,
                    }),
                    Err(e) => warn!("Skipping keyword '{trimmed}': {e}"),
                }
            }
        }

        Self { compiled }
    }

    pub fn extract(&self, job_text: &str) -> KeywordMatchSet {
        let mut matches = KeywordMatchSet::default();

        for entry in &self.compiled {
            if !entry.pattern.is_match(job_text) {
                continue;
            }
            matches
                .categories
                .bucket_mut(entry.category)
                .push(entry.keyword.clone());
            if entry.category.is_critical() {
                matches.critical.push(entry.keyword.clone());
            } else {
                matches.recommended.push(entry.keyword.clone());
            }
        }

        matches
    }
}

/// One-shot extraction. Prefer a long-lived `KeywordMatcher` on hot paths.
#[allow(dead_code)]
pub fn extract_matching_keywords(job_text: &str, taxonomy: &KeywordTaxonomy) -> KeywordMatchSet {
    KeywordMatcher::new(taxonomy).extract(job_text)
}

fn whole_word_pattern(keyword: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?i)(?:^|\W){}(?:\W|$)", regex::escape(keyword)))
}
