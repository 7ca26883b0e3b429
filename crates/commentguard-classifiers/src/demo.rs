//! Keyword-heuristic fallback scorer
//!
//! Active when no trained model pair is available, or when the model
//! pipeline fails. Pure substring membership over the lowercased raw
//! text; not a statistical model.

use aho_corasick::AhoCorasick;

use commentguard_core::{CategoryScores, Error, Result, LABEL_COUNT};

/// Per-category keyword automaton with its hit and floor scores
struct CategoryMatcher {
    keywords: AhoCorasick,
    hit: f32,
    floor: f32,
}

/// Demo scorer: fixed keyword sets, fixed scores, every category
/// evaluated independently.
pub struct DemoScorer {
    matchers: [CategoryMatcher; LABEL_COUNT],
}

impl DemoScorer {
    pub fn new() -> Result<Self> {
        let build = |keywords: &[&str], hit: f32, floor: f32| -> Result<CategoryMatcher> {
            let keywords = AhoCorasick::builder()
                .ascii_case_insensitive(true)
                .build(keywords)
                .map_err(|e| Error::internal(format!("failed to build keyword matcher: {e}")))?;
            Ok(CategoryMatcher { keywords, hit, floor })
        };

        Ok(Self {
            matchers: [
                build(&["hate", "stupid", "idiot", "kill", "die", "worst"], 0.80, 0.10)?,
                build(&["kill", "die", "murder"], 0.70, 0.05)?,
                build(&["damn", "hell"], 0.60, 0.08)?,
                build(&["kill", "hurt", "attack", "destroy"], 0.75, 0.04)?,
                build(&["stupid", "idiot", "fool", "dumb"], 0.65, 0.07)?,
                build(&["hate"], 0.60, 0.03)?,
            ],
        })
    }

    /// Score raw (un-normalized) text by keyword membership.
    pub fn score(&self, text: &str) -> CategoryScores {
        let mut scores = [0.0; LABEL_COUNT];
        for (slot, matcher) in scores.iter_mut().zip(&self.matchers) {
            *slot = if matcher.keywords.is_match(text) {
                matcher.hit
            } else {
                matcher.floor
            };
        }
        CategoryScores::from_array(scores)
    }
}
