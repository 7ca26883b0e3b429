//! Deterministic text normalization
//!
//! The same transform is applied to training data and to inference input;
//! the classifier's vocabulary is only meaningful over normalized text.
//!
//! The transform is total (never fails, empty in means empty out) and
//! idempotent: re-applying it to its own output changes nothing.

use regex::Regex;

use crate::error::{Error, Result};

/// Text normalizer with pre-compiled patterns.
///
/// Construct once and share; compilation happens in [`TextNormalizer::new`].
pub struct TextNormalizer {
    /// Maximal ASCII letter runs; word-level rules apply per run
    letter_run: Regex,
    /// Greeting canonicalization, anchored to a whole letter run
    greeting_hi: Regex,
    greeting_hello: Regex,
    greeting_yo: Regex,
    /// Contraction expansions, applied in order
    contractions: Vec<(Regex, &'static str)>,
    /// Anything outside the output alphabet (letters, whitespace, `!?.`)
    strip: Regex,
    whitespace: Regex,
}

/// Informal abbreviations expanded as whole words
const ABBREVIATIONS: [(&str, &str); 6] = [
    ("u", "you"),
    ("ur", "your"),
    ("cant", "cannot"),
    ("dont", "do not"),
    ("doesnt", "does not"),
    ("wont", "will not"),
];

impl TextNormalizer {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| Error::internal(format!("failed to compile pattern {pattern:?}: {e}")))
        };

        let contractions = [
            ("won't", "will not"),
            ("can't", "cannot"),
            ("n't", " not"),
            ("'re", " are"),
            ("'ve", " have"),
            ("'ll", " will"),
            ("'d", " would"),
        ];

        Ok(Self {
            letter_run: compile(r"[a-z]+")?,
            greeting_hi: compile(r"^h+i+$")?,
            greeting_hello: compile(r"^h+e+l+o+$")?,
            greeting_yo: compile(r"^y+o+$")?,
            contractions: contractions
                .into_iter()
                .map(|(pattern, replacement)| Ok((compile(pattern)?, replacement)))
                .collect::<Result<Vec<_>>>()?,
            strip: compile(r"[^a-zA-Z\s!?.]")?,
            whitespace: compile(r"\s+")?,
        })
    }

    /// Normalize raw text.
    ///
    /// Rules apply in a fixed order; earlier rules are never undone by
    /// later ones:
    /// 1. lowercase
    /// 2. expand contractions ("won't" -> "will not", "'re" -> " are", ...)
    /// 3. canonicalize whole words: informal greeting spellings ("hiiii" ->
    ///    "hi", "heelllooo" -> "hello", "yyoo" -> "yo") and abbreviations
    ///    ("u" -> "you", "dont" -> "do not", ...)
    /// 4. collapse runs of 3+ identical characters to exactly 2
    /// 5. replace everything but letters, whitespace and `!?.` with a space
    /// 6. collapse whitespace runs and trim
    ///
    /// Word boundaries for rule 3 are letter runs: any non-letter delimits
    /// a word. Rule 5 maps every non-letter to whitespace, so a word
    /// isolated there was already a word for rule 3, which keeps the
    /// transform idempotent.
    pub fn normalize(&self, text: &str) -> String {
        let mut text = text.to_lowercase();

        for (pattern, replacement) in &self.contractions {
            text = pattern.replace_all(&text, *replacement).into_owned();
        }

        let text = self
            .letter_run
            .replace_all(&text, |caps: &regex::Captures| {
                self.canonicalize_word(&caps[0]).to_string()
            });

        let text = collapse_repeats(&text);
        let text = self.strip.replace_all(&text, " ");
        let text = self.whitespace.replace_all(&text, " ");
        text.trim().to_string()
    }

    /// Map one whole word to its canonical form, or return it unchanged.
    fn canonicalize_word<'a>(&self, word: &'a str) -> &'a str {
        if self.greeting_hi.is_match(word) {
            return "hi";
        }
        if self.greeting_hello.is_match(word) {
            return "hello";
        }
        if self.greeting_yo.is_match(word) {
            return "yo";
        }
        ABBREVIATIONS
            .iter()
            .find(|(short, _)| *short == word)
            .map_or(word, |&(_, long)| long)
    }
}

/// Collapse runs of 3 or more identical characters down to exactly 2.
///
/// Runs of length 2 are left untouched: "soo" keeps the emphasis signal,
/// "soooo" stops inflating the vocabulary.
fn collapse_repeats(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    let mut run = 0usize;

    for ch in text.chars() {
        if prev == Some(ch) {
            run += 1;
        } else {
            prev = Some(ch);
            run = 1;
        }
        if run <= 2 {
            out.push(ch);
        }
    }

    out
}
