//! The fixed toxicity category set and per-category scores

use serde::{Deserialize, Serialize};

/// Number of toxicity categories
pub const LABEL_COUNT: usize = 6;

/// The six toxicity categories, in wire order.
///
/// The order is a contract: classifier output position N corresponds to
/// `TOXICITY_LABELS[N]`, and serialized score objects carry their fields
/// in exactly this order. Third parties depend on it.
pub const TOXICITY_LABELS: [&str; LABEL_COUNT] = [
    "toxic",
    "severe_toxic",
    "obscene",
    "threat",
    "insult",
    "identity_hate",
];

/// One probability per toxicity category, always complete.
///
/// Named fields (rather than a map) make "exactly six entries, fixed
/// order" a compile-time property; serde emits the fields in declaration
/// order, which matches [`TOXICITY_LABELS`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub toxic: f32,
    pub severe_toxic: f32,
    pub obscene: f32,
    pub threat: f32,
    pub insult: f32,
    pub identity_hate: f32,
}

impl CategoryScores {
    /// Build from an array in [`TOXICITY_LABELS`] order
    pub fn from_array(scores: [f32; LABEL_COUNT]) -> Self {
        Self {
            toxic: scores[0],
            severe_toxic: scores[1],
            obscene: scores[2],
            threat: scores[3],
            insult: scores[4],
            identity_hate: scores[5],
        }
    }

    /// Scores as an array in [`TOXICITY_LABELS`] order
    pub fn to_array(&self) -> [f32; LABEL_COUNT] {
        [
            self.toxic,
            self.severe_toxic,
            self.obscene,
            self.threat,
            self.insult,
            self.identity_hate,
        ]
    }

    /// Highest score across all categories
    pub fn max(&self) -> f32 {
        self.to_array().into_iter().fold(0.0_f32, f32::max)
    }

    /// Iterate `(label, score)` pairs in wire order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f32)> {
        TOXICITY_LABELS.into_iter().zip(self.to_array())
    }
}
