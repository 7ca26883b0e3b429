//! Verdict derivation from per-category scores

use serde::{Deserialize, Serialize};

use commentguard_core::CategoryScores;

/// `is_toxic` threshold used by the single-prediction path.
pub const SINGLE_PREDICT_THRESHOLD: f32 = 0.65;

/// `is_toxic` threshold used by the batch-prediction path.
///
/// Deliberately different from [`SINGLE_PREDICT_THRESHOLD`]: the two
/// literals ship as-is until product owners decide whether the split is
/// intentional (see DESIGN.md). Do not unify silently.
pub const BATCH_PREDICT_THRESHOLD: f32 = 0.50;

/// Human-readable severity band for the highest category score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToxicityLevel {
    Safe,
    Moderate,
    Toxic,
    #[serde(rename = "Highly Toxic")]
    HighlyToxic,
}

impl ToxicityLevel {
    /// Band a maximum score: `<0.2` Safe, `<0.4` Moderate, `<0.6` Toxic,
    /// else Highly Toxic.
    pub fn from_score(score: f32) -> Self {
        if score < 0.2 {
            Self::Safe
        } else if score < 0.4 {
            Self::Moderate
        } else if score < 0.6 {
            Self::Toxic
        } else {
            Self::HighlyToxic
        }
    }
}

impl std::fmt::Display for ToxicityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Safe => "Safe",
            Self::Moderate => "Moderate",
            Self::Toxic => "Toxic",
            Self::HighlyToxic => "Highly Toxic",
        };
        f.write_str(label)
    }
}

/// The caller-facing verdict, derived purely from the scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether any category exceeds the caller's threshold
    pub is_toxic: bool,

    /// Highest category score, rounded to 4 decimals for display
    pub max_toxicity: f32,

    /// Severity band of the highest score
    pub toxicity_level: ToxicityLevel,
}

/// Derive the verdict for a score set under the caller-selected
/// `is_toxic` threshold. The comparison is strictly greater-than: a score
/// exactly at the threshold is not toxic.
pub fn assess(scores: &CategoryScores, threshold: f32) -> Verdict {
    let max = scores.max();
    Verdict {
        is_toxic: scores.iter().any(|(_, score)| score > threshold),
        max_toxicity: round4(max),
        toxicity_level: ToxicityLevel::from_score(max),
    }
}

fn round4(value: f32) -> f32 {
    (value * 10_000.0).round() / 10_000.0
}
