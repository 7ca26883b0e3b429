//! Inference orchestration: normalize, vectorize, classify, fall back
//!
//! The scorer is the only prediction entry point hosts call. It is
//! constructed once with whatever model pair the store produced and is
//! immutable afterwards; `predict` is infallible toward the caller and
//! degrades to the demo heuristic instead of propagating model errors.

use serde::{Deserialize, Serialize};
use tracing::warn;

use commentguard_core::{CategoryScores, Result, TextNormalizer};

use crate::demo::DemoScorer;
use crate::linear::OneVsRestClassifier;
use crate::vectorizer::TfidfVectorizer;

/// Fixed low-confidence result for text sharing no vocabulary with the
/// training corpus. An all-zero vector tells the classifier nothing, and
/// trusting its extrapolation there skews toward false positives; short
/// greetings are the common case.
pub const OUT_OF_VOCABULARY_SCORES: CategoryScores = CategoryScores {
    toxic: 0.10,
    severe_toxic: 0.05,
    obscene: 0.05,
    threat: 0.05,
    insult: 0.10,
    identity_hate: 0.05,
};

/// A vectorizer and the classifier fitted against its feature space.
///
/// The two are only meaningful together; they are persisted and loaded as
/// a unit and never recombined across training runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPair {
    pub vectorizer: TfidfVectorizer,
    pub classifier: OneVsRestClassifier,
}

/// Toxicity scorer shared read-only across all concurrent requests.
pub struct ToxicityScorer {
    normalizer: TextNormalizer,
    demo: DemoScorer,
    model: Option<ModelPair>,
}

impl ToxicityScorer {
    /// Build a scorer around an optional trained pair. `None` serves
    /// every request from the demo heuristic.
    pub fn new(model: Option<ModelPair>) -> Result<Self> {
        Ok(Self {
            normalizer: TextNormalizer::new()?,
            demo: DemoScorer::new()?,
            model,
        })
    }

    /// Whether requests are served by the demo heuristic
    pub fn demo_mode(&self) -> bool {
        self.model.is_none()
    }

    /// Score one text. Never fails: model errors fall back to the demo
    /// heuristic on the raw text.
    pub fn predict(&self, text: &str) -> CategoryScores {
        let Some(pair) = &self.model else {
            return self.demo.score(text);
        };

        match self.score_with_model(pair, text) {
            Ok(scores) => scores,
            Err(e) => {
                warn!(error = %e, "model scoring failed, serving demo heuristic");
                self.demo.score(text)
            }
        }
    }

    fn score_with_model(&self, pair: &ModelPair, text: &str) -> Result<CategoryScores> {
        let normalized = self.normalizer.normalize(text);
        let vector = pair.vectorizer.transform(&normalized)?;

        if vector.is_all_zero() {
            return Ok(OUT_OF_VOCABULARY_SCORES);
        }

        let probs = pair.classifier.predict_proba(&vector)?;
        Ok(CategoryScores::from_array(probs))
    }
}
