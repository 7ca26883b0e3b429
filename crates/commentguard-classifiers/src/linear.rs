//! One-vs-rest logistic regression over TF-IDF features
//!
//! Each toxicity category is an independent binary head sharing the same
//! feature space; probabilities are not mutually exclusive and do not sum
//! to one. Training uses batch gradient descent with balanced class
//! weights and L2 regularization.

use serde::{Deserialize, Serialize};

use commentguard_core::{Error, Result, LABEL_COUNT};

use crate::vectorizer::FeatureVector;

/// A single binary logistic head
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LogisticHead {
    weights: Vec<f32>,
    bias: f32,
}

impl LogisticHead {
    fn probability(&self, vector: &FeatureVector) -> f32 {
        let z = self.bias
            + vector
                .entries
                .iter()
                .map(|&(idx, value)| self.weights[idx] * value)
                .sum::<f32>();
        sigmoid(z)
    }
}

/// Multi-label classifier: one logistic head per toxicity category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneVsRestClassifier {
    heads: Vec<LogisticHead>,
    dimension: usize,
    learning_rate: f32,
    max_iter: usize,
    tol: f32,
    l2: f32,
}

impl OneVsRestClassifier {
    pub fn new() -> Self {
        Self {
            heads: Vec::new(),
            dimension: 0,
            learning_rate: 0.1,
            max_iter: 200,
            tol: 1e-4,
            l2: 1.0,
        }
    }

    /// Sets the gradient-descent learning rate.
    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the maximum number of training epochs.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the convergence tolerance on the update step.
    pub fn with_tol(mut self, tol: f32) -> Self {
        self.tol = tol;
        self
    }

    /// Sets the L2 regularization strength.
    pub fn with_l2(mut self, l2: f32) -> Self {
        self.l2 = l2;
        self
    }

    /// Fit all six heads on a feature matrix and its label matrix.
    pub fn fit(
        &mut self,
        features: &[FeatureVector],
        labels: &[[u8; LABEL_COUNT]],
    ) -> Result<()> {
        if features.is_empty() {
            return Err(Error::training("cannot fit classifier on an empty dataset"));
        }
        if features.len() != labels.len() {
            return Err(Error::training(format!(
                "feature/label row mismatch: {} features, {} labels",
                features.len(),
                labels.len()
            )));
        }

        let dimension = features[0].dimension;
        if features.iter().any(|f| f.dimension != dimension) {
            return Err(Error::training("feature rows have inconsistent dimensions"));
        }

        self.dimension = dimension;
        let heads = (0..LABEL_COUNT)
            .map(|label_idx| {
                let targets: Vec<f32> = labels.iter().map(|row| f32::from(row[label_idx])).collect();
                self.fit_head(features, &targets)
            })
            .collect();
        self.heads = heads;

        Ok(())
    }

    /// Probability per category, in label order.
    ///
    /// Deterministic for a fitted state; rejects vectors from a different
    /// feature space.
    pub fn predict_proba(&self, vector: &FeatureVector) -> Result<[f32; LABEL_COUNT]> {
        if self.heads.len() != LABEL_COUNT {
            return Err(Error::prediction("classifier has not been fitted"));
        }
        if vector.dimension != self.dimension {
            return Err(Error::prediction(format!(
                "feature dimension mismatch: vector has {}, classifier was fitted on {}",
                vector.dimension, self.dimension
            )));
        }
        if self.heads.iter().any(|head| head.weights.len() != self.dimension) {
            return Err(Error::prediction(
                "classifier state is inconsistent: head width differs from fitted dimension",
            ));
        }

        let mut probs = [0.0; LABEL_COUNT];
        for (slot, head) in probs.iter_mut().zip(&self.heads) {
            *slot = head.probability(vector);
        }
        Ok(probs)
    }

    /// Dimension of the fitted feature space
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Train one binary head with balanced class weights.
    fn fit_head(&self, features: &[FeatureVector], targets: &[f32]) -> LogisticHead {
        let n = features.len() as f32;
        let positives = targets.iter().sum::<f32>();
        let negatives = n - positives;

        // A single-class column has nothing to separate; pin the head to a
        // saturated probability instead of diverging.
        if positives == 0.0 {
            return LogisticHead { weights: vec![0.0; self.dimension], bias: -8.0 };
        }
        if negatives == 0.0 {
            return LogisticHead { weights: vec![0.0; self.dimension], bias: 8.0 };
        }

        let weight_pos = n / (2.0 * positives);
        let weight_neg = n / (2.0 * negatives);

        let mut weights = vec![0.0_f32; self.dimension];
        let mut bias = 0.0_f32;
        let mut gradient = vec![0.0_f32; self.dimension];

        for _ in 0..self.max_iter {
            gradient.iter_mut().for_each(|g| *g = 0.0);
            let mut gradient_bias = 0.0_f32;

            for (vector, &target) in features.iter().zip(targets) {
                let z = bias
                    + vector
                        .entries
                        .iter()
                        .map(|&(idx, value)| weights[idx] * value)
                        .sum::<f32>();
                let class_weight = if target > 0.5 { weight_pos } else { weight_neg };
                let residual = class_weight * (sigmoid(z) - target);

                for &(idx, value) in &vector.entries {
                    gradient[idx] += residual * value;
                }
                gradient_bias += residual;
            }

            let mut max_step = 0.0_f32;
            for (w, g) in weights.iter_mut().zip(&gradient) {
                let step = self.learning_rate * (g / n + self.l2 * *w / n);
                *w -= step;
                max_step = max_step.max(step.abs());
            }
            let bias_step = self.learning_rate * gradient_bias / n;
            bias -= bias_step;
            max_step = max_step.max(bias_step.abs());

            if max_step < self.tol {
                break;
            }
        }

        LogisticHead { weights, bias }
    }
}

impl Default for OneVsRestClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn sigmoid(z: f32) -> f32 {
    let z = z.clamp(-30.0, 30.0);
    1.0 / (1.0 + (-z).exp())
}
