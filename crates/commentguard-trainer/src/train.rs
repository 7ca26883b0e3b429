//! The training driver
//!
//! Normalizes the dataset, splits it reproducibly, fits the vectorizer on
//! the training split only (fitting on held-out rows would leak test
//! vocabulary into the model and inflate every reported metric), fits the
//! classifier, evaluates on the held-out split, and persists the fitted
//! pair as a unit.

use std::collections::BTreeMap;
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

use commentguard_classifiers::{ModelPair, ModelStore, OneVsRestClassifier, TfidfVectorizer};
use commentguard_core::{Error, Result, TextNormalizer, LABEL_COUNT};

use crate::dataset::LabeledComment;
use crate::metrics::{evaluate, EvaluationReport};

/// Fixed seed for the train/test shuffle; training runs are reproducible.
pub const SPLIT_SEED: u64 = 42;

/// Fraction of each stratum held out for evaluation
pub const TEST_FRACTION: f32 = 0.2;

/// Result of one training run
pub struct TrainingOutcome {
    pub pair: ModelPair,
    pub report: EvaluationReport,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Train a model pair on labeled rows and evaluate it.
pub fn train(rows: &[LabeledComment]) -> Result<TrainingOutcome> {
    let normalizer = TextNormalizer::new()?;

    // Rows whose normalized text is empty carry no signal; drop them.
    let prepared: Vec<(String, [u8; LABEL_COUNT])> = rows
        .iter()
        .filter_map(|row| {
            let normalized = normalizer.normalize(&row.text);
            (!normalized.is_empty()).then(|| (normalized, row.labels))
        })
        .collect();

    if prepared.is_empty() {
        return Err(Error::training("no rows left after normalization"));
    }
    info!(rows = prepared.len(), "normalized training data");

    let (train_idx, test_idx) = stratified_split(&prepared);
    if train_idx.is_empty() || test_idx.is_empty() {
        return Err(Error::training(format!(
            "dataset too small to split: {} train rows, {} test rows",
            train_idx.len(),
            test_idx.len()
        )));
    }
    info!(train = train_idx.len(), test = test_idx.len(), "split dataset");

    let train_texts: Vec<&str> = train_idx.iter().map(|&i| prepared[i].0.as_str()).collect();
    let mut vectorizer = TfidfVectorizer::new();
    vectorizer.fit(&train_texts)?;
    if vectorizer.dimension() == 0 {
        return Err(Error::training(
            "no terms survived document-frequency pruning; dataset too small or too uniform",
        ));
    }
    info!(features = vectorizer.dimension(), "fitted vectorizer");

    let train_features = transform_rows(&vectorizer, &prepared, &train_idx)?;
    let train_labels: Vec<[u8; LABEL_COUNT]> = train_idx.iter().map(|&i| prepared[i].1).collect();

    let mut classifier = OneVsRestClassifier::new();
    classifier.fit(&train_features, &train_labels)?;
    info!("fitted classifier");

    let test_features = transform_rows(&vectorizer, &prepared, &test_idx)?;
    let test_labels: Vec<[u8; LABEL_COUNT]> = test_idx.iter().map(|&i| prepared[i].1).collect();

    let predictions: Vec<[u8; LABEL_COUNT]> = test_features
        .iter()
        .map(|vector| {
            let probs = classifier.predict_proba(vector)?;
            Ok(probs.map(|p| u8::from(p >= 0.5)))
        })
        .collect::<Result<_>>()?;
    let report = evaluate(&predictions, &test_labels);

    Ok(TrainingOutcome {
        pair: ModelPair { vectorizer, classifier },
        report,
        train_rows: train_idx.len(),
        test_rows: test_idx.len(),
    })
}

/// Train and persist the pair. Persistence failures abort the run; there
/// is no fallback on the training path.
pub fn train_and_persist(rows: &[LabeledComment], output_dir: &Path) -> Result<TrainingOutcome> {
    let outcome = train(rows)?;
    ModelStore::save(&outcome.pair, output_dir)?;
    Ok(outcome)
}

/// 80/20 split stratified by the number of active labels per row, so rows
/// with many simultaneous categories land in both splits.
fn stratified_split(rows: &[(String, [u8; LABEL_COUNT])]) -> (Vec<usize>, Vec<usize>) {
    let mut strata: BTreeMap<u8, Vec<usize>> = BTreeMap::new();
    for (idx, (_, labels)) in rows.iter().enumerate() {
        strata.entry(labels.iter().sum()).or_default().push(idx);
    }

    let mut rng = StdRng::seed_from_u64(SPLIT_SEED);
    let mut train = Vec::new();
    let mut test = Vec::new();
    for indices in strata.values_mut() {
        indices.shuffle(&mut rng);
        let n_test = ((indices.len() as f32) * TEST_FRACTION).round() as usize;
        test.extend_from_slice(&indices[..n_test]);
        train.extend_from_slice(&indices[n_test..]);
    }
    (train, test)
}

fn transform_rows(
    vectorizer: &TfidfVectorizer,
    rows: &[(String, [u8; LABEL_COUNT])],
    indices: &[usize],
) -> Result<Vec<commentguard_classifiers::FeatureVector>> {
    indices
        .iter()
        .map(|&i| vectorizer.transform(&rows[i].0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::sample_dataset;
    use commentguard_classifiers::{ModelStore, ToxicityScorer};

    #[test]
    fn test_training_on_sample_dataset_succeeds() {
        let outcome = train(&sample_dataset()).unwrap();

        assert!(outcome.train_rows > outcome.test_rows);
        assert!(outcome.pair.vectorizer.dimension() > 0);
        assert_eq!(
            outcome.pair.classifier.dimension(),
            outcome.pair.vectorizer.dimension()
        );
    }

    #[test]
    fn test_trained_model_separates_toxic_from_clean() {
        let outcome = train(&sample_dataset()).unwrap();
        let scorer = ToxicityScorer::new(Some(outcome.pair)).unwrap();

        let toxic = scorer.predict("You are such an idiot, this is completely wrong!");
        let clean = scorer.predict("This is a great article, thank you for sharing!");
        assert!(
            toxic.toxic > clean.toxic,
            "toxic {} vs clean {}",
            toxic.toxic,
            clean.toxic
        );
    }

    #[test]
    fn test_training_is_reproducible() {
        let rows = sample_dataset();
        let first = train(&rows).unwrap();
        let second = train(&rows).unwrap();

        let probe = "You are a pathetic loser and I hate you";
        let scorer_a = ToxicityScorer::new(Some(first.pair)).unwrap();
        let scorer_b = ToxicityScorer::new(Some(second.pair)).unwrap();
        assert_eq!(scorer_a.predict(probe), scorer_b.predict(probe));
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        assert!(train(&[]).is_err());
    }

    #[test]
    fn test_rows_with_empty_normalization_are_dropped() {
        // every row normalizes to the empty string, nothing to fit on
        let rows = vec![
            LabeledComment { text: "12345".to_string(), labels: [0; LABEL_COUNT] },
            LabeledComment { text: "   ".to_string(), labels: [0; LABEL_COUNT] },
        ];
        assert!(train(&rows).is_err());
    }

    #[test]
    fn test_train_and_persist_writes_a_loadable_pair() {
        let dir = tempfile::tempdir().unwrap();
        train_and_persist(&sample_dataset(), dir.path()).unwrap();

        let pair = ModelStore::at(dir.path()).load().expect("persisted pair should load");
        assert!(pair.vectorizer.dimension() > 0);
    }
}
