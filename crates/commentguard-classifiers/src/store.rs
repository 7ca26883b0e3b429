//! Model pair persistence
//!
//! The vectorizer and classifier are written as a matched, versionless
//! pair of JSON files in one directory. Serving probes a fixed ordered
//! list of candidate directories and treats anything short of a complete,
//! parseable pair as "no model": absence activates demo mode, it is
//! never an error. Training-time save failures are real errors.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use commentguard_core::Result;

use crate::scorer::ModelPair;

/// File name of the persisted vectorizer state
pub const VECTORIZER_FILE: &str = "vectorizer.json";

/// File name of the persisted classifier state
pub const CLASSIFIER_FILE: &str = "classifier.json";

/// Locates and loads persisted model pairs.
pub struct ModelStore {
    candidates: Vec<PathBuf>,
}

impl ModelStore {
    /// Store probing the default candidate directories, nearest first.
    pub fn new() -> Self {
        Self::with_candidates(vec![
            PathBuf::from("models"),
            PathBuf::from("data/models"),
            PathBuf::from("../models"),
        ])
    }

    /// Store probing exactly the given directories, in order.
    pub fn with_candidates(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    /// Store probing a single directory.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self::with_candidates(vec![dir.into()])
    }

    /// Load the first complete pair found, or `None`.
    ///
    /// A pair that exists but fails to parse also yields `None`: a corrupt
    /// model degrades to demo mode rather than failing the serving process.
    pub fn load(&self) -> Option<ModelPair> {
        let dir = self.candidates.iter().find(|dir| {
            dir.join(VECTORIZER_FILE).is_file() && dir.join(CLASSIFIER_FILE).is_file()
        })?;

        match load_dir(dir) {
            Ok(pair) => {
                info!(dir = %dir.display(), "loaded model pair");
                Some(pair)
            }
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "model pair unreadable, using demo mode");
                None
            }
        }
    }

    /// Persist a pair into `dir`, creating it if needed.
    pub fn save(pair: &ModelPair, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let vectorizer_file = File::create(dir.join(VECTORIZER_FILE))?;
        serde_json::to_writer(BufWriter::new(vectorizer_file), &pair.vectorizer)?;

        let classifier_file = File::create(dir.join(CLASSIFIER_FILE))?;
        serde_json::to_writer(BufWriter::new(classifier_file), &pair.classifier)?;

        info!(dir = %dir.display(), "saved model pair");
        Ok(())
    }
}

impl Default for ModelStore {
    fn default() -> Self {
        Self::new()
    }
}

fn load_dir(dir: &Path) -> Result<ModelPair> {
    let vectorizer_file = File::open(dir.join(VECTORIZER_FILE))?;
    let vectorizer = serde_json::from_reader(BufReader::new(vectorizer_file))?;

    let classifier_file = File::open(dir.join(CLASSIFIER_FILE))?;
    let classifier = serde_json::from_reader(BufReader::new(classifier_file))?;

    Ok(ModelPair { vectorizer, classifier })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear::OneVsRestClassifier;
    use crate::vectorizer::TfidfVectorizer;

    fn fitted_pair() -> ModelPair {
        let mut vectorizer = TfidfVectorizer::new().with_min_df(1).with_max_df(1.0);
        vectorizer
            .fit(&["hate speech everywhere", "stupid hate comments", "idiot remarks"])
            .unwrap();

        let features: Vec<_> = ["hate speech", "stupid comments", "idiot remarks"]
            .iter()
            .map(|t| vectorizer.transform(t).unwrap())
            .collect();
        let labels = vec![[1, 0, 0, 0, 0, 1], [1, 0, 0, 0, 1, 0], [1, 0, 0, 0, 1, 0]];

        let mut classifier = OneVsRestClassifier::new();
        classifier.fit(&features, &labels).unwrap();

        ModelPair { vectorizer, classifier }
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let pair = fitted_pair();
        ModelStore::save(&pair, dir.path()).unwrap();

        let loaded = ModelStore::at(dir.path()).load().expect("pair should load");
        let vector = pair.vectorizer.transform("hate speech").unwrap();
        let expected = pair.classifier.predict_proba(&vector).unwrap();
        let actual = loaded
            .classifier
            .predict_proba(&loaded.vectorizer.transform("hate speech").unwrap())
            .unwrap();
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_missing_directory_is_not_an_error() {
        let store = ModelStore::at("/nonexistent/commentguard/models");
        assert!(store.load().is_none());
    }

    #[test]
    fn test_incomplete_pair_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(VECTORIZER_FILE), "{}").unwrap();

        // classifier file missing: not a pair
        assert!(ModelStore::at(dir.path()).load().is_none());
    }

    #[test]
    fn test_corrupt_pair_degrades_to_absent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(VECTORIZER_FILE), "not json").unwrap();
        std::fs::write(dir.path().join(CLASSIFIER_FILE), "not json").unwrap();

        assert!(ModelStore::at(dir.path()).load().is_none());
    }

    #[test]
    fn test_first_candidate_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let pair = fitted_pair();
        ModelStore::save(&pair, first.path()).unwrap();
        ModelStore::save(&pair, second.path()).unwrap();

        let store = ModelStore::with_candidates(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        assert!(store.load().is_some());
    }
}
