//! Scoring latency benchmarks
//!
//! Prediction sits on the request path, so the full pipeline is expected
//! to stay well under a millisecond per text.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use commentguard_classifiers::{ModelPair, OneVsRestClassifier, TfidfVectorizer, ToxicityScorer};

fn fitted_scorer() -> ToxicityScorer {
    let corpus = [
        "you stupid idiot this is wrong",
        "stupid garbage waste of time",
        "hate people like this idiot",
        "will find you and hurt you",
        "great article thank you for sharing",
        "very informative and well written",
        "appreciate the detailed explanation",
        "interesting perspective learned something new",
    ];
    let labels = vec![
        [1, 0, 0, 0, 1, 0],
        [1, 0, 0, 0, 1, 0],
        [1, 0, 0, 0, 1, 1],
        [1, 0, 0, 1, 0, 0],
        [0, 0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0, 0],
    ];

    let mut vectorizer = TfidfVectorizer::new().with_min_df(1).with_max_df(1.0);
    vectorizer.fit(&corpus).unwrap();
    let features: Vec<_> = corpus.iter().map(|t| vectorizer.transform(t).unwrap()).collect();
    let mut classifier = OneVsRestClassifier::new();
    classifier.fit(&features, &labels).unwrap();

    ToxicityScorer::new(Some(ModelPair { vectorizer, classifier })).unwrap()
}

fn bench_demo_predict(c: &mut Criterion) {
    let scorer = ToxicityScorer::new(None).unwrap();
    c.bench_function("demo_predict", |b| {
        b.iter(|| scorer.predict(black_box("You are such a stupid idiot, I hate this!")))
    });
}

fn bench_model_predict(c: &mut Criterion) {
    let scorer = fitted_scorer();
    c.bench_function("model_predict", |b| {
        b.iter(|| scorer.predict(black_box("You are such a stupid idiot, I hate this!")))
    });
}

fn bench_model_predict_out_of_vocabulary(c: &mut Criterion) {
    let scorer = fitted_scorer();
    c.bench_function("model_predict_oov", |b| {
        b.iter(|| scorer.predict(black_box("hiiii")))
    });
}

criterion_group!(
    benches,
    bench_demo_predict,
    bench_model_predict,
    bench_model_predict_out_of_vocabulary
);
criterion_main!(benches);
