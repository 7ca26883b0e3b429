//! CommentGuard Trainer
//!
//! Offline training driver: fits the TF-IDF vectorizer and the
//! one-vs-rest classifier together, reports held-out metrics, and
//! persists the matched pair for the serving processes to load.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

mod dataset;
mod metrics;
mod train;

#[derive(Parser, Debug)]
#[command(name = "commentguard-trainer")]
#[command(about = "Train and persist the CommentGuard toxicity model", long_about = None)]
struct Cli {
    /// JSON dataset file (array of {text, labels}); the bundled
    /// demonstration dataset is used when omitted
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Directory the fitted vectorizer/classifier pair is written to
    #[arg(short, long, default_value = "models")]
    output: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let rows = match &cli.data {
        Some(path) => {
            info!(path = %path.display(), "loading dataset");
            dataset::load_dataset(path)?
        }
        None => {
            info!("no dataset supplied, using the bundled demonstration dataset");
            dataset::sample_dataset()
        }
    };
    info!(rows = rows.len(), "dataset ready");

    let outcome = train::train_and_persist(&rows, &cli.output)?;

    println!();
    println!(
        "trained on {} rows, evaluated on {} held-out rows",
        outcome.train_rows, outcome.test_rows
    );
    println!();
    println!("{}", outcome.report.render());
    println!("model pair written to {}", cli.output.display());
    println!();

    print_sample_predictions(&outcome);
    Ok(())
}

/// Score a few fixed samples with the fresh model, the quickest smoke
/// check that the persisted pair behaves sensibly.
fn print_sample_predictions(outcome: &train::TrainingOutcome) {
    let scorer = match commentguard_classifiers::ToxicityScorer::new(Some(outcome.pair.clone())) {
        Ok(scorer) => scorer,
        Err(e) => {
            eprintln!("skipping sample predictions: {e}");
            return;
        }
    };

    let samples = [
        "This is a great article!",
        "You are an idiot and a fool!",
        "I will find you and hurt you.",
        "This damn post is complete bullshit.",
        "Thanks for the helpful information.",
        "I respectfully disagree with your point.",
    ];

    println!("sample predictions:");
    for sample in samples {
        println!("  {sample:?}");
        for (label, score) in scorer.predict(sample).iter() {
            if score > 0.1 {
                println!("    {label}: {score:.4}");
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
