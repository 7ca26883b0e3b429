//! CommentGuard Handler
//!
//! One-shot hosting adapter for function platforms: reads a single JSON
//! request from stdin, scores it with the same scorer/policy pair the
//! server uses, and writes one JSON response to stdout. Logs go to
//! stderr so stdout stays clean JSON.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use commentguard_classifiers::{ModelStore, ToxicityScorer};
use commentguard_core::CategoryScores;
use commentguard_policy::{assess, ToxicityLevel, BATCH_PREDICT_THRESHOLD, SINGLE_PREDICT_THRESHOLD};

/// Hard cap on batch request size, matching the server endpoint
const MAX_BATCH_SIZE: usize = 100;

#[derive(Parser, Debug)]
#[command(name = "commentguard-handler")]
#[command(about = "Score one JSON request from stdin", long_about = None)]
struct Cli {
    /// Directory holding the persisted model pair
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Enable verbose logging (stderr)
    #[arg(short, long)]
    verbose: bool,
}

/// A request carries either a single `text` or a `texts` array
#[derive(Debug, Deserialize)]
struct HandlerRequest {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    texts: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct SingleResponse {
    success: bool,
    text: String,
    predictions: CategoryScores,
    is_toxic: bool,
    max_toxicity: f32,
    toxicity_level: ToxicityLevel,
    timestamp: String,
    demo_mode: bool,
}

#[derive(Debug, Serialize)]
struct BatchItem {
    text: String,
    predictions: CategoryScores,
    is_toxic: bool,
    max_toxicity: f32,
}

#[derive(Debug, Serialize)]
struct BatchResponse {
    success: bool,
    count: usize,
    results: Vec<BatchItem>,
    timestamp: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;

    let request: HandlerRequest = match serde_json::from_str(&input) {
        Ok(request) => request,
        Err(e) => return emit(json!({"success": false, "error": format!("Invalid JSON: {e}")})),
    };

    // One-shot process: the load happens exactly once by construction.
    let store = match &cli.model_dir {
        Some(dir) => ModelStore::at(dir.clone()),
        None => ModelStore::new(),
    };
    let scorer = ToxicityScorer::new(store.load())?;
    info!(demo_mode = scorer.demo_mode(), "scorer ready");

    match (request.text, request.texts) {
        (Some(text), _) => handle_single(&scorer, text),
        (None, Some(texts)) => handle_batch(&scorer, texts),
        (None, None) => emit(json!({
            "success": false,
            "error": "No text provided. Send JSON with a \"text\" field or a \"texts\" array.",
        })),
    }
}

fn handle_single(scorer: &ToxicityScorer, text: String) -> Result<()> {
    if text.trim().is_empty() {
        return emit(json!({"success": false, "error": "Text cannot be empty."}));
    }

    let scores = scorer.predict(&text);
    let verdict = assess(&scores, SINGLE_PREDICT_THRESHOLD);
    emit(SingleResponse {
        success: true,
        text,
        predictions: scores,
        is_toxic: verdict.is_toxic,
        max_toxicity: verdict.max_toxicity,
        toxicity_level: verdict.toxicity_level,
        timestamp: Utc::now().to_rfc3339(),
        demo_mode: scorer.demo_mode(),
    })
}

fn handle_batch(scorer: &ToxicityScorer, texts: Vec<String>) -> Result<()> {
    if texts.len() > MAX_BATCH_SIZE {
        return emit(json!({
            "success": false,
            "error": format!("Maximum batch size is {MAX_BATCH_SIZE} texts."),
        }));
    }

    let results: Vec<BatchItem> = texts
        .into_iter()
        .filter(|text| !text.trim().is_empty())
        .map(|text| {
            let scores = scorer.predict(&text);
            let verdict = assess(&scores, BATCH_PREDICT_THRESHOLD);
            BatchItem {
                text,
                predictions: scores,
                is_toxic: verdict.is_toxic,
                max_toxicity: verdict.max_toxicity,
            }
        })
        .collect();

    emit(BatchResponse {
        success: true,
        count: results.len(),
        results,
        timestamp: Utc::now().to_rfc3339(),
    })
}

fn emit(response: impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
