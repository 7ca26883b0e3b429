//! Application state shared across all requests

use std::sync::Arc;

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

use commentguard_classifiers::{ModelStore, ToxicityScorer};

use crate::config::ServerConfig;

/// Application state shared across all requests.
///
/// The scorer is built exactly once, in the composition root before the
/// listener binds, and is immutable for the life of the process. Handlers
/// clone the `Arc`, never reload the model pair; replacing the model means
/// retraining and restarting.
#[derive(Clone)]
pub struct AppState {
    /// The shared, read-only scorer
    pub scorer: Arc<ToxicityScorer>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    /// Initialize application state: probe the model store once and wrap
    /// whatever it produced. Absence of a model is not an error; the
    /// scorer serves the demo heuristic instead.
    pub fn new(config: &ServerConfig, metrics_handle: PrometheusHandle) -> Result<Self> {
        let store = match &config.model_dir {
            Some(dir) => ModelStore::at(dir.clone()),
            None => ModelStore::new(),
        };

        let pair = store.load();
        match &pair {
            Some(_) => info!("model pair loaded, serving trained model"),
            None => info!("no model pair available, serving demo heuristic"),
        }

        let scorer = ToxicityScorer::new(pair)?;
        Ok(Self {
            scorer: Arc::new(scorer),
            metrics_handle,
        })
    }
}
