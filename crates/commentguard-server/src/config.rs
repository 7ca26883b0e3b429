//! Server configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Directory holding the persisted model pair. When unset, the
    /// default candidate directories are probed in order.
    #[serde(default)]
    pub model_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &crate::cli::Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(model_dir) = &cli.model_dir {
            config.model_dir = Some(model_dir.clone());
        }

        Ok(config)
    }
}
