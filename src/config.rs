//! Search configuration.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Tunables for search dispatch.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Per-indexer search timeout in seconds. An indexer call still running
    /// when the timeout elapses is treated as a failed indexer and
    /// contributes zero results; it cannot stall the dispatch barrier.
    #[serde(default = "default_indexer_timeout")]
    pub indexer_timeout_secs: u64,
}

fn default_indexer_timeout() -> u64 {
    60
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            indexer_timeout_secs: default_indexer_timeout(),
        }
    }
}

impl SearchConfig {
    /// The per-indexer timeout as a [`Duration`].
    pub fn indexer_timeout(&self) -> Duration {
        Duration::from_secs(self.indexer_timeout_secs)
    }
}

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<SearchConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: SearchConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Validate configuration.
fn validate_config(config: &SearchConfig) -> Result<()> {
    if config.indexer_timeout_secs == 0 {
        anyhow::bail!("Indexer timeout cannot be 0");
    }

    Ok(())
}
