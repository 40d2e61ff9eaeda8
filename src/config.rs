use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::chunk::DEFAULT_MAX_CHARS;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
        }
    }
}

fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    /// Cap on chunks selected by keyword scoring.
    #[serde(default = "default_keyword_limit")]
    pub keyword_limit: usize,
    /// How many chunks from the front of the global list are candidates.
    #[serde(default = "default_window")]
    pub window: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            keyword_limit: default_keyword_limit(),
            window: default_window(),
        }
    }
}

fn default_keyword_limit() -> usize {
    5
}
fn default_window() -> usize {
    60
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    #[serde(default = "default_model_name")]
    pub name: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_model_name() -> String {
    "gpt-4o-mini".to_string()
}
fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_request_timeout_secs() -> u64 {
    120
}

/// Load configuration from `path`. A missing file is not an error: this
/// tool is routinely run without one, so defaults apply. Any other read
/// or parse failure is.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("Failed to read config file: {}", path.display()))
        }
    };

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate chunking
    if config.chunking.max_chars == 0 {
        anyhow::bail!("chunking.max_chars must be > 0");
    }

    // Validate retrieval
    if config.retrieval.keyword_limit == 0 {
        anyhow::bail!("retrieval.keyword_limit must be > 0");
    }
    if config.retrieval.window == 0 {
        anyhow::bail!("retrieval.window must be > 0");
    }

    // Validate model
    if config.model.name.trim().is_empty() {
        anyhow::bail!("model.name must not be empty");
    }
    if config.model.base_url.trim().is_empty() {
        anyhow::bail!("model.base_url must not be empty");
    }
    if config.model.request_timeout_secs == 0 {
        anyhow::bail!("model.request_timeout_secs must be > 0");
    }

    Ok(config)
}
