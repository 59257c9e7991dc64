//! Runtime configuration for the blog pipeline.
//!
//! Settings come from three layers, lowest priority first:
//!
//! 1. Built-in defaults (see the `Default` impls below)
//! 2. An optional YAML file passed with `--config`
//! 3. Command-line flags and environment variables (see [`crate::cli::Cli`])
//!
//! Every section is defaulted, so a YAML file only needs the keys it changes:
//!
//! ```yaml
//! generation:
//!   model: gemini-2.0-flash
//!   timeout_secs: 90
//! scrape:
//!   url: https://www.hrtechnologist.com/
//! budgets:
//!   draft: 3000
//! ```

use crate::stages::Stage;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_SCRAPE_URL: &str = "https://www.hrtechnologist.com/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Failures while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: &'static str },

    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub generation: GenerationConfig,
    pub scrape: ScrapeConfig,
    pub budgets: StageBudgets,
}

/// Settings for the text generation endpoint.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// API root, without the `/models/...` suffix.
    pub base_url: String,
    pub model: String,
    /// Sent as the `key` query parameter. Not validated; a missing key
    /// surfaces as an upstream HTTP error.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout_secs: 120,
        }
    }
}

// Hand-written so the API key never reaches the logs.
impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GenerationConfig {
    /// Build the full `generateContent` URL, with the API key as a query
    /// parameter when one is configured.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let raw = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let mut url = Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl {
            url: raw.clone(),
            source,
        })?;
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Settings for the trending-topic scrape.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_topics: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SCRAPE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
            max_topics: 5,
        }
    }
}

impl ScrapeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Maximum output tokens requested by each generation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StageBudgets {
    pub outline: u32,
    pub draft: u32,
    pub seo: u32,
    pub proofread: u32,
}

impl Default for StageBudgets {
    fn default() -> Self {
        Self {
            outline: Stage::Outline.default_budget(),
            draft: Stage::Draft.default_budget(),
            seo: Stage::Seo.default_budget(),
            proofread: Stage::Proofread.default_budget(),
        }
    }
}

impl StageBudgets {
    pub fn for_stage(&self, stage: Stage) -> u32 {
        match stage {
            Stage::Outline => self.outline,
            Stage::Draft => self.draft,
            Stage::Seo => self.seo,
            Stage::Proofread => self.proofread,
        }
    }
}

impl Config {
    /// Parse a YAML document. Missing keys fall back to defaults.
    pub fn from_yaml(yaml: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject settings that would make a run meaningless. Called after
    /// command-line overrides are applied.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("scrape.max_topics", self.scrape.max_topics as u64),
            ("scrape.timeout_secs", self.scrape.timeout_secs),
            ("generation.timeout_secs", self.generation.timeout_secs),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be greater than zero",
                });
            }
        }
        for stage in Stage::ALL {
            if self.budgets.for_stage(stage) == 0 {
                return Err(ConfigError::Invalid {
                    field: "budgets",
                    reason: "every stage budget must be greater than zero",
                });
            }
        }
        Ok(())
    }

    /// Load from `path`, or return the defaults when no path is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&yaml, path)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }
}
