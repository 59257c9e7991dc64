//! Command-line interface definitions.
//!
//! Every option can also be set in the YAML config file; flags given here
//! win over the file. The API key is normally supplied through the
//! `GEMINI_API_KEY` environment variable, which may come from a `.env` file
//! (see [`load_dotenv`]).

use crate::config::Config;
use crate::pipeline::ErrorPolicy;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Load a `.env` file into the process environment.
///
/// With no `path`, searches the working directory and its parents. Variables
/// already set in the environment win over the file. A missing file is not an
/// error. Must run before [`Cli::parse`] so `env = ...` arguments see the
/// loaded values.
pub fn load_dotenv(path: Option<&Path>) -> Option<PathBuf> {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };
    match loaded {
        Ok(path) => {
            info!(path = %path.display(), "Loaded environment file");
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            warn!(error = %e, "Failed to load environment file; continuing without it");
            None
        }
    }
}

/// Turn a trending HR headline into a finished blog post.
///
/// # Examples
///
/// ```sh
/// # Scrape a topic and write a post
/// GEMINI_API_KEY=... hr_blog_agent
///
/// # Skip scraping and stop at the first failed stage
/// hr_blog_agent --topic "Skills-based hiring" --halt-on-error
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// API key for the text generation endpoint
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model name used in the generateContent endpoint path
    #[arg(long)]
    pub model: Option<String>,

    /// Base URL of the generation API
    #[arg(long)]
    pub base_url: Option<String>,

    /// Page to scrape for trending <h2> headlines
    #[arg(long)]
    pub scrape_url: Option<String>,

    /// Use this topic instead of scraping one
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Maximum number of scraped topic candidates
    #[arg(long)]
    pub max_topics: Option<usize>,

    /// Timeout for each generation request, in seconds
    #[arg(long)]
    pub generation_timeout_secs: Option<u64>,

    /// Timeout for the scrape request, in seconds
    #[arg(long)]
    pub scrape_timeout_secs: Option<u64>,

    /// Stop at the first failed stage instead of passing its error text on
    #[arg(long)]
    pub halt_on_error: bool,
}

impl Cli {
    /// Overlay command-line values onto a loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(key) = &self.api_key {
            config.generation.api_key = Some(key.clone());
        }
        if let Some(model) = &self.model {
            config.generation.model = model.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.generation.base_url = base_url.clone();
        }
        if let Some(secs) = self.generation_timeout_secs {
            config.generation.timeout_secs = secs;
        }
        if let Some(url) = &self.scrape_url {
            config.scrape.url = url.clone();
        }
        if let Some(secs) = self.scrape_timeout_secs {
            config.scrape.timeout_secs = secs;
        }
        if let Some(max) = self.max_topics {
            config.scrape.max_topics = max;
        }
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        if self.halt_on_error {
            ErrorPolicy::Halt
        } else {
            ErrorPolicy::Propagate
        }
    }
}
