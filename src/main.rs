//! # HR Blog Agent
//!
//! Turns a trending HR headline into a finished blog post by chaining four
//! calls to a Gemini-compatible text generation API.
//!
//! ## Usage
//!
//! ```sh
//! GEMINI_API_KEY=... hr_blog_agent
//! hr_blog_agent --topic "Pay transparency" --halt-on-error
//! ```
//!
//! ## Architecture
//!
//! The application is a straight-line pipeline, one request at a time:
//! 1. **Scraping**: pick up candidate topics from `<h2>` headlines
//! 2. **Selection**: take the first candidate
//! 3. **Generation**: outline → draft → SEO pass → proofread pass
//! 4. **Output**: print every checkpoint to stdout
//!
//! Logs go to stderr so stdout carries only the post.

use clap::Parser;
use std::error::Error;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod models;
mod pipeline;
mod scrapers;
mod stages;
mod utils;

#[cfg(test)]
mod test_support;

use api::GeminiClient;
use cli::Cli;
use config::Config;
use pipeline::{ConsoleObserver, Pipeline};

#[tokio::main(flavor = "current_thread")]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("hr_blog_agent starting up");

    // .env first, so clap's `env = ...` arguments can see it
    cli::load_dotenv(None);

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.config, ?args.topic, halt_on_error = args.halt_on_error, "Parsed CLI arguments");

    // ---- Load config ----
    let mut config = Config::load(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;
    debug!(?config, "Effective configuration");

    // ---- Topics ----
    let topics = match &args.topic {
        Some(topic) => {
            info!(%topic, "Using topic from command line; skipping scrape");
            vec![topic.clone()]
        }
        None => scrapers::trending::fetch_trending_topics(&config.scrape).await,
    };

    // ---- Generate ----
    let client = GeminiClient::new(&config.generation)?;
    let pipeline = Pipeline::new(client, config.budgets, args.error_policy());
    let run = pipeline.run(&topics, &mut ConsoleObserver::stdout()).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        clean = run.is_clean(),
        failed_stages = ?run.failed_stages,
        "Execution complete"
    );

    Ok(())
}
