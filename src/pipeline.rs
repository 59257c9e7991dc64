//! Pipeline orchestration: topic → outline → draft → SEO → proofread.
//!
//! The pipeline is strictly sequential. Each stage consumes exactly the
//! output of the stage before it, and every output is reported to a
//! [`PipelineObserver`] before the next stage starts.
//!
//! # Error Policy
//!
//! - [`ErrorPolicy::Propagate`] (default): a failed stage's error is rendered
//!   to text (e.g. `Error: 500 - ...`), reported, and fed to the next stage
//!   as if it were content. The run always completes.
//! - [`ErrorPolicy::Halt`]: the run stops at the first failed stage.
//!
//! Either way, [`PipelineRun::failed_stages`] records which stages failed.

use crate::api::{GenerationError, TextGenerator};
use crate::config::StageBudgets;
use crate::models::PipelineRun;
use crate::stages::{self, Stage};
use std::io::{self, Write};
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

/// What to do when a generation stage fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    #[default]
    Propagate,
    Halt,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no candidate topics to choose from")]
    NoTopics,

    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: GenerationError,
    },
}

/// Receives each checkpoint of a run as it happens.
pub trait PipelineObserver {
    fn on_topic(&mut self, topic: &str);
    fn on_stage(&mut self, stage: Stage, output: &str);
}

/// Prints checkpoints as human-readable text, to stdout by default.
#[derive(Debug)]
pub struct ConsoleObserver<W = io::Stdout> {
    out: W,
}

impl ConsoleObserver {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleObserver<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, args: std::fmt::Arguments<'_>) {
        if let Err(e) = self.out.write_fmt(args).and_then(|()| self.out.flush()) {
            warn!(error = %e, "Failed to write pipeline output");
        }
    }
}

impl<W: Write> PipelineObserver for ConsoleObserver<W> {
    fn on_topic(&mut self, topic: &str) {
        self.emit(format_args!("\n🔹 Selected Topic: {topic}\n"));
    }

    fn on_stage(&mut self, stage: Stage, output: &str) {
        self.emit(format_args!("\n{}:\n {output}\n", stage.heading()));
    }
}

/// Runs the four generation stages against one generator.
#[derive(Debug)]
pub struct Pipeline<G> {
    generator: G,
    budgets: StageBudgets,
    policy: ErrorPolicy,
}

impl<G: TextGenerator> Pipeline<G> {
    pub fn new(generator: G, budgets: StageBudgets, policy: ErrorPolicy) -> Self {
        Self {
            generator,
            budgets,
            policy,
        }
    }

    /// Select the first topic and run every stage on it.
    #[instrument(level = "info", skip_all, fields(candidates = topics.len(), policy = ?self.policy))]
    pub async fn run<O: PipelineObserver>(
        &self,
        topics: &[String],
        observer: &mut O,
    ) -> Result<PipelineRun, PipelineError> {
        let total_t0 = Instant::now();
        let topic = topics.first().ok_or(PipelineError::NoTopics)?;
        info!(%topic, "Selected topic");
        observer.on_topic(topic);

        let mut run = PipelineRun {
            topic: topic.clone(),
            ..PipelineRun::default()
        };

        run.outline = self
            .step(Stage::Outline, &run.topic, &mut run.failed_stages, observer)
            .await?;
        run.raw_content = self
            .step(Stage::Draft, &run.outline, &mut run.failed_stages, observer)
            .await?;
        run.seo_content = self
            .step(Stage::Seo, &run.raw_content, &mut run.failed_stages, observer)
            .await?;
        run.final_content = self
            .step(Stage::Proofread, &run.seo_content, &mut run.failed_stages, observer)
            .await?;

        info!(
            elapsed_ms_total = total_t0.elapsed().as_millis(),
            failed_stages = run.failed_stages.len(),
            "Pipeline complete"
        );
        Ok(run)
    }

    async fn step<O: PipelineObserver>(
        &self,
        stage: Stage,
        input: &str,
        failed: &mut Vec<Stage>,
        observer: &mut O,
    ) -> Result<String, PipelineError> {
        let max_tokens = self.budgets.for_stage(stage);
        let t0 = Instant::now();
        let outcome = match stage {
            Stage::Outline => stages::generate_outline(&self.generator, input, max_tokens).await,
            Stage::Draft => stages::generate_draft(&self.generator, input, max_tokens).await,
            Stage::Seo => stages::optimize_for_seo(&self.generator, input, max_tokens).await,
            Stage::Proofread => stages::proofread(&self.generator, input, max_tokens).await,
        };
        let elapsed_ms = t0.elapsed().as_millis();

        match outcome {
            Ok(text) => {
                info!(%stage, chars = text.len(), elapsed_ms, "Stage complete");
                observer.on_stage(stage, &text);
                Ok(text)
            }
            Err(e) => {
                failed.push(stage);
                let rendered = e.to_string();
                observer.on_stage(stage, &rendered);
                match self.policy {
                    ErrorPolicy::Propagate => {
                        warn!(%stage, error = %e, elapsed_ms, "Stage failed; passing error text downstream");
                        Ok(rendered)
                    }
                    ErrorPolicy::Halt => {
                        error!(%stage, error = %e, elapsed_ms, "Stage failed; halting pipeline");
                        Err(PipelineError::Stage { stage, source: e })
                    }
                }
            }
        }
    }
}
