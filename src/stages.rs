//! The four generation stages of a blog post.
//!
//! | Stage | Input | Default budget |
//! |-------|-------|----------------|
//! | [`Stage::Outline`] | topic | 300 |
//! | [`Stage::Draft`] | outline | 2000 |
//! | [`Stage::Seo`] | draft | 1000 |
//! | [`Stage::Proofread`] | SEO pass | 1000 |
//!
//! Each stage embeds the whole previous output in a fixed instruction and
//! hands it to a [`TextGenerator`]. Stages never inspect their input.

use crate::api::{GenerationError, TextGenerator};
use std::fmt;
use tracing::{debug, instrument};

/// One generation step, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Outline,
    Draft,
    Seo,
    Proofread,
}

impl Stage {
    /// All stages in the order the pipeline runs them.
    pub const ALL: [Stage; 4] = [Stage::Outline, Stage::Draft, Stage::Seo, Stage::Proofread];

    /// Build this stage's prompt around the previous stage's output.
    pub fn prompt(self, input: &str) -> String {
        match self {
            Stage::Outline => format!("Create a structured blog outline for: {input}."),
            Stage::Draft => format!("Write a 2000-word blog post based on this outline:\n{input}"),
            Stage::Seo => format!("Optimize the following blog for SEO:\n{input}"),
            Stage::Proofread => {
                format!("Proofread and enhance the readability of this blog:\n{input}")
            }
        }
    }

    pub fn default_budget(self) -> u32 {
        match self {
            Stage::Outline => 300,
            Stage::Draft => 2000,
            Stage::Seo | Stage::Proofread => 1000,
        }
    }

    /// Heading printed above this stage's output.
    pub fn heading(self) -> &'static str {
        match self {
            Stage::Outline => "📌 Generated Outline",
            Stage::Draft => "📝 Generated Content",
            Stage::Seo => "🔍 SEO Optimized Content",
            Stage::Proofread => "✅ Final Blog Content",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Outline => "outline",
            Stage::Draft => "draft",
            Stage::Seo => "seo",
            Stage::Proofread => "proofread",
        };
        f.write_str(name)
    }
}

/// Run one stage: build its prompt and delegate to the generator.
#[instrument(level = "info", skip(generator, input), fields(input_len = input.len()))]
pub async fn run_stage<G: TextGenerator>(
    generator: &G,
    stage: Stage,
    input: &str,
    max_tokens: u32,
) -> Result<String, GenerationError> {
    let prompt = stage.prompt(input);
    debug!(prompt_len = prompt.len(), "Built stage prompt");
    generator.generate(&prompt, max_tokens).await
}

pub async fn generate_outline<G: TextGenerator>(
    generator: &G,
    topic: &str,
    max_tokens: u32,
) -> Result<String, GenerationError> {
    run_stage(generator, Stage::Outline, topic, max_tokens).await
}

pub async fn generate_draft<G: TextGenerator>(
    generator: &G,
    outline: &str,
    max_tokens: u32,
) -> Result<String, GenerationError> {
    run_stage(generator, Stage::Draft, outline, max_tokens).await
}

pub async fn optimize_for_seo<G: TextGenerator>(
    generator: &G,
    draft: &str,
    max_tokens: u32,
) -> Result<String, GenerationError> {
    run_stage(generator, Stage::Seo, draft, max_tokens).await
}

pub async fn proofread<G: TextGenerator>(
    generator: &G,
    content: &str,
    max_tokens: u32,
) -> Result<String, GenerationError> {
    run_stage(generator, Stage::Proofread, content, max_tokens).await
}
