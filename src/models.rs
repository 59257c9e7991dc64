//! Data models for the generation API and the pipeline run.
//!
//! This module defines:
//! - [`GenerateContentRequest`] / [`GenerateContentResponse`]: the JSON shapes
//!   exchanged with a `generateContent` endpoint
//! - [`PipelineRun`]: the outputs of one end-to-end run
//!
//! The wire types use camelCase field names to match the API, via
//! `#[serde(rename_all = "camelCase")]`.

use crate::stages::Stage;
use serde::{Deserialize, Serialize};

/// Request body for `models/{model}:generateContent`.
///
/// Serializes to:
///
/// ```json
/// {"contents":[{"parts":[{"text":"..."}]}],"generationConfig":{"maxOutputTokens":500}}
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationSettings,
}

impl GenerateContentRequest {
    /// A single-turn request containing one text part.
    pub fn from_prompt(prompt: &str, max_output_tokens: u32) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationSettings { max_output_tokens },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    pub max_output_tokens: u32,
}

/// A content block: an ordered list of parts.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One part of a content block. Non-text parts deserialize with `text: None`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Response body from `generateContent`.
///
/// Every level is optional or defaulted: the client only cares whether
/// `candidates[0].content.parts[0].text` exists.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, if present.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

/// Outputs of one pipeline run, in the order they were produced.
///
/// Each field is written exactly once by the orchestrator. When a stage
/// fails under the propagate policy its field holds the rendered error text,
/// and the stage is listed in `failed_stages`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineRun {
    pub topic: String,
    pub outline: String,
    pub raw_content: String,
    pub seo_content: String,
    pub final_content: String,
    pub failed_stages: Vec<Stage>,
}

impl PipelineRun {
    /// True when every generation stage returned real content.
    pub fn is_clean(&self) -> bool {
        self.failed_stages.is_empty()
    }
}
