//! Text generation API client.
//!
//! This module wraps a single `generateContent` endpoint (Gemini and
//! compatible servers). One call sends one prompt and returns the first
//! candidate's text.
//!
//! # Architecture
//!
//! - [`TextGenerator`]: the trait the stages and pipeline are written against
//! - [`GeminiClient`]: the HTTP implementation
//! - [`interpret_response`]: pure status/body → outcome mapping
//!
//! # Failure Modes
//!
//! Every failure is a [`GenerationError`]. Its `Display` form is the plain
//! text the pipeline prints in place of content, e.g.
//! `Error: 503 - {"error": ...}` or `Error: No response from API`.
//!
//! There is no retry and no backoff: each call is exactly one request,
//! bounded by the configured timeout.

use crate::config::{ConfigError, GenerationConfig};
use crate::models::{GenerateContentRequest, GenerateContentResponse};
use crate::utils::truncate_for_log;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Why a generation call produced no text.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Error: prompt is empty")]
    EmptyPrompt,

    #[error("Error: max output tokens must be positive")]
    InvalidTokenBudget,

    /// Connection, TLS, or timeout failure. The URL (and API key) is stripped.
    #[error("Error: request failed - {0}")]
    Transport(#[source] reqwest::Error),

    /// Any status other than 200, with the raw response body.
    #[error("Error: {status} - {body}")]
    Status { status: u16, body: String },

    /// A 200 whose body is not JSON.
    #[error("Error: malformed response body - {0}")]
    Decode(#[from] serde_json::Error),

    /// A 200 JSON body without `candidates[0].content.parts[0].text`.
    #[error("Error: No response from API")]
    NoResponse,
}

/// Why a [`GeminiClient`] could not be constructed.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid generation endpoint: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

/// Something that turns a prompt into generated text.
///
/// Implemented by [`GeminiClient`]; tests substitute deterministic doubles.
pub trait TextGenerator {
    /// Generate text for `prompt`, capped at `max_tokens` output tokens.
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, GenerationError>;
}

/// Map an HTTP status and body to a generation outcome.
///
/// - `200` with the expected shape: the nested text, unmodified
/// - `200` without it: [`GenerationError::NoResponse`]
/// - `200` that is not JSON: [`GenerationError::Decode`]
/// - anything else: [`GenerationError::Status`] carrying the literal body
pub fn interpret_response(status: u16, body: &str) -> Result<String, GenerationError> {
    if status != 200 {
        return Err(GenerationError::Status {
            status,
            body: body.to_string(),
        });
    }
    let parsed: GenerateContentResponse = serde_json::from_str(body)?;
    parsed
        .first_text()
        .map(str::to_string)
        .ok_or(GenerationError::NoResponse)
}

/// HTTP client for a `generateContent` endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("host", &self.endpoint.host_str())
            .field("path", &self.endpoint.path())
            .finish()
    }
}

impl GeminiClient {
    /// Build a client from explicit configuration.
    ///
    /// A missing API key is allowed; the endpoint will reject the request
    /// and the rejection comes back as [`GenerationError::Status`].
    pub fn new(config: &GenerationConfig) -> Result<Self, ClientError> {
        if config.api_key.is_none() {
            warn!("No API key configured; generation requests will likely be rejected");
        }
        let endpoint = config.endpoint()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ClientError::Build)?;
        info!(
            model = %config.model,
            timeout_secs = config.timeout_secs,
            "Generation client ready"
        );
        Ok(Self { http, endpoint })
    }
}

impl TextGenerator for GeminiClient {
    #[instrument(level = "info", skip_all, fields(prompt_len = prompt.len(), max_tokens = max_tokens))]
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, GenerationError> {
        if prompt.is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }
        if max_tokens == 0 {
            return Err(GenerationError::InvalidTokenBudget);
        }

        let t0 = Instant::now();
        let request = GenerateContentRequest::from_prompt(prompt, max_tokens);
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.without_url()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Transport(e.without_url()))?;
        let elapsed_ms = t0.elapsed().as_millis();
        debug!(status, bytes = body.len(), elapsed_ms, "Generation response received");

        let res = interpret_response(status, &body);
        match &res {
            Ok(text) => info!(status, chars = text.len(), elapsed_ms, "Generation succeeded"),
            Err(e) => warn!(
                status,
                elapsed_ms,
                error = %truncate_for_log(&e.to_string(), 300),
                "Generation failed"
            ),
        }
        res
    }
}
