//! Riddle generation pipeline for textbook passages.
//!
//! `enigma-rs` assembles few-shot multimodal prompts from a graded bank of
//! worked examples and sends them to the Google Gemini `generateContent`
//! endpoint, returning either the unwrapped generated text or the raw
//! upstream envelope. The interesting part is the deterministic
//! prompt-construction pipeline; everything network-facing is a single
//! request/response call with no retries and no shared mutable state.
//!
//! # Getting started
//!
//! ```ignore
//! use enigma_rs::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), EnigmaError> {
//!     let api_key = std::env::var("GOOGLE_API_KEY").unwrap();
//!     let client = GeminiClient::new(api_key)?;
//!     let service = RiddleService::new(Arc::new(ExampleBank::builtin()), client);
//!
//!     let request = GenerationRequest::from_paragraph(
//!         3,
//!         "The mitochondria is the powerhouse of the cell...",
//!     );
//!     let riddle = service.generate(&request).await?;
//!     println!("{riddle}");
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`bank`] | Graded [`ExampleBank`](bank::ExampleBank) of worked riddle examples |
//! | [`prompt`] | Deterministic few-shot [`Part`] assembly |
//! | [`media`] | Data-URI stripping for inline images |
//! | [`service`] | [`RiddleService`](service::RiddleService) orchestrator with both response modes |
//! | [`error`] | [`EnigmaError`](error::EnigmaError) taxonomy |
//!
//! The wire types ([`Part`], [`GenerateRequest`]) and the HTTP client
//! ([`GeminiClient`]) live at the crate root.

pub mod bank;
pub mod error;
pub mod media;
pub mod prelude;
pub mod prompt;
pub mod service;

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

pub use error::EnigmaError;

// ── Constants ──────────────────────────────────────────────────────

/// Default base URL for the Gemini REST API.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default model for all generation calls.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

// ── Request types ──────────────────────────────────────────────────

/// One unit of multimodal content sent to the model: text, or an inline
/// base64 image. Serialized field names match the provider's wire format.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        inline_data: InlineData,
    },
}

/// Inline image payload: bare base64 plus a declared media type.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn inline_image(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }
}

/// Generation request body for the `generateContent` endpoint:
/// `{ contents: [{ parts }], generationConfig }`.
#[derive(Serialize, Debug)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// One content block — an ordered part sequence.
#[derive(Serialize, Debug)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// Generation options. Only the fields this pipeline sets are modeled;
/// unused options are omitted from serialization entirely.
#[derive(Serialize, Debug, Default)]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

impl GenerateRequest {
    /// Wrap an ordered part sequence in the provider envelope, with no
    /// generation options.
    pub fn new(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content { parts }],
            generation_config: None,
        }
    }

    /// Ask the model to respond as JSON.
    pub fn json_response(mut self) -> Self {
        self.generation_config = Some(GenerationConfig {
            response_mime_type: Some("application/json".into()),
        });
        self
    }

    /// The serialized request body. Our own `Serialize` impls cannot
    /// produce non-string keys, so serialization cannot realistically fail;
    /// the fallback keeps the signature infallible.
    pub fn into_value(self) -> serde_json::Value {
        serde_json::to_value(&self).unwrap_or_else(|_| serde_json::json!({}))
    }
}

// ── Response types ─────────────────────────────────────────────────

/// Typed unwrap target for the upstream envelope. Every level is optional —
/// a partial or malformed success payload degrades to an empty result
/// instead of crashing the pipeline.
#[derive(Deserialize, Debug, Default)]
struct RawGenerateResponse {
    candidates: Option<Vec<RawCandidate>>,
}

#[derive(Deserialize, Debug)]
struct RawCandidate {
    content: Option<RawContent>,
}

#[derive(Deserialize, Debug)]
struct RawContent {
    parts: Option<Vec<RawPart>>,
}

#[derive(Deserialize, Debug)]
struct RawPart {
    text: Option<String>,
}

/// A successful upstream response, held as the raw envelope.
///
/// Unwrapping the generated text is a separate, optional step: callers that
/// want the verbatim envelope take [`into_raw`](Self::into_raw), callers
/// that want only the text take [`text`](Self::text).
#[derive(Debug, Clone)]
pub struct ModelResponse {
    raw: serde_json::Value,
}

impl ModelResponse {
    pub fn new(raw: serde_json::Value) -> Self {
        Self { raw }
    }

    /// Extract `candidates[0].content.parts[0].text`, defaulting to an
    /// empty string when the expected path is absent at any level.
    pub fn text(&self) -> String {
        let parsed: RawGenerateResponse =
            serde_json::from_value(self.raw.clone()).unwrap_or_default();
        parsed
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .and_then(|p| p.into_iter().next())
            .and_then(|p| p.text)
            .unwrap_or_default()
    }

    /// The raw upstream envelope, unmodified.
    pub fn into_raw(self) -> serde_json::Value {
        self.raw
    }

    pub fn raw(&self) -> &serde_json::Value {
        &self.raw
    }
}

// ── Client ─────────────────────────────────────────────────────────

/// Async HTTP client for the Gemini `generateContent` endpoint.
///
/// One network attempt per call, no retry — a caller that wants retries
/// owns its own policy. The base URL and model name are injected
/// configuration, not literals, so tests can point the client at a stub
/// and deployments can move model versions without touching orchestration.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a client with the given API credential and defaults.
    ///
    /// An empty credential fails immediately with
    /// [`EnigmaError::MissingCredential`] — before any network attempt.
    pub fn new(api_key: impl Into<String>) -> Result<Self, EnigmaError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(EnigmaError::MissingCredential);
        }
        let client = reqwest::Client::builder()
            .user_agent(concat!("enigma-rs/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            client,
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Create a client from the [`API_KEY_ENV`] environment variable.
    pub fn from_env() -> Result<Self, EnigmaError> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| EnigmaError::MissingCredential)?;
        Self::new(api_key)
    }

    /// Override the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the endpoint base URL (stub servers in tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    /// Send one generation request and return the raw envelope.
    ///
    /// Non-success HTTP statuses become [`EnigmaError::Upstream`] carrying
    /// the full response body as diagnostic text. A success body that is
    /// not valid JSON becomes [`EnigmaError::MalformedResponse`].
    pub async fn generate_content(
        &self,
        body: &serde_json::Value,
    ) -> Result<ModelResponse, EnigmaError> {
        debug!("generation request: model={}", self.model);
        trace!(
            "request payload size: {} bytes",
            serde_json::to_string(body).map_or(0, |s| s.len())
        );

        let start = Instant::now();

        let resp = self
            .client
            .post(self.endpoint())
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        let elapsed = start.elapsed();
        debug!(
            "generation response: HTTP {} in {:.1}s ({} bytes)",
            status,
            elapsed.as_secs_f64(),
            text.len()
        );

        if !status.is_success() {
            return Err(EnigmaError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }

        let raw: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| EnigmaError::MalformedResponse(e.to_string()))?;
        Ok(ModelResponse::new(raw))
    }
}

// ── Convenience ────────────────────────────────────────────────────

/// Run a one-shot riddle generation against the built-in example bank.
///
/// Reads the API key from the [`API_KEY_ENV`] environment variable.
pub async fn quick_riddle(difficulty: u8, paragraph: &str) -> Result<String, EnigmaError> {
    use std::sync::Arc;

    let client = GeminiClient::from_env()?;
    let service = service::RiddleService::new(Arc::new(bank::ExampleBank::builtin()), client);
    service
        .generate(&prompt::GenerationRequest::from_paragraph(
            difficulty, paragraph,
        ))
        .await
}
