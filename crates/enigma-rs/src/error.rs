//! Error taxonomy for the generation pipeline.
//!
//! Every failure a caller can observe is an [`EnigmaError`] variant. Caller
//! mistakes ([`EmptyGenerationRequest`](EnigmaError::EmptyGenerationRequest),
//! [`InvalidDifficulty`](EnigmaError::InvalidDifficulty)) are raised before
//! any network traffic; upstream failures carry the full diagnostic body so
//! the caller can see what the provider actually said. Nothing in this crate
//! retries automatically — the first failure is the answer.

use thiserror::Error;

/// All errors produced by the riddle generation pipeline.
#[derive(Debug, Error)]
pub enum EnigmaError {
    /// No API credential configured. Fatal for every call; raised at client
    /// construction, never mid-request.
    #[error("no API credential configured (set GOOGLE_API_KEY)")]
    MissingCredential,

    /// The request carries no prompt, no source paragraph, and no images —
    /// there is nothing to send to the model.
    #[error("empty generation request: no prompt, no source paragraph, and no images")]
    EmptyGenerationRequest,

    /// Requested difficulty tier is outside the bank's supported range.
    /// The pipeline never clamps.
    #[error("difficulty {0} is outside the supported range 1..=5")]
    InvalidDifficulty(u8),

    /// The model endpoint answered with a non-success status. `body` is the
    /// full upstream response text, surfaced verbatim as diagnostics.
    #[error("upstream model returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// A success response whose body was not valid JSON. A *parseable* body
    /// with missing fields is not an error — text extraction degrades to an
    /// empty string instead (see [`ModelResponse::text`](crate::ModelResponse::text)).
    #[error("upstream success response was not valid JSON: {0}")]
    MalformedResponse(String),

    /// Transport-level failure (connect, timeout, body read).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}
