//! Endpoint handlers and error-to-status mapping.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use enigma_rs::prompt::{GenerationRequest, TargetContent};
use enigma_rs::service::RiddleService;
use enigma_rs::{EnigmaError, GeminiClient};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

/// Shared application state passed to all handlers via axum's `State`
/// extractor. The service is read-only; cloning the state clones an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RiddleService<GeminiClient>>,
}

/// Difficulty used when the caller does not send one.
fn default_difficulty() -> u8 {
    3
}

/// Request body for POST /generate-enigmas (prompt mode).
#[derive(Deserialize)]
pub struct GenerateBody {
    /// Transport-encoded image blobs, order preserved.
    #[serde(default)]
    pub images: Vec<String>,
    /// Caller-supplied prompt text.
    #[serde(default)]
    pub prompt: String,
    /// Requested difficulty tier, 1–5. Defaults to 3 when omitted.
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
}

/// POST /generate-enigmas — prompt mode.
///
/// Builds the few-shot envelope and returns only the unwrapped generated
/// text as `{"enigmasText": "..."}`.
pub async fn post_generate(
    State(app): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Response {
    let target = if body.prompt.trim().is_empty() {
        None
    } else {
        Some(TargetContent::RawPrompt(body.prompt))
    };
    let request = GenerationRequest {
        difficulty: body.difficulty,
        images: body.images,
        target,
    };

    match app.service.generate(&request).await {
        Ok(text) => (StatusCode::OK, Json(json!({ "enigmasText": text }))).into_response(),
        Err(err) => error_response(err),
    }
}

/// POST /generate-enigmas/raw — pass-through mode.
///
/// Forwards the body verbatim as the provider payload and returns the raw
/// upstream envelope unmodified.
pub async fn post_generate_raw(
    State(app): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Response {
    match app.service.generate_raw(&payload).await {
        Ok(envelope) => (StatusCode::OK, Json(envelope)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Map pipeline errors to HTTP failures carrying `{"error": message}`.
fn error_response(err: EnigmaError) -> Response {
    let status = match &err {
        EnigmaError::EmptyGenerationRequest | EnigmaError::InvalidDifficulty(_) => {
            StatusCode::BAD_REQUEST
        }
        EnigmaError::Upstream { .. } | EnigmaError::Http(_) => StatusCode::BAD_GATEWAY,
        EnigmaError::MissingCredential | EnigmaError::MalformedResponse(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    warn!("generation failed: {err}");
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_body_defaults() {
        let body: GenerateBody = serde_json::from_str(r#"{"prompt": "hi"}"#).unwrap();
        assert_eq!(body.difficulty, 3);
        assert!(body.images.is_empty());
    }

    #[test]
    fn generate_body_accepts_full_shape() {
        let body: GenerateBody = serde_json::from_str(
            r#"{"images": ["AAAA"], "prompt": "describe", "difficulty": 5}"#,
        )
        .unwrap();
        assert_eq!(body.difficulty, 5);
        assert_eq!(body.images, vec!["AAAA"]);
        assert_eq!(body.prompt, "describe");
    }

    #[test]
    fn caller_errors_map_to_400() {
        let resp = error_response(EnigmaError::EmptyGenerationRequest);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = error_response(EnigmaError::InvalidDifficulty(9));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_errors_map_to_502() {
        let resp = error_response(EnigmaError::Upstream {
            status: 500,
            body: "boom".into(),
        });
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn configuration_errors_map_to_500() {
        let resp = error_response(EnigmaError::MissingCredential);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
