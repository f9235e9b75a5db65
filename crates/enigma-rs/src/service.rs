//! Per-request orchestration.
//!
//! [`RiddleService`] wires the bank, the prompt builder, and the upstream
//! client together. Each call is independent and terminal on first success
//! or first failure: validate, build parts, one upstream call, unwrap per
//! mode. No state is mutated, so concurrent calls never interact.
//!
//! Two orchestration modes exist behind the one service:
//!
//! - **prompt mode** ([`generate`](RiddleService::generate)) — takes a
//!   [`GenerationRequest`], builds the few-shot envelope, returns only the
//!   unwrapped generated text.
//! - **pass-through mode** ([`generate_raw`](RiddleService::generate_raw)) —
//!   forwards a fully-formed provider payload verbatim and returns the raw
//!   upstream envelope unmodified.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::info;

use crate::bank::ExampleBank;
use crate::error::EnigmaError;
use crate::prompt::{self, GenerationRequest};
use crate::{GeminiClient, GenerateRequest, ModelResponse};

/// Boxed future returned by [`GenerateText::generate`].
///
/// Type alias to keep trait signatures and implementations readable.
pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ModelResponse, EnigmaError>> + Send + 'a>>;

/// The seam between orchestration and the network.
///
/// [`GeminiClient`] is the production implementor; tests substitute
/// counting doubles to assert that validation failures never reach the
/// network.
pub trait GenerateText: Send + Sync {
    /// Send one serialized provider payload upstream.
    fn generate<'a>(&'a self, body: &'a serde_json::Value) -> GenerateFuture<'a>;
}

impl GenerateText for GeminiClient {
    fn generate<'a>(&'a self, body: &'a serde_json::Value) -> GenerateFuture<'a> {
        Box::pin(self.generate_content(body))
    }
}

/// Orchestrator: bank + prompt builder + upstream client, per call.
pub struct RiddleService<C> {
    bank: Arc<ExampleBank>,
    client: C,
}

impl<C: GenerateText> RiddleService<C> {
    pub fn new(bank: Arc<ExampleBank>, client: C) -> Self {
        Self { bank, client }
    }

    /// Prompt mode: build the few-shot envelope for `request`, call the
    /// model once, and return the unwrapped generated text.
    ///
    /// Caller errors (empty request, out-of-range difficulty) are raised
    /// before the upstream call; a successful envelope with a missing text
    /// path degrades to an empty string.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String, EnigmaError> {
        let parts = prompt::build_parts(&self.bank, request)?;
        info!(
            "generating riddle: difficulty={}, images={}",
            request.difficulty,
            request.images.len()
        );
        let body = GenerateRequest::new(parts).json_response().into_value();
        let response = self.client.generate(&body).await?;
        Ok(response.text())
    }

    /// Pass-through mode: forward a fully-formed provider payload verbatim
    /// and return the raw upstream envelope unmodified.
    pub async fn generate_raw(
        &self,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, EnigmaError> {
        info!("forwarding raw provider payload");
        let response = self.client.generate(payload).await?;
        Ok(response.into_raw())
    }

    /// The bank this service selects exemplars from.
    pub fn bank(&self) -> &ExampleBank {
        &self.bank
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Test double: records every payload it receives and answers with a
    /// fixed envelope.
    struct RecordingClient {
        calls: AtomicUsize,
        bodies: Mutex<Vec<serde_json::Value>>,
        envelope: serde_json::Value,
    }

    impl RecordingClient {
        fn answering(envelope: serde_json::Value) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                bodies: Mutex::new(Vec::new()),
                envelope,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_body(&self) -> serde_json::Value {
            self.bodies.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl GenerateText for RecordingClient {
        fn generate<'a>(&'a self, body: &'a serde_json::Value) -> GenerateFuture<'a> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.bodies.lock().unwrap().push(body.clone());
            let envelope = self.envelope.clone();
            Box::pin(async move { Ok(ModelResponse::new(envelope)) })
        }
    }

    fn prompt_text(body: &serde_json::Value) -> String {
        body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .to_string()
    }

    fn text_envelope(text: &str) -> serde_json::Value {
        json!({"candidates": [{"content": {"parts": [{"text": text}]}}]})
    }

    fn service(envelope: serde_json::Value) -> RiddleService<RecordingClient> {
        RiddleService::new(
            Arc::new(ExampleBank::builtin()),
            RecordingClient::answering(envelope),
        )
    }

    #[tokio::test]
    async fn prompt_mode_returns_unwrapped_text() {
        let service = service(text_envelope("a riddle"));
        let request = GenerationRequest::from_paragraph(2, "Water expands when it freezes.");
        let text = service.generate(&request).await.unwrap();
        assert_eq!(text, "a riddle");
        assert_eq!(service.client.call_count(), 1);
    }

    #[tokio::test]
    async fn empty_request_never_reaches_the_network() {
        let service = service(text_envelope("unreachable"));
        let request = GenerationRequest::from_prompt(3, "");
        let err = service.generate(&request).await.unwrap_err();
        assert!(matches!(err, EnigmaError::EmptyGenerationRequest));
        assert_eq!(service.client.call_count(), 0);
    }

    #[tokio::test]
    async fn invalid_difficulty_never_reaches_the_network() {
        let service = service(text_envelope("unreachable"));
        let request = GenerationRequest::from_prompt(0, "hello");
        let err = service.generate(&request).await.unwrap_err();
        assert!(matches!(err, EnigmaError::InvalidDifficulty(0)));
        assert_eq!(service.client.call_count(), 0);
    }

    #[tokio::test]
    async fn prompt_mode_sends_json_response_config() {
        let service = service(text_envelope("r"));
        let request = GenerationRequest::from_prompt(1, "describe the passage");
        service.generate(&request).await.unwrap();
        let body = service.client.last_body();
        assert_eq!(
            body["generationConfig"]["response_mime_type"],
            "application/json"
        );
        assert!(prompt_text(&body).contains("describe the passage"));
    }

    #[tokio::test]
    async fn pass_through_mode_forwards_payload_and_returns_envelope() {
        let envelope = json!({
            "candidates": [{"content": {"parts": [{"text": "X"}]}}],
            "usageMetadata": {"totalTokenCount": 7}
        });
        let service = service(envelope.clone());
        let payload = json!({"contents": [{"parts": [{"text": "verbatim"}]}]});

        let result = service.generate_raw(&payload).await.unwrap();
        assert_eq!(result, envelope);
        assert_eq!(service.client.last_body(), payload);
    }

    #[tokio::test]
    async fn concurrent_tiers_do_not_cross_contaminate() {
        let service = Arc::new(service(text_envelope("r")));
        let bank = ExampleBank::builtin();
        let tier5_only = bank.at_tier(5).unwrap()[0].riddle_text;
        let tier1 = bank.at_tier(1).unwrap()[0].riddle_text;

        let low = {
            let service = service.clone();
            tokio::spawn(async move {
                let request = GenerationRequest::from_paragraph(1, "low tier passage");
                service.generate(&request).await.unwrap();
            })
        };
        let high = {
            let service = service.clone();
            tokio::spawn(async move {
                let request = GenerationRequest::from_paragraph(5, "high tier passage");
                service.generate(&request).await.unwrap();
            })
        };
        low.await.unwrap();
        high.await.unwrap();

        let bodies = service.client.bodies.lock().unwrap().clone();
        assert_eq!(bodies.len(), 2);
        let low_body = bodies
            .iter()
            .map(prompt_text)
            .find(|t| t.contains("low tier passage"))
            .unwrap();
        let high_body = bodies
            .iter()
            .map(prompt_text)
            .find(|t| t.contains("high tier passage"))
            .unwrap();

        assert!(low_body.contains(tier1));
        assert!(!low_body.contains(tier5_only), "tier 1 saw tier 5 exemplar");
        assert!(high_body.contains(tier5_only));
    }
}
