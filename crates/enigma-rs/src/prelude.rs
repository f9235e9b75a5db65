//! Convenience re-exports for the common `enigma-rs` surface.
//!
//! Meant to be glob-imported by boundary crates and binaries:
//!
//! ```ignore
//! use enigma_rs::prelude::*;
//! ```

pub use crate::bank::{Example, ExampleBank, MAX_DIFFICULTY, MIN_DIFFICULTY};
pub use crate::error::EnigmaError;
pub use crate::prompt::{GenerationRequest, TargetContent, build_parts};
pub use crate::service::{GenerateFuture, GenerateText, RiddleService};
pub use crate::{
    API_KEY_ENV, DEFAULT_MODEL, GEMINI_BASE_URL, GeminiClient, GenerateRequest, InlineData,
    ModelResponse, Part, quick_riddle,
};
