//! Few-shot prompt assembly.
//!
//! [`build_parts`] turns a [`GenerationRequest`] plus the
//! [`ExampleBank`](crate::bank::ExampleBank) into the ordered [`Part`]
//! sequence sent upstream: one leading text part (task instructions, the
//! exemplar ladder rendered as riddle/passage/answer triples, and the target
//! content), followed by the caller's images in the order supplied. The
//! builder does no I/O and its output is byte-identical for identical input.

use crate::bank::ExampleBank;
use crate::error::EnigmaError;
use crate::media;
use crate::Part;

/// Task instructions placed at the top of every prompt.
const INSTRUCTIONS: &str = "You are a riddle writer for a textbook study \
companion. Given source material from a textbook, write a narrative riddle \
that describes the passage at the requested difficulty, in the exact style \
of the worked examples below. Respond as a JSON object with the fields \
\"riddle\" and \"answer\".";

/// What the riddle should be generated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetContent {
    /// A caller-supplied full prompt, forwarded as the literal task text.
    RawPrompt(String),
    /// A textbook passage; the builder synthesizes the task text around it.
    SourceParagraph(String),
}

/// One riddle generation request, constructed per call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Requested difficulty tier, validated against the bank's range.
    pub difficulty: u8,
    /// Transport-encoded image blobs, zero or more, order preserved.
    pub images: Vec<String>,
    /// Target content, or `None` when the images alone are the source.
    pub target: Option<TargetContent>,
}

impl GenerationRequest {
    /// A request carrying a caller-supplied literal prompt.
    pub fn from_prompt(difficulty: u8, prompt: impl Into<String>) -> Self {
        Self {
            difficulty,
            images: Vec::new(),
            target: Some(TargetContent::RawPrompt(prompt.into())),
        }
    }

    /// A request carrying a textbook passage to derive the task from.
    pub fn from_paragraph(difficulty: u8, paragraph: impl Into<String>) -> Self {
        Self {
            difficulty,
            images: Vec::new(),
            target: Some(TargetContent::SourceParagraph(paragraph.into())),
        }
    }

    /// Attach transport-encoded images, keeping caller order.
    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    /// True when there is nothing to send: no usable target text and no
    /// images.
    pub fn is_empty(&self) -> bool {
        let has_target = match &self.target {
            Some(TargetContent::RawPrompt(s)) | Some(TargetContent::SourceParagraph(s)) => {
                !s.trim().is_empty()
            }
            None => false,
        };
        !has_target && self.images.is_empty()
    }
}

/// Build the ordered part sequence for a request.
///
/// Fails fast with [`EnigmaError::EmptyGenerationRequest`] when the request
/// carries nothing to generate from, and with
/// [`EnigmaError::InvalidDifficulty`] for a tier outside the bank's range —
/// both before any external call is attempted.
pub fn build_parts(
    bank: &ExampleBank,
    request: &GenerationRequest,
) -> Result<Vec<Part>, EnigmaError> {
    if request.is_empty() {
        return Err(EnigmaError::EmptyGenerationRequest);
    }
    let exemplars = bank.exemplar_ladder(request.difficulty)?;

    let mut builder = PromptSections::new(INSTRUCTIONS);
    for exemplar in &exemplars {
        builder = builder.section(
            &format!("Worked example (difficulty {})", exemplar.difficulty),
            format!(
                "Source passage:\n{}\n\nRiddle:\n{}\n\nAnswer: {}",
                exemplar.source_paragraph, exemplar.riddle_text, exemplar.answer
            ),
        );
    }
    builder = builder.section("Your task", render_target(request));

    let mut parts = vec![Part::text(builder.build())];
    for image in &request.images {
        let (mime_type, payload) = media::normalize(image);
        parts.push(Part::inline_image(mime_type, payload));
    }
    Ok(parts)
}

fn render_target(request: &GenerationRequest) -> String {
    match &request.target {
        Some(TargetContent::RawPrompt(prompt)) if !prompt.trim().is_empty() => prompt.clone(),
        Some(TargetContent::SourceParagraph(paragraph)) if !paragraph.trim().is_empty() => {
            format!(
                "Write one riddle of difficulty {} for the following passage:\n\n{}",
                request.difficulty, paragraph
            )
        }
        // is_empty() already guaranteed at least one image in this case.
        _ => format!(
            "The source material is provided as {} attached page image(s). \
             Read the passage from the image(s) and write one riddle of \
             difficulty {} describing it.",
            request.images.len(),
            request.difficulty
        ),
    }
}

/// Minimal section-based prompt builder.
///
/// Sections are rendered as `## Heading` blocks joined by blank lines; empty
/// content is silently skipped.
struct PromptSections {
    sections: Vec<String>,
}

impl PromptSections {
    fn new(preamble: impl Into<String>) -> Self {
        Self {
            sections: vec![preamble.into()],
        }
    }

    fn section(mut self, heading: &str, content: impl Into<String>) -> Self {
        let content = content.into();
        if !content.is_empty() {
            self.sections.push(format!("## {heading}\n\n{content}"));
        }
        self
    }

    fn build(self) -> String {
        self.sections.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::{MAX_DIFFICULTY, MIN_DIFFICULTY};

    fn bank() -> ExampleBank {
        ExampleBank::builtin()
    }

    fn text_of(part: &Part) -> &str {
        match part {
            Part::Text { text } => text,
            Part::InlineData { .. } => panic!("expected a text part"),
        }
    }

    #[test]
    fn every_tier_produces_text_first_with_matching_exemplar() {
        let bank = bank();
        for tier in MIN_DIFFICULTY..=MAX_DIFFICULTY {
            let request = GenerationRequest::from_paragraph(tier, "The mitochondria.");
            let parts = build_parts(&bank, &request).unwrap();
            assert!(!parts.is_empty());
            let text = text_of(&parts[0]);
            let exemplar = &bank.at_tier(tier).unwrap()[0];
            assert!(
                text.contains(exemplar.riddle_text),
                "tier {tier} prompt missing its own exemplar"
            );
            assert!(text.contains(&format!("difficulty {tier}")));
        }
    }

    #[test]
    fn output_is_byte_identical_across_calls() {
        let bank = bank();
        let request = GenerationRequest::from_paragraph(4, "Plate tectonics.")
            .with_images(vec!["data:image/png;base64,AAAA".into()]);
        let first = serde_json::to_string(&build_parts(&bank, &request).unwrap()).unwrap();
        let second = serde_json::to_string(&build_parts(&bank, &request).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn image_parts_follow_text_in_caller_order() {
        let bank = bank();
        let request = GenerationRequest::from_prompt(2, "describe the figure").with_images(vec![
            "data:image/png;base64,FIRST".into(),
            "SECOND".into(),
        ]);
        let parts = build_parts(&bank, &request).unwrap();
        assert_eq!(parts.len(), 3);
        assert!(matches!(parts[0], Part::Text { .. }));
        match (&parts[1], &parts[2]) {
            (
                Part::InlineData { inline_data: a },
                Part::InlineData { inline_data: b },
            ) => {
                assert_eq!(a.data, "FIRST");
                assert_eq!(b.data, "SECOND");
                assert_eq!(a.mime_type, "image/jpeg");
            }
            other => panic!("expected two image parts, got {other:?}"),
        }
    }

    #[test]
    fn empty_request_fails_fast() {
        let bank = bank();
        let request = GenerationRequest::from_prompt(3, "");
        assert!(matches!(
            build_parts(&bank, &request),
            Err(EnigmaError::EmptyGenerationRequest)
        ));
    }

    #[test]
    fn whitespace_prompt_with_images_is_not_empty() {
        let bank = bank();
        let request = GenerationRequest::from_prompt(3, "  ").with_images(vec!["AAAA".into()]);
        let parts = build_parts(&bank, &request).unwrap();
        assert_eq!(parts.len(), 2);
        // The synthesized instruction references the attached images.
        assert!(text_of(&parts[0]).contains("attached page image"));
    }

    #[test]
    fn invalid_difficulty_is_not_clamped() {
        let bank = bank();
        let request = GenerationRequest::from_prompt(6, "hello");
        assert!(matches!(
            build_parts(&bank, &request),
            Err(EnigmaError::InvalidDifficulty(6))
        ));
    }

    #[test]
    fn ladder_exemplars_appear_in_ascending_order() {
        let bank = bank();
        let request = GenerationRequest::from_paragraph(3, "Cells divide.");
        let parts = build_parts(&bank, &request).unwrap();
        let text = text_of(&parts[0]);
        let first = text.find("Worked example (difficulty 1)").unwrap();
        let second = text.find("Worked example (difficulty 2)").unwrap();
        let third = text.find("Worked example (difficulty 3)").unwrap();
        assert!(first < second && second < third);
        assert!(!text.contains("Worked example (difficulty 4)"));
    }
}
