use std::path::Path;

use llmapi::providers::gemini::decode_inline_data;
use llmapi::providers::gemini::first_part;
use llmapi::providers::gemini::models::{GeminiResponse, InlineData};

use crate::commands::prompts::{build_final_prompt, build_request_parts};
use crate::error::GenerationError;
use crate::fs_utils::{output_file_name, save_png};
use crate::generator::ImageGenerator;
use crate::models::{PromptEntry, PromptOutcome, PromptReport};
use crate::reference::ReferenceImages;

/// What the first part of the response carried.
#[derive(Debug)]
pub enum FirstPart<'a> {
    Image(&'a InlineData),
    Missing { feedback: Option<String> },
}

/// Runs one prompt end to end: request, inspect, decode, write.
pub async fn generate_for_prompt(
    generator: &dyn ImageGenerator,
    references: &ReferenceImages,
    prompt: &PromptEntry,
    output_dir: &Path,
) -> PromptReport {
    let final_prompt = build_final_prompt(&prompt.text);
    let parts = build_request_parts(references, &final_prompt);

    let outcome = match generator.generate(parts).await {
        Ok(response) => save_response_image(&response, prompt, output_dir).await,
        Err(error) => PromptOutcome::Failed { error },
    };

    PromptReport {
        prompt: prompt.clone(),
        final_prompt,
        outcome,
    }
}

async fn save_response_image(
    response: &GeminiResponse,
    prompt: &PromptEntry,
    output_dir: &Path,
) -> PromptOutcome {
    let inline_data = match extract_first_part(response) {
        FirstPart::Image(inline_data) => inline_data,
        FirstPart::Missing { feedback } => return PromptOutcome::NoImage { feedback },
    };

    let bytes = match decode_inline_data(inline_data) {
        Ok(bytes) => bytes,
        Err(err) => {
            return PromptOutcome::Failed {
                error: GenerationError::Decode(format!("{:#}", err)),
            };
        }
    };
    let image = match image::load_from_memory(&bytes) {
        Ok(image) => image,
        Err(err) => {
            return PromptOutcome::Failed {
                error: GenerationError::Decode(format!(
                    "{} ({} bytes, declared {})",
                    err,
                    bytes.len(),
                    declared_mime(inline_data)
                )),
            };
        }
    };

    let path = output_dir.join(output_file_name(prompt));
    match save_png(&image, &path).await {
        Ok(()) => PromptOutcome::Saved { path },
        Err(error) => PromptOutcome::Failed { error },
    }
}

/// Only the first part of the first candidate is considered.
pub fn extract_first_part(response: &GeminiResponse) -> FirstPart<'_> {
    let part = first_part(response);
    if let Some(inline_data) = part.and_then(|part| part.inline_data.as_ref()) {
        if !inline_data.data.trim().is_empty() {
            return FirstPart::Image(inline_data);
        }
    }

    let text = part.and_then(|part| part.text.as_deref());
    FirstPart::Missing {
        feedback: describe_feedback(response, text),
    }
}

/// Collects everything the service said about why no image came back.
pub fn describe_feedback(response: &GeminiResponse, part_text: Option<&str>) -> Option<String> {
    let mut details: Vec<String> = Vec::new();

    if let Some(feedback) = &response.prompt_feedback {
        if let Some(reason) = feedback.block_reason.as_deref() {
            match feedback.block_reason_message.as_deref() {
                Some(message) => details.push(format!("blocked: {} ({})", reason, message)),
                None => details.push(format!("blocked: {}", reason)),
            }
        }
        let flagged: Vec<String> = feedback
            .safety_ratings
            .iter()
            .filter(|rating| rating.blocked)
            .map(|rating| match rating.probability.as_deref() {
                Some(probability) => format!("{}={}", rating.category, probability),
                None => rating.category.clone(),
            })
            .collect();
        if !flagged.is_empty() {
            details.push(format!("safety: {}", flagged.join(", ")));
        }
    }

    if let Some(reason) = response
        .candidates
        .first()
        .and_then(|candidate| candidate.finish_reason.as_deref())
        .filter(|reason| *reason != "STOP")
    {
        details.push(format!("finish reason: {}", reason));
    }

    if let Some(text) = part_text.map(str::trim).filter(|text| !text.is_empty()) {
        let preview: String = text.chars().take(200).collect();
        details.push(format!("model text: {}", preview));
    }

    if details.is_empty() {
        None
    } else {
        Some(details.join("; "))
    }
}

fn declared_mime(inline_data: &InlineData) -> &str {
    let mime = inline_data.mime_type.trim();
    if mime.is_empty() { "unknown" } else { mime }
}
