use llmapi::LLMMessageType;

use crate::constants::{LOG_PROMPT_CHARS, PROMPT_SUFFIX};
use crate::reference::ReferenceImages;

pub fn build_final_prompt(prompt: &str) -> String {
    format!("{}, {}", prompt, PROMPT_SUFFIX)
}

/// Request parts in the order the model expects: both references, then the text.
pub fn build_request_parts(references: &ReferenceImages, final_prompt: &str) -> Vec<LLMMessageType> {
    let [first, second] = references.message_parts();
    vec![first, second, LLMMessageType::text(final_prompt)]
}

/// Char-safe prefix for log lines.
pub fn prompt_preview(prompt: &str) -> String {
    prompt.chars().take(LOG_PROMPT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_is_appended_after_a_comma() {
        assert_eq!(
            build_final_prompt("a dragon on a cliff"),
            "a dragon on a cliff, cinematic style, 16:9 aspect ratio, photorealistic, ultra high detail"
        );
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let prompt = "é".repeat(100);
        assert_eq!(prompt_preview(&prompt).chars().count(), LOG_PROMPT_CHARS);
        assert_eq!(prompt_preview("short"), "short");
    }
}
