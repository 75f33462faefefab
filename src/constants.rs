pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image-preview";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_OUTPUT_DIR: &str = "generated_character_images";
pub const DEFAULT_PROMPT_FILE: &str = "prompts.txt";
pub const DEFAULT_REFERENCE_IMAGE_1: &str = "character_ref_1.png";
pub const DEFAULT_REFERENCE_IMAGE_2: &str = "character_ref_2.png";
pub const DEFAULT_REQUEST_INTERVAL_SECS: u64 = 2;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Left in freshly copied `.env` templates; never a usable key.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_GOOGLE_API_KEY";

pub const PROMPT_SUFFIX: &str = "cinematic style, 16:9 aspect ratio, photorealistic, ultra high detail";
pub const OUTPUT_EXTENSION: &str = "png";
pub const FILE_NAME_PROMPT_CHARS: usize = 50;
pub const LOG_PROMPT_CHARS: usize = 70;
