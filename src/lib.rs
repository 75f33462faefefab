pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod fs_utils;
pub mod generator;
pub mod logging;
pub mod models;
pub mod rate_limit;
pub mod reference;

pub use commands::batch::{run, run_prompts};
pub use commands::generate::generate_for_prompt;
pub use commands::prompts::build_final_prompt;

pub use config::Config;

pub use constants::{
    DEFAULT_GEMINI_ENDPOINT, DEFAULT_IMAGE_MODEL, DEFAULT_OUTPUT_DIR, DEFAULT_PROMPT_FILE,
    PROMPT_SUFFIX,
};

pub use error::{GenerationError, StartupError};
pub use generator::{GeminiGenerator, ImageGenerator};
pub use models::{BatchSummary, PromptEntry, PromptOutcome, PromptReport};
pub use rate_limit::{FixedInterval, RateLimiter};
pub use reference::{ReferenceImage, ReferenceImages};
