use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop the whole run before the first prompt is sent.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("could not configure the image client: {0}")]
    Client(String),

    #[error("model check for '{model}' failed: {reason}")]
    Preflight { model: String, reason: String },

    #[error("could not create output directory '{}': {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read prompt file '{}': {source}", .path.display())]
    PromptFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("prompt file '{}' is empty or contains no valid prompts", .path.display())]
    NoPrompts { path: PathBuf },

    #[error("could not load reference image '{}': {reason}", .path.display())]
    ReferenceImage { path: PathBuf, reason: String },
}

/// Failures scoped to one prompt; the batch moves on after logging them.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("rate limited by the service: {0}")]
    RateLimited(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("could not decode image payload: {0}")]
    Decode(String),

    #[error("could not write '{}': {reason}", .path.display())]
    Write { path: PathBuf, reason: String },
}

impl GenerationError {
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Request(_) => "request",
            GenerationError::RateLimited(_) => "rate_limited",
            GenerationError::MalformedResponse(_) => "malformed_response",
            GenerationError::Decode(_) => "decode",
            GenerationError::Write { .. } => "write",
        }
    }
}
