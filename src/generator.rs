use async_trait::async_trait;
use llmapi::providers::gemini::models::GeminiResponse;
use llmapi::providers::{gemini_generate, gemini_model_info};
use llmapi::{ApiStatusError, LLMClient, LLMMessageType, LLMProvider};
use tracing::{debug, info};

use crate::config::Config;
use crate::constants::PLACEHOLDER_API_KEY;
use crate::error::{GenerationError, StartupError};

/// Remote image generation capability used by the batch loop.
///
/// The batch never talks HTTP directly, so tests can swap in a scripted generator.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Human-readable backend name for logging.
    fn name(&self) -> &str;

    fn model(&self) -> &str;

    /// Called once before the first prompt. An error here ends the run.
    async fn preflight_check(&self) -> Result<(), StartupError> {
        Ok(())
    }

    /// Sends one multimodal request. `parts` are forwarded in order.
    async fn generate(
        &self,
        parts: Vec<LLMMessageType>,
    ) -> Result<GeminiResponse, GenerationError>;
}

pub struct GeminiGenerator {
    client: LLMClient,
}

impl GeminiGenerator {
    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() || api_key == PLACEHOLDER_API_KEY {
            return Err(StartupError::Client(
                "a real Google API key is required; check GOOGLE_API_KEY".to_string(),
            ));
        }

        let model = config.model.trim();
        let model = model.strip_prefix("models/").unwrap_or(model);
        if model.is_empty() {
            return Err(StartupError::Client("model name cannot be empty".to_string()));
        }
        if config.endpoint.trim().is_empty() {
            return Err(StartupError::Client("endpoint cannot be empty".to_string()));
        }

        let client = LLMClient::new(LLMProvider::Gemini, api_key, config.endpoint.trim(), model)
            .with_request_timeout(config.request_timeout);
        Ok(Self { client })
    }

    pub fn client(&self) -> &LLMClient {
        &self.client
    }
}

#[async_trait]
impl ImageGenerator for GeminiGenerator {
    fn name(&self) -> &str {
        self.client.provider().as_str()
    }

    fn model(&self) -> &str {
        self.client.default_model()
    }

    async fn preflight_check(&self) -> Result<(), StartupError> {
        let fail = |reason: String| StartupError::Preflight {
            model: self.model().to_string(),
            reason,
        };

        let info = gemini_model_info(&self.client).await.map_err(|err| {
            match err.downcast_ref::<ApiStatusError>() {
                Some(status) if status.is_auth_failure() => {
                    fail(format!("credential rejected (HTTP {})", status.status))
                }
                Some(status) if status.status == 404 => fail("unknown model".to_string()),
                _ => fail(format!("{:#}", err)),
            }
        })?;

        if !info.supports_generate_content() {
            return Err(fail("model does not support generateContent".to_string()));
        }
        info!(
            "Successfully loaded model: {} ({})",
            self.model(),
            info.display_name.as_deref().unwrap_or(&info.name)
        );
        Ok(())
    }

    async fn generate(
        &self,
        parts: Vec<LLMMessageType>,
    ) -> Result<GeminiResponse, GenerationError> {
        debug!(model = self.model(), parts = parts.len(), "sending generateContent request");
        gemini_generate(&self.client, parts)
            .await
            .map_err(classify_error)
    }
}

/// Maps the client's `anyhow` errors onto the per-prompt error kinds.
pub fn classify_error(err: anyhow::Error) -> GenerationError {
    if let Some(status) = err.downcast_ref::<ApiStatusError>() {
        if status.is_rate_limited() {
            return GenerationError::RateLimited(status.to_string());
        }
        return GenerationError::Request(status.to_string());
    }
    if err.downcast_ref::<serde_json::Error>().is_some() {
        return GenerationError::MalformedResponse(format!("{:#}", err));
    }
    GenerationError::Request(format!("{:#}", err))
}
