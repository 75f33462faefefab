use crate::utils;
use std::fmt;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LLMProvider {
    Gemini,
}
impl LLMProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LLMProvider::Gemini => "gemini",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LLMMessageType {
    TEXT(String),
    IMAGE {
        data_b64: String,
        file_path: Option<String>,
    },
}
impl LLMMessageType {
    pub fn text(text: impl Into<String>) -> Self {
        LLMMessageType::TEXT(text.into())
    }
    /// Image part whose MIME type is later inferred from `file_path`.
    pub fn image_with_path(data_b64: impl Into<String>, file_path: impl Into<String>) -> Self {
        LLMMessageType::IMAGE {
            data_b64: data_b64.into(),
            file_path: Some(file_path.into()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LLMUserType {
    Human,
    AI,
    System,
}
impl LLMUserType {
    pub fn from_str(role_str: &str) -> Option<Self> {
        match role_str.trim().to_lowercase().as_str() {
            "user" | "human" => Some(LLMUserType::Human),
            "model" | "ai" | "assistant" => Some(LLMUserType::AI),
            "system" => Some(LLMUserType::System),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LLMMessage {
    pub id: String,
    pub role: LLMUserType,
    pub content: Vec<LLMMessageType>,
    pub created_at: i64,
}

impl LLMMessage {
    pub fn new(id: Option<String>, role: &str, content: Vec<LLMMessageType>) -> Self {
        let id = id.unwrap_or_else(|| utils::current_timestamp_millis().to_string());
        Self {
            id,
            role: LLMUserType::from_str(role).unwrap_or(LLMUserType::Human),
            content,
            created_at: utils::current_timestamp_millis() as i64,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LLMClient {
    pub(crate) provider: LLMProvider,
    pub(crate) api_key: String,
    pub(crate) endpoint: String,
    pub(crate) default_model: String,
    pub(crate) request_timeout: Option<Duration>,
}

impl LLMClient {
    pub fn new(
        provider: LLMProvider,
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            default_model: default_model.into(),
            request_timeout: None,
        }
    }

    /// Caps every HTTP call made with this client. Without it a call may wait forever.
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn provider(&self) -> LLMProvider {
        self.provider
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    pub(crate) fn http_client(&self) -> anyhow::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}

/// Non-success HTTP status returned by the provider, kept typed so callers
/// can `downcast_ref` it out of an `anyhow::Error`.
#[derive(Debug, Clone)]
pub struct ApiStatusError {
    pub status: u16,
    pub body: String,
}

impl ApiStatusError {
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status, 401 | 403)
    }
}

impl fmt::Display for ApiStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "provider returned status {}: {}", self.status, self.body)
    }
}

impl std::error::Error for ApiStatusError {}
