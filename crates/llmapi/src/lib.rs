pub mod providers;
pub mod types;
pub mod utils;

pub use types::{ApiStatusError, LLMClient, LLMMessage, LLMMessageType, LLMProvider, LLMUserType};
