mod api;
pub mod models;
pub use api::{
    build_generate_body, convert_body_parts_gemini, decode_inline_data, fetch_model_info,
    first_part, parse_generate_response, send_generate_request,
};

use crate::types::{LLMClient, LLMMessage};
use models::GeminiResponse;

/// Sends a single user turn built from `content` to the client's model.
pub async fn generate(
    client: &LLMClient,
    content: Vec<crate::types::LLMMessageType>,
) -> anyhow::Result<GeminiResponse> {
    let message = LLMMessage::new(None, "user", content);
    send_generate_request(client, vec![message]).await
}
