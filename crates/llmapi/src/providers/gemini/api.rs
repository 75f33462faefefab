use anyhow::{Context, Result};
use serde_json::{Value, json};

use crate::types::{ApiStatusError, LLMClient, LLMMessage, LLMMessageType, LLMUserType};
use crate::utils::{FALLBACK_IMAGE_MIME, decode_base64_to_bytes, detect_mime_type};

use super::models::{GeminiModelInfo, GeminiResponse, InlineData, Part};

pub fn convert_body_parts_gemini(body_part: Vec<LLMMessageType>) -> Vec<Value> {
    body_part
        .into_iter()
        .map(|part| match part {
            LLMMessageType::TEXT(text) => json!({ "text": text }),
            LLMMessageType::IMAGE {
                data_b64,
                file_path,
            } => {
                let mime = file_path
                    .as_ref()
                    .map(detect_mime_type)
                    .unwrap_or_else(|| FALLBACK_IMAGE_MIME.into());
                json!({
                    "inlineData": {
                        "mimeType": mime,
                        "data": data_b64
                    }
                })
            }
        })
        .collect()
}
pub fn convert_messages_to_gemini_contents(messages: Vec<LLMMessage>) -> Vec<Value> {
    messages
        .into_iter()
        .map(|m| {
            let parts = convert_body_parts_gemini(m.content);
            json!({
                "role": role_to_str(m.role),
                "parts": parts
            })
        })
        .collect()
}
fn role_to_str(role: LLMUserType) -> &'static str {
    match role {
        LLMUserType::Human => "user",
        LLMUserType::AI => "model",
        LLMUserType::System => "system",
    }
}

pub fn build_generate_body(messages: Vec<LLMMessage>) -> Value {
    json!({
        "contents": convert_messages_to_gemini_contents(messages)
    })
}

fn model_path(api_client: &LLMClient) -> String {
    let endpoint = api_client.endpoint().trim_end_matches('/');
    let model = api_client.default_model();
    let model = model.strip_prefix("models/").unwrap_or(model);
    format!("{}/{}", endpoint, model)
}

async fn read_success_body(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .context("Reading response body failed")?;
    if !status.is_success() {
        return Err(ApiStatusError {
            status: status.as_u16(),
            body,
        }
        .into());
    }
    Ok(body)
}

pub async fn send_generate_request(
    api_client: &LLMClient,
    body_part: Vec<LLMMessage>,
) -> Result<GeminiResponse> {
    let url = format!("{}:generateContent", model_path(api_client));
    let body = build_generate_body(body_part);

    let response = api_client
        .http_client()?
        .post(url)
        .header("x-goog-api-key", api_client.api_key())
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await
        .context("HTTP request failed")?;
    let response_text = read_success_body(response).await?;

    parse_generate_response(&response_text)
}

pub fn parse_generate_response(response_text: &str) -> Result<GeminiResponse> {
    serde_json::from_str(response_text).with_context(|| {
        format!(
            "Failed to decode Gemini response JSON. Raw response: {}",
            truncate(response_text, 512)
        )
    })
}

/// Looks the configured model up, which also proves the key is accepted.
pub async fn fetch_model_info(api_client: &LLMClient) -> Result<GeminiModelInfo> {
    let url = model_path(api_client);
    let response = api_client
        .http_client()?
        .get(&url)
        .header("x-goog-api-key", api_client.api_key())
        .send()
        .await
        .with_context(|| format!("HTTP request to {} failed", url))?;
    let response_text = read_success_body(response).await?;

    serde_json::from_str(&response_text).with_context(|| {
        format!(
            "Failed to decode Gemini model JSON. Raw response: {}",
            truncate(&response_text, 512)
        )
    })
}

pub fn decode_inline_data(inline_data: &InlineData) -> Result<Vec<u8>> {
    decode_base64_to_bytes(&inline_data.data)
}

pub fn first_part(response: &GeminiResponse) -> Option<&Part> {
    response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.parts.first())
}

fn truncate(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(limit).collect();
    cut.push_str("...");
    cut
}
