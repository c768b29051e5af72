//! OpenAI Chat Completions contract.
//!
//! Wire shape: `POST {base}/v1/chat/completions` with bearer auth. The API
//! accepts a distinct system role, so the system prompt and user content stay
//! in separate messages.

use reqwest::header::HeaderMap;
use serde_json::{Value, json};

use super::{ProviderContract, join_chat_path, openai_envelope_message};
use crate::dispatch::classify_by_status;
use crate::error::DispatchError;
use crate::http::HttpHeaderBuilder;
use crate::types::{ProviderId, RequestOptions};

pub const DEFAULT_MODEL: &str = "gpt-4o";

pub struct OpenAiContract;

impl ProviderContract for OpenAiContract {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    fn default_base_url(&self) -> &'static str {
        "https://api.openai.com"
    }

    fn chat_url(&self, base_url: &str) -> String {
        join_chat_path(base_url, "/v1/chat/completions")
    }

    fn build_headers(&self, credential: &str) -> Result<HeaderMap, DispatchError> {
        Ok(HttpHeaderBuilder::new()
            .with_bearer_auth(credential)?
            .with_json_content_type()
            .build())
    }

    fn build_payload(
        &self,
        system_prompt: &str,
        content: &str,
        options: &RequestOptions,
    ) -> Result<Value, DispatchError> {
        let model = options.model_override.as_deref().unwrap_or(DEFAULT_MODEL);
        Ok(json!({
            "model": model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": content },
            ],
            "max_tokens": options.effective_max_tokens(),
            "temperature": options.effective_temperature(),
        }))
    }

    fn parse_reply(&self, body: &Value) -> Result<String, DispatchError> {
        parse_chat_completion_reply(body, "OpenAI")
    }

    fn classify_error_body(&self, status: u16, body: &str) -> Option<DispatchError> {
        let message = openai_envelope_message(body)?;
        Some(classify_by_status(status, message))
    }
}

/// Extract `choices[0].message.content` from an OpenAI-compatible response.
pub(crate) fn parse_chat_completion_reply(
    body: &Value,
    provider: &str,
) -> Result<String, DispatchError> {
    body.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            DispatchError::ParseError(format!(
                "missing choices[0].message.content in {provider} response"
            ))
        })
}
