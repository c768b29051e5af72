//! Anthropic Messages API contract.
//!
//! Wire shape: `POST {base}/v1/messages` with `x-api-key` auth and a pinned
//! `anthropic-version`. The Messages API has no system role in the `messages`
//! array for this integration's single-shot use, so the system prompt is
//! prepended into the one user message.

use reqwest::header::HeaderMap;
use serde_json::{Value, json};

use super::{ProviderContract, join_chat_path};
use crate::dispatch::classify_by_status;
use crate::error::DispatchError;
use crate::http::HttpHeaderBuilder;
use crate::types::{ProviderId, RequestOptions};

pub const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

pub struct AnthropicContract;

impl ProviderContract for AnthropicContract {
    fn id(&self) -> ProviderId {
        ProviderId::Claude
    }

    fn default_base_url(&self) -> &'static str {
        "https://api.anthropic.com"
    }

    fn chat_url(&self, base_url: &str) -> String {
        join_chat_path(base_url, "/v1/messages")
    }

    fn build_headers(&self, credential: &str) -> Result<HeaderMap, DispatchError> {
        Ok(HttpHeaderBuilder::new()
            .with_custom_auth("x-api-key", credential)?
            .with_header("anthropic-version", ANTHROPIC_VERSION)?
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
        let combined = if system_prompt.is_empty() {
            content.to_string()
        } else {
            format!("{system_prompt}\n\n{content}")
        };
        Ok(json!({
            "model": model,
            "messages": [{ "role": "user", "content": combined }],
            "max_tokens": options.effective_max_tokens(),
            "temperature": options.effective_temperature(),
        }))
    }

    fn parse_reply(&self, body: &Value) -> Result<String, DispatchError> {
        body.get("content")
            .and_then(|c| c.get(0))
            .and_then(|block| block.get("text"))
            .and_then(|t| t.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                DispatchError::ParseError("missing content[0].text in Anthropic response".into())
            })
    }

    fn classify_error_body(&self, status: u16, body: &str) -> Option<DispatchError> {
        classify_anthropic_http_error(status, body)
    }
}

/// Classify Anthropic HTTP errors by parsing the structured error envelope.
///
/// Anthropic typically returns:
/// `{ "type": "error", "error": { "type": "...", "message": "..." } }`
///
/// The HTTP status keeps precedence over the envelope's `type`: a 401 is an
/// authentication failure regardless of what the body claims, and a
/// `rate_limit_error` label on a non-429 status does not make the failure a
/// rate limit. The envelope contributes the human-readable message only.
/// Returns `None` when the body doesn't match the envelope so the dispatcher
/// can fall back to the generic classifier.
pub fn classify_anthropic_http_error(status: u16, body_text: &str) -> Option<DispatchError> {
    let json: Value = serde_json::from_str(body_text).ok()?;
    let error_obj = json.get("error")?;
    let error_type = error_obj.get("type").and_then(|v| v.as_str())?;
    let error_message = error_obj
        .get("message")
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown error");

    let mapped = match status {
        401 | 403 | 429 | 500..=599 => classify_by_status(status, error_message.to_string()),
        _ => DispatchError::ApiError {
            status,
            message: format!("Anthropic error ({error_type}): {error_message}"),
        },
    };

    Some(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_headers_includes_required_anthropic_headers() {
        let headers = AnthropicContract.build_headers("k").unwrap();
        assert_eq!(
            headers.get("x-api-key").and_then(|v| v.to_str().ok()),
            Some("k")
        );
        assert_eq!(
            headers
                .get("anthropic-version")
                .and_then(|v| v.to_str().ok()),
            Some(ANTHROPIC_VERSION)
        );
        assert_eq!(
            headers
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
    }

    #[test]
    fn system_prompt_is_prepended_into_the_user_message() {
        let payload = AnthropicContract
            .build_payload("You are terse.", "Explain lifetimes.", &RequestOptions::new())
            .unwrap();
        assert_eq!(
            payload["messages"][0]["content"],
            "You are terse.\n\nExplain lifetimes."
        );
        assert_eq!(payload["messages"][0]["role"], "user");
        assert_eq!(payload["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn empty_system_prompt_sends_content_unmodified() {
        let payload = AnthropicContract
            .build_payload("", "just the text", &RequestOptions::new())
            .unwrap();
        assert_eq!(payload["messages"][0]["content"], "just the text");
    }

    #[test]
    fn model_override_replaces_default() {
        let options = RequestOptions::new().with_model("claude-3-opus-20240229");
        let payload = AnthropicContract.build_payload("s", "c", &options).unwrap();
        assert_eq!(payload["model"], "claude-3-opus-20240229");
    }

    #[test]
    fn parse_reply_reads_first_content_block() {
        let body = serde_json::json!({
            "id": "msg_01",
            "type": "message",
            "content": [{ "type": "text", "text": "Hello!" }]
        });
        assert_eq!(AnthropicContract.parse_reply(&body).unwrap(), "Hello!");
    }

    #[test]
    fn parse_reply_fails_on_missing_field() {
        let body = serde_json::json!({ "id": "msg_01", "content": [] });
        assert!(matches!(
            AnthropicContract.parse_reply(&body),
            Err(DispatchError::ParseError(_))
        ));
    }

    #[test]
    fn anthropic_error_mapping_authentication_error() {
        let body = r#"{"type":"error","error":{"type":"authentication_error","message":"Invalid API key"}}"#;
        let err = classify_anthropic_http_error(401, body).expect("classified");
        assert_eq!(err, DispatchError::AuthInvalid("Invalid API key".into()));
    }

    #[test]
    fn anthropic_error_mapping_overloaded_error() {
        let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        let err = classify_anthropic_http_error(529, body).expect("classified");
        assert_eq!(
            err,
            DispatchError::ServerUnavailable {
                status: 529,
                message: "Overloaded".into()
            }
        );
    }

    #[test]
    fn status_takes_precedence_over_envelope_type() {
        // A 401 is an auth failure even when the envelope carries a non-auth
        // type; the envelope only supplies the message.
        let body =
            r#"{"type":"error","error":{"type":"invalid_request_error","message":"key disabled"}}"#;
        let err = classify_anthropic_http_error(401, body).expect("classified");
        assert_eq!(err, DispatchError::AuthInvalid("key disabled".into()));

        // Symmetrically, a rate-limit label on a non-429 status stays an
        // ApiError for that status.
        let body = r#"{"type":"error","error":{"type":"rate_limit_error","message":"slow down"}}"#;
        let err = classify_anthropic_http_error(400, body).expect("classified");
        assert_eq!(
            err,
            DispatchError::ApiError {
                status: 400,
                message: "Anthropic error (rate_limit_error): slow down".into()
            }
        );
    }

    #[test]
    fn anthropic_error_mapping_returns_none_on_non_envelope() {
        assert!(classify_anthropic_http_error(400, r#"{"message":"not anthropic"}"#).is_none());
    }
}
