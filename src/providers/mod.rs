//! Provider Registry
//!
//! One [`ProviderContract`] per supported provider, resolved through an
//! exhaustive match on [`ProviderId`]. Contracts are immutable statics:
//! constructed once, read-only thereafter, safe to share across concurrent
//! dispatches. Every method is pure — no I/O happens here.

pub mod anthropic;
pub mod lmstudio;
pub mod openai;

use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::error::DispatchError;
use crate::types::{ProviderId, RequestOptions};

/// Fixed HTTP contract adapting one provider's wire format to the common
/// dispatch shape.
pub trait ProviderContract: Send + Sync {
    /// Provider this contract serves.
    fn id(&self) -> ProviderId;

    /// Base URL used when the host supplies no override.
    fn default_base_url(&self) -> &'static str;

    /// Chat endpoint for the given base URL.
    fn chat_url(&self, base_url: &str) -> String;

    /// Authentication and content-type headers for one request.
    fn build_headers(&self, credential: &str) -> Result<HeaderMap, DispatchError>;

    /// JSON request body combining system prompt and user content according
    /// to the provider's message-role convention.
    fn build_payload(
        &self,
        system_prompt: &str,
        content: &str,
        options: &RequestOptions,
    ) -> Result<Value, DispatchError>;

    /// Extract the reply text from a 2xx response body.
    ///
    /// Fails with [`DispatchError::ParseError`] when the expected field is
    /// absent or not a string. Callers convert whitespace-only replies to
    /// [`DispatchError::EmptyResponse`]; a successful parse is never treated
    /// as usable when it trims to nothing.
    fn parse_reply(&self, body: &Value) -> Result<String, DispatchError>;

    /// Classify a non-2xx body via the provider's structured error envelope.
    ///
    /// Returns `None` when the body doesn't match the envelope so the
    /// dispatcher can fall back to the generic status classifier.
    fn classify_error_body(&self, _status: u16, _body: &str) -> Option<DispatchError> {
        None
    }
}

/// Resolve the contract for a provider id.
///
/// The match is exhaustive: adding a provider without a contract is a compile
/// error, not a runtime lookup miss.
pub fn lookup(provider: ProviderId) -> &'static dyn ProviderContract {
    match provider {
        ProviderId::Claude => &anthropic::AnthropicContract,
        ProviderId::OpenAi => &openai::OpenAiContract,
        ProviderId::LmStudio => &lmstudio::LmStudioContract,
    }
}

pub(crate) fn join_chat_path(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Pull `error.message` out of an OpenAI-style error envelope:
/// `{ "error": { "message": "...", ... } }`.
pub(crate) fn openai_envelope_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    json.get("error")?
        .get("message")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}
