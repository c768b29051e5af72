//! LM Studio local endpoint contract.
//!
//! OpenAI-compatible server on localhost. Local servers usually run without
//! auth, so the bearer header is attached only when a credential is actually
//! configured. The `model` field is optional — LM Studio serves whichever
//! model is loaded unless an override names one.

use reqwest::header::HeaderMap;
use serde_json::{Map, Value, json};

use super::openai::parse_chat_completion_reply;
use super::{ProviderContract, join_chat_path};
use crate::error::DispatchError;
use crate::http::HttpHeaderBuilder;
use crate::types::{ProviderId, RequestOptions};

pub struct LmStudioContract;

impl ProviderContract for LmStudioContract {
    fn id(&self) -> ProviderId {
        ProviderId::LmStudio
    }

    fn default_base_url(&self) -> &'static str {
        "http://localhost:1234"
    }

    fn chat_url(&self, base_url: &str) -> String {
        join_chat_path(base_url, "/v1/chat/completions")
    }

    fn build_headers(&self, credential: &str) -> Result<HeaderMap, DispatchError> {
        let builder = HttpHeaderBuilder::new().with_json_content_type();
        let builder = if credential.is_empty() {
            builder
        } else {
            builder.with_bearer_auth(credential)?
        };
        Ok(builder.build())
    }

    fn build_payload(
        &self,
        system_prompt: &str,
        content: &str,
        options: &RequestOptions,
    ) -> Result<Value, DispatchError> {
        let mut body = Map::new();
        body.insert(
            "messages".into(),
            json!([
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": content },
            ]),
        );
        body.insert("temperature".into(), json!(options.effective_temperature()));
        body.insert("max_tokens".into(), json!(options.effective_max_tokens()));
        if let Some(model) = options.model_override.as_deref() {
            body.insert("model".into(), json!(model));
        }
        Ok(Value::Object(body))
    }

    fn parse_reply(&self, body: &Value) -> Result<String, DispatchError> {
        parse_chat_completion_reply(body, "LM Studio")
    }
}
