//! Request header assembly shared by all provider contracts.
//!
//! Credentials arrive as plain strings from host configuration, so every
//! insertion validates the value; a key pasted with a stray newline becomes a
//! construction error instead of a rejected request.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

use crate::error::DispatchError;

/// Builds the header set for one provider request.
pub struct HttpHeaderBuilder {
    headers: HeaderMap,
}

impl HttpHeaderBuilder {
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
        }
    }

    /// `Authorization: Bearer <token>` (OpenAI-style auth).
    pub fn with_bearer_auth(mut self, token: &str) -> Result<Self, DispatchError> {
        let value = header_value(&format!("Bearer {token}"))?;
        self.headers.insert(AUTHORIZATION, value);
        Ok(self)
    }

    /// Credential under a provider-chosen header, e.g. Anthropic's `x-api-key`.
    pub fn with_custom_auth(self, header_name: &str, value: &str) -> Result<Self, DispatchError> {
        self.with_header(header_name, value)
    }

    /// `Content-Type: application/json`; every supported API speaks JSON.
    pub fn with_json_content_type(mut self) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self
    }

    /// Any other fixed header a contract pins, e.g. `anthropic-version`.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, DispatchError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| DispatchError::construction(format!("Invalid header name '{name}': {e}")))?;
        self.headers.insert(name, header_value(value)?);
        Ok(self)
    }

    pub fn build(self) -> HeaderMap {
        self.headers
    }
}

impl Default for HttpHeaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn header_value(value: &str) -> Result<HeaderValue, DispatchError> {
    HeaderValue::from_str(value)
        .map_err(|e| DispatchError::construction(format!("Invalid header value: {e}")))
}
