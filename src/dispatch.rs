//! Request Dispatcher
//!
//! One complete attempt per call: resolve the provider contract, build
//! headers and payload, send a single bounded POST, and map the outcome onto
//! the failure taxonomy. The dispatcher holds no state between calls beyond
//! the shared HTTP client; the contracts it reads are immutable statics, so
//! concurrent dispatches need no coordination. Retry, streaming, and
//! cancellation are the host's problem, not this layer's.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::DispatchError;
use crate::providers::{ProviderContract, lookup};
use crate::types::{ProviderId, RequestOptions};

/// Recommended per-request timeout for interactive editor use.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(60_000);

/// Sends chat-completion requests to a provider and classifies the outcome.
pub struct Dispatcher {
    http_client: reqwest::Client,
    base_urls: HashMap<ProviderId, String>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_urls: HashMap::new(),
        }
    }

    /// Use a preconfigured HTTP client (proxy, TLS, connection pool settings).
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = client;
        self
    }

    /// Override a provider's base URL (self-hosted gateways, tests).
    pub fn with_base_url(mut self, provider: ProviderId, base_url: impl Into<String>) -> Self {
        self.base_urls.insert(provider, base_url.into());
        self
    }

    fn base_url<'a>(&'a self, contract: &'a dyn ProviderContract) -> &'a str {
        self.base_urls
            .get(&contract.id())
            .map(String::as_str)
            .unwrap_or_else(|| contract.default_base_url())
    }

    /// Send `content` (prefixed by `system_prompt` per the provider's role
    /// convention) to `provider_id` and return the reply text.
    ///
    /// All-or-nothing: exactly one HTTP attempt, resolved within `timeout`.
    /// An unknown provider id fails before any I/O.
    pub async fn dispatch(
        &self,
        provider_id: &str,
        system_prompt: &str,
        content: &str,
        credential: &str,
        options: &RequestOptions,
        timeout: Duration,
    ) -> Result<String, DispatchError> {
        let provider: ProviderId = provider_id.parse()?;
        let contract = lookup(provider);

        options.validate()?;
        let headers = contract.build_headers(credential)?;
        let payload = contract.build_payload(system_prompt, content, options)?;
        let url = contract.chat_url(self.base_url(contract));

        debug!(provider = %provider, %url, "dispatching chat request");

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .json(&payload)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_transport_error(provider, &e))?;

        let status = response.status();
        if !status.is_success() {
            let fallback = status.canonical_reason();
            let body_text = response.text().await.unwrap_or_default();
            let error = contract
                .classify_error_body(status.as_u16(), &body_text)
                .unwrap_or_else(|| {
                    classify_http_error(provider, status.as_u16(), &body_text, fallback)
                });
            warn!(provider = %provider, status = status.as_u16(), %error, "dispatch failed");
            return Err(error);
        }

        // The request timeout covers the body read too; a deadline that fires
        // here is still a transport failure, not a malformed response.
        let body: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                classify_transport_error(provider, &e)
            } else {
                DispatchError::ParseError(format!("response body is not JSON: {e}"))
            }
        })?;
        let text = contract.parse_reply(&body)?;
        if text.trim().is_empty() {
            warn!(provider = %provider, "provider returned empty reply text");
            return Err(DispatchError::EmptyResponse);
        }

        debug!(provider = %provider, chars = text.len(), "dispatch succeeded");
        Ok(text)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn classify_transport_error(provider: ProviderId, error: &reqwest::Error) -> DispatchError {
    // No response was received in either case; timeouts are called out in the
    // message to aid diagnosis.
    let reason = if error.is_timeout() {
        format!("provider={provider} request timed out")
    } else {
        format!("provider={provider} {error}")
    };
    warn!(provider = %provider, %reason, "transport failure");
    DispatchError::NetworkUnreachable(reason)
}

/// Map a bare HTTP status onto the taxonomy, carrying the given message.
pub(crate) fn classify_by_status(status: u16, message: String) -> DispatchError {
    match status {
        401 | 403 => DispatchError::AuthInvalid(message),
        429 => DispatchError::RateLimited(message),
        500..=599 => DispatchError::ServerUnavailable { status, message },
        _ => DispatchError::ApiError { status, message },
    }
}

/// Generic HTTP failure classifier, used when the provider's structured error
/// envelope is absent or unrecognized. Includes a bounded body sample so the
/// host can show something actionable.
pub(crate) fn classify_http_error(
    provider: ProviderId,
    status: u16,
    body_text: &str,
    fallback_message: Option<&str>,
) -> DispatchError {
    let body_sample: String = body_text.chars().take(200).collect();
    let message = if !body_sample.trim().is_empty() {
        format!("provider={provider} http={status} body_sample={body_sample}")
    } else if let Some(fallback) = fallback_message {
        format!("provider={provider} http={status} {fallback}")
    } else {
        format!("provider={provider} http={status}")
    };
    classify_by_status(status, message)
}
