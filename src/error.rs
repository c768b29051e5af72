//! Error Handling Module
//!
//! One closed taxonomy for everything a dispatch can fail with. Every variant
//! renders a human-readable message suitable for direct display by the host;
//! there is no opaque/unclassified escape hatch.

use thiserror::Error;

/// Errors produced by provider resolution, request construction, and dispatch.
///
/// All variants are terminal for the current invocation — nothing is retried
/// by this crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// The provider id is not in the supported set
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// No HTTP response was received (connect failure or timeout)
    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),

    /// The provider rejected the credential (HTTP 401/403)
    #[error("Authentication failed: {0}")]
    AuthInvalid(String),

    /// The provider throttled the request (HTTP 429)
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// The provider is down or overloaded (HTTP 5xx)
    #[error("Server unavailable ({status}): {message}")]
    ServerUnavailable { status: u16, message: String },

    /// Any other API-level failure, including request-construction errors
    /// (reported with status 0)
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// The response body did not contain the expected reply field
    #[error("Failed to parse provider response: {0}")]
    ParseError(String),

    /// The provider returned a reply with no usable text
    #[error("Provider returned an empty response")]
    EmptyResponse,
}

impl DispatchError {
    /// Construction failures (invalid options, malformed header values) are
    /// reported as API errors with status 0, preserving the underlying message.
    pub fn construction(message: impl Into<String>) -> Self {
        Self::ApiError {
            status: 0,
            message: message.into(),
        }
    }

    /// HTTP status associated with this error, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ServerUnavailable { status, .. } => Some(*status),
            Self::ApiError { status, .. } if *status > 0 => Some(*status),
            _ => None,
        }
    }
}
