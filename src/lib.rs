//! promptrelay
//!
//! Multi-provider chat-completion dispatch for editor integrations. The crate
//! maps a logical provider id onto a concrete HTTP contract (endpoint, headers,
//! payload shape, response parse), sends a single bounded request, and
//! classifies every failure into a small, display-ready taxonomy.
//!
//! Host-side concerns (text selection, configuration UI, progress display)
//! stay with the embedding editor; this crate only consumes already-resolved
//! strings and numbers and returns either reply text or a typed error.
#![deny(unsafe_code)]

pub mod dispatch;
pub mod error;
pub mod http;
pub mod providers;
pub mod types;

pub use dispatch::Dispatcher;
pub use error::DispatchError;
pub use providers::{ProviderContract, lookup};
pub use types::{ProviderId, RequestOptions};
