//! Shared HTTP building blocks used by every provider contract.

pub mod headers;

pub use headers::HttpHeaderBuilder;
