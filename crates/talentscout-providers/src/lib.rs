//! Provider layer for TalentScout.
//!
//! # Architecture
//!
//! - [`traits::CompletionProvider`] — the narrow contract the turn processor consumes
//! - [`http_provider::HttpProvider`] — streaming client for OpenAI-compatible APIs
//! - [`sse`] — incremental Server-Sent Events decoder used by the HTTP client

pub mod error;
pub mod http_provider;
pub mod sse;
pub mod traits;

pub use error::ProviderError;
pub use http_provider::HttpProvider;
pub use traits::{CompletionProvider, CompletionRequest, TextStream};
