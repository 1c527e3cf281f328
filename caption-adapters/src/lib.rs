//! Text-completion transports used by the generation client.
//!
//! Providers implement [`traits::CompletionTransport`]; the HTTPS client in
//! [`http_client`] is shared with the hosted history store.

#![warn(missing_docs, clippy::pedantic)]

pub mod gemini;
pub mod http_client;
pub mod traits;

pub use gemini::{GeminiConfig, GeminiTransport};
pub use traits::{AdapterError, AdapterResult, CompletionTransport};
