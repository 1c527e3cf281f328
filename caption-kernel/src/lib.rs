//! Caption generation protocol.
//!
//! [`GenerationClient`] builds the prompt, walks the [`ModelSelector`]
//! candidates until a completion succeeds, and parses the reply into a
//! [`GenerationResult`](caption_primitives::GenerationResult).
//! [`GenerationSession`] adds the single in-flight guard, the newest-first
//! result list, and fire-and-forget history logging used by front ends.

#![warn(missing_docs, clippy::pedantic)]

mod client;
mod error;
mod parser;
mod selector;
mod session;

pub use client::GenerationClient;
pub use error::{GenerationError, KernelResult};
pub use parser::{ParseError, ParsedCompletion, parse_completion};
pub use selector::{Candidates, DEFAULT_MODELS, ModelSelector, SelectorError};
pub use session::{GenerationSession, SessionError};
