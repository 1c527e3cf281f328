//! Prompt construction for caption generation.
//!
//! [`CaptionPromptBuilder`] renders the instruction sent to the completion
//! service. The `CAPTION:`/`HASHTAGS:` markers it asks for are exported so the
//! response parser stays in lockstep with the prompt.

#![warn(missing_docs, clippy::pedantic)]

mod caption;
pub mod template;

pub use caption::{CAPTION_MARKER, CaptionPromptBuilder, EMPTY_CONTEXT_PLACEHOLDER, HASHTAGS_MARKER};
pub use template::{PromptTemplate, TemplateBuilder, TemplateError, TemplateResult};
