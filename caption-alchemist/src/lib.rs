//! Caption and hashtag generation for short videos.
//!
//! Bundles the workspace crates behind feature flags so applications can pull
//! in only the pieces they need.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use caption_primitives as primitives;

/// Generation protocol and session (enabled by `kernel` feature).
#[cfg(feature = "kernel")]
pub use caption_kernel as kernel;

/// Completion transports (enabled by `adapters` feature).
#[cfg(feature = "adapters")]
pub use caption_adapters as adapters;

/// Generation history (enabled by `history` feature).
#[cfg(feature = "history")]
pub use caption_history as history;

/// Prompt construction (enabled by `prompts` feature).
#[cfg(feature = "prompts")]
pub use caption_prompts as prompts;

/// Process configuration (enabled by `config` feature).
#[cfg(feature = "config")]
pub use caption_config as config;

/// Tracing setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use caption_telemetry as telemetry;
