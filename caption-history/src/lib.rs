//! Generation history.
//!
//! [`HistoryLog`] is the only entry point the rest of the workspace uses: it
//! never fails the caller. Stores implement [`HistoryStore`] and do report
//! their errors.

#![warn(missing_docs, clippy::pedantic)]

mod error;
pub mod journal;
mod log;
pub mod postgrest;
pub mod store;

pub use error::{HistoryError, HistoryResult};
pub use journal::FileHistoryStore;
pub use log::{DEFAULT_HISTORY_LIMIT, HistoryLog};
pub use postgrest::{GENERATION_LOGS_TABLE, PostgrestConfig, PostgrestHistoryStore};
pub use store::{HistoryStore, InMemoryHistoryStore};
