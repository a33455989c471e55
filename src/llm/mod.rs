//! Hand-off of the advice summary to a hosted chat-completions model.
//!
//! Enabled with the `llm` feature. Nothing in the analysis modules depends on
//! this; callers build a report first and pass its summary here.

pub mod client;
pub mod config;
pub mod types;

pub use client::*;
pub use config::*;
pub use types::*;
