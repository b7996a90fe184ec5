//! Presentation layer for testhub-assistant
//!
//! This crate contains the CLI definition and the HTTP surface: the chat
//! endpoint, its streamed response body and the health probe.

pub mod cli;
pub mod http;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use http::{AppError, AppState, StreamWriter, router};
