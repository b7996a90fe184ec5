//! Google Gemini provider
//!
//! Native function calling over the `generateContent` REST API.

mod gateway;
mod session;
mod types;

pub use gateway::{DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_TIMEOUT, GeminiConfig, GeminiGateway};
