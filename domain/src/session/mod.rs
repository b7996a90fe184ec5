//! LLM Session domain.
//!
//! - [`response::LlmResponse`]: a model reply made of text and tool-use blocks

pub mod response;
