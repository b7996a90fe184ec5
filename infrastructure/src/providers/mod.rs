//! Model provider adapters implementing [`testhub_application::LlmGateway`].

pub mod gemini;
