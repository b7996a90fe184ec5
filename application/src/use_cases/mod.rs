//! Application use cases
//!
//! - [`build_session`]: client transcript to model session plan
//! - [`run_chat`]: the model⇄tool agent loop

pub mod build_session;
pub mod run_chat;
pub(crate) mod tool_helpers;
