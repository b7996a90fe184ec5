//! Conversation domain.
//!
//! - [`entities::ConversationTurn`]: one entry of the client-held transcript
//! - [`entities::Role`]: the two roles the model understands
//! - [`entities::SessionContext`]: ids the client injects to scope tools

pub mod entities;

pub use entities::{ConversationTurn, Role, SessionContext};
