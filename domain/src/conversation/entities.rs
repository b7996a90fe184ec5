//! Conversation domain entities

use serde::{Deserialize, Serialize};

/// Role of a turn in the model's two-role schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Collapse a client role string: only `"user"` is a user turn,
    /// anything else is treated as the assistant.
    pub fn from_client(role: &str) -> Self {
        if role == "user" {
            Role::User
        } else {
            Role::Assistant
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single transcript entry.
///
/// The server holds no history between requests; the client resends the
/// full list every time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
}

impl ConversationTurn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// Contextual ids supplied by the client alongside the transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub current_project_id: Option<String>,
    pub current_user_id: Option<String>,
}

impl SessionContext {
    pub fn new(current_project_id: Option<String>, current_user_id: Option<String>) -> Self {
        Self {
            current_project_id: current_project_id.filter(|s| !s.trim().is_empty()),
            current_user_id: current_user_id.filter(|s| !s.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_collapse() {
        assert_eq!(Role::from_client("user"), Role::User);
        assert_eq!(Role::from_client("assistant"), Role::Assistant);
        assert_eq!(Role::from_client("model"), Role::Assistant);
        assert_eq!(Role::from_client("system"), Role::Assistant);
        assert_eq!(Role::from_client("USER"), Role::Assistant);
    }

    #[test]
    fn test_session_context_drops_blank_ids() {
        let ctx = SessionContext::new(Some("  ".to_string()), Some("u1".to_string()));
        assert!(ctx.current_project_id.is_none());
        assert_eq!(ctx.current_user_id.as_deref(), Some("u1"));
    }
}
