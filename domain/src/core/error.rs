//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown {kind} value: {value}")]
    InvalidEnumValue { kind: &'static str, value: String },

    #[error("Conversation is empty")]
    EmptyConversation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_enum_value_display() {
        let error = DomainError::InvalidEnumValue {
            kind: "priority",
            value: "P9".to_string(),
        };
        assert_eq!(error.to_string(), "Unknown priority value: P9");
    }

    #[test]
    fn test_empty_conversation_display() {
        assert_eq!(
            DomainError::EmptyConversation.to_string(),
            "Conversation is empty"
        );
    }
}
