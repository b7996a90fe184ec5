//! Request and response bodies.

use serde::{Deserialize, Serialize};
use testhub_application::{ChatMessage, ExecutionParams, RunChatInput};
use testhub_domain::SessionContext;

/// Body of `POST /api/chat`.
///
/// A missing `messages` field deserializes to an empty list so it is
/// rejected the same way as `[]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub current_user_id: Option<String>,
    #[serde(default)]
    pub current_project_id: Option<String>,
}

impl ChatRequest {
    pub fn into_input(self, execution: ExecutionParams) -> RunChatInput {
        let context = SessionContext::new(self.current_project_id, self.current_user_id);
        RunChatInput::new(self.messages, context).with_execution(execution)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
    pub tools: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_context_ids() {
        let request: ChatRequest = serde_json::from_str(
            r#"{"messages":[{"role":"user","content":"hi"}],"currentProjectId":"P1","currentUserId":"  "}"#,
        )
        .unwrap();

        let input = request.into_input(ExecutionParams::default());

        assert_eq!(input.messages.len(), 1);
        assert_eq!(input.context.current_project_id.as_deref(), Some("P1"));
        assert!(input.context.current_user_id.is_none());
    }

    #[test]
    fn test_missing_messages_is_empty() {
        let request: ChatRequest = serde_json::from_str("{}").unwrap();
        assert!(request.messages.is_empty());
    }
}
