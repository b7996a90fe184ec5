//! LLM Response types for native function calling.
//!
//! A model reply is a list of content blocks mixing natural text and
//! requests to run tools. The agent loop keeps going while a reply carries
//! at least one [`ContentBlock::ToolUse`].

use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single block of content within an LLM response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// A text content block from the model.
    Text { text: String },

    /// A tool use request from the model.
    ToolUse {
        /// Id used to correlate the result. Providers without native ids
        /// get one synthesized by the adapter.
        id: String,
        /// Tool name as emitted by the model (not guaranteed to exist).
        name: String,
        /// Raw arguments.
        input: HashMap<String, serde_json::Value>,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    /// Returns the text content if this is a `Text` block.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of response: the model is done.
    EndTurn,
    /// The model wants to call tools: execute them and return results.
    ToolUse,
    /// Hit the token limit: response may be truncated.
    MaxTokens,
    /// Provider-specific stop reason.
    Other(String),
}

/// A structured response from an LLM.
///
/// # Examples
///
/// ```
/// use testhub_domain::session::response::{LlmResponse, ContentBlock, StopReason};
///
/// let response = LlmResponse::from_text("项目 P1 共有 12 个测试用例。");
/// assert!(!response.has_tool_calls());
///
/// let response = LlmResponse {
///     content: vec![ContentBlock::ToolUse {
///         id: "call-1".to_string(),
///         name: "get_statistics".to_string(),
///         input: Default::default(),
///     }],
///     stop_reason: Some(StopReason::ToolUse),
///     model: None,
/// };
/// assert_eq!(response.tool_calls().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    /// Content blocks in the response (text and/or tool use).
    pub content: Vec<ContentBlock>,
    /// Why the model stopped generating.
    pub stop_reason: Option<StopReason>,
    /// Model identifier (if returned by the API).
    pub model: Option<String>,
}

impl LlmResponse {
    /// Create a text-only response.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            stop_reason: Some(StopReason::EndTurn),
            model: None,
        }
    }

    /// Concatenate all `Text` content blocks into a single string.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| b.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    /// Extract all `ToolUse` blocks as `ToolCall`s, in the order the model emitted them.
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolUse { id, name, input } => {
                    Some(ToolCall::from_native(id, name, input.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// Returns `true` if the response contains any tool use requests.
    pub fn has_tool_calls(&self) -> bool {
        self.content
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolUse { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool_use(id: &str, name: &str) -> ContentBlock {
        ContentBlock::ToolUse {
            id: id.to_string(),
            name: name.to_string(),
            input: [("projectId".to_string(), json!("P1"))].into_iter().collect(),
        }
    }

    #[test]
    fn from_text_creates_text_only_response() {
        let response = LlmResponse::from_text("done");
        assert_eq!(response.text_content(), "done");
        assert!(!response.has_tool_calls());
        assert!(response.tool_calls().is_empty());
        assert_eq!(response.stop_reason, Some(StopReason::EndTurn));
    }

    #[test]
    fn tool_calls_preserve_emission_order() {
        let response = LlmResponse {
            content: vec![
                ContentBlock::text("好的，"),
                tool_use("call-1", "create_test_case"),
                tool_use("call-2", "query_test_cases"),
                ContentBlock::text("马上处理。"),
            ],
            stop_reason: Some(StopReason::ToolUse),
            model: Some("gemini".to_string()),
        };

        let calls = response.tool_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].tool_name, "create_test_case");
        assert_eq!(calls[0].native_id.as_deref(), Some("call-1"));
        assert_eq!(calls[1].tool_name, "query_test_cases");
        assert_eq!(response.text_content(), "好的，马上处理。");
    }
}
