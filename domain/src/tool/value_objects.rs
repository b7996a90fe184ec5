//! Tool domain value objects: result and error types
//!
//! Every tool execution produces a [`ToolResult`] whose `response` is the JSON
//! payload handed back to the model. The payload stays a typed
//! [`serde_json::Value`] until the provider adapter puts it on the wire.

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Error that occurred while dispatching or running a tool.
///
/// The message is already phrased for the model; it becomes the `error`
/// field of the failure payload verbatim.
///
/// | Code | Raised when |
/// |------|-------------|
/// | `UNKNOWN_FUNCTION` | The name is not in the registry |
/// | `INVALID_ARGUMENT` | Schema validation or typed decoding failed |
/// | `EXECUTION_FAILED` | The store returned an error |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "INVALID_ARGUMENT")
    pub code: String,
    /// Message reported to the model
    pub message: String,
}

impl ToolError {
    pub const UNKNOWN_FUNCTION: &'static str = "UNKNOWN_FUNCTION";
    pub const INVALID_ARGUMENT: &'static str = "INVALID_ARGUMENT";
    pub const EXECUTION_FAILED: &'static str = "EXECUTION_FAILED";

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn unknown_function() -> Self {
        Self::new(Self::UNKNOWN_FUNCTION, "Unknown function")
    }

    pub fn invalid_argument(detail: impl std::fmt::Display) -> Self {
        Self::new(Self::INVALID_ARGUMENT, format!("参数错误: {}", detail))
    }

    pub fn execution_failed(detail: impl std::fmt::Display) -> Self {
        Self::new(Self::EXECUTION_FAILED, format!("执行失败: {}", detail))
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ToolError {}

/// Result of a tool execution.
///
/// Always present, even on failure: failure payloads carry an `error` field
/// instead of the executor returning `Err`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was executed
    pub tool_name: String,
    /// JSON payload returned to the model
    pub response: serde_json::Value,
}

impl ToolResult {
    pub fn new(tool_name: impl Into<String>, response: serde_json::Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            response,
        }
    }

    /// Create a failure result `{ "error": <message> }`
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self::new(tool_name, json!({ "error": error.message }))
    }

    /// Whether the payload reports an error (executor failure or a
    /// `success: false` business outcome).
    pub fn is_error(&self) -> bool {
        self.response.get("error").is_some()
    }

    pub fn is_success(&self) -> bool {
        !self.is_error()
            && self
                .response
                .get("success")
                .and_then(|v| v.as_bool())
                .unwrap_or(true)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.response.get("error").and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_function_payload() {
        let result = ToolResult::failure("drop_database", ToolError::unknown_function());
        assert_eq!(result.response, json!({ "error": "Unknown function" }));
        assert!(result.is_error());
        assert!(!result.is_success());
    }

    #[test]
    fn test_execution_failed_prefix() {
        let err = ToolError::execution_failed("connection reset");
        assert_eq!(err.message, "执行失败: connection reset");
        assert_eq!(err.code, ToolError::EXECUTION_FAILED);
    }

    #[test]
    fn test_business_failure_is_not_success() {
        let result = ToolResult::new(
            "update_test_case",
            json!({ "success": false, "error": "未找到", "suggestion": "..." }),
        );
        assert!(!result.is_success());
        assert_eq!(result.error_message(), Some("未找到"));
    }

    #[test]
    fn test_plain_payload_is_success() {
        let result = ToolResult::new("query_projects", json!([{ "id": "P1" }]));
        assert!(result.is_success());
        assert!(result.error_message().is_none());
    }
}
