//! Shared helpers for tool use cases.

use testhub_domain::tool::entities::ToolCall;
use testhub_domain::util::log_preview;

/// Extract a short preview string from tool call arguments for log lines.
///
/// Looks for the keys that identify what a call acts on first, then falls
/// back to the first string value found.
pub(crate) fn tool_args_preview(call: &ToolCall) -> String {
    let keys = ["searchTitle", "title", "name", "search", "id", "type"];
    for key in &keys {
        if let Some(serde_json::Value::String(s)) = call.arguments.get(*key) {
            return log_preview(s, 60);
        }
    }
    call.arguments
        .values()
        .find_map(|v| v.as_str())
        .map(|s| log_preview(s, 60))
        .unwrap_or_default()
}
