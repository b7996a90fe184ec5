//! Progress notification port
//!
//! Lets the agent loop report what it is doing while a request is running.

use testhub_domain::tool::{entities::ToolCall, value_objects::ToolResult};

/// Callback for progress updates during the agent loop.
///
/// Calls arrive in dispatch order on the request's task. Implementations
/// live in the presentation layer (e.g. the HTTP stream writer).
pub trait ChatProgressNotifier: Send + Sync {
    /// Called right before a tool call is executed.
    fn on_tool_dispatch(&self, call: &ToolCall);

    /// Called after a tool call has produced its result.
    fn on_tool_result(&self, _call: &ToolCall, _result: &ToolResult) {}

    /// Called when a tool batch is about to be sent back to the model.
    fn on_batch_complete(&self, _turn: usize, _results: usize) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoChatProgress;

impl ChatProgressNotifier for NoChatProgress {
    fn on_tool_dispatch(&self, _call: &ToolCall) {}
}
