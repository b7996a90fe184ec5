//! Execution parameters: agent loop control.
//!
//! [`ExecutionParams`] groups the static parameters that bound the tool loop
//! in [`RunChatUseCase`](crate::use_cases::run_chat::RunChatUseCase).

use serde::{Deserialize, Serialize};

/// Agent loop control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Maximum number of tool batches executed for one request. A model that
    /// keeps asking for tools after this many batches gets no more.
    pub max_tool_turns: usize,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self { max_tool_turns: 10 }
    }
}

impl ExecutionParams {
    pub fn with_max_tool_turns(mut self, max: usize) -> Self {
        self.max_tool_turns = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        assert_eq!(ExecutionParams::default().max_tool_turns, 10);
    }

    #[test]
    fn test_builder() {
        let params = ExecutionParams::default().with_max_tool_turns(3);
        assert_eq!(params.max_tool_turns, 3);
    }
}
