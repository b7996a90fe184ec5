//! Agent loop configuration from TOML (`[agent]` section)

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use testhub_application::ExecutionParams;

/// Raw agent configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// max_tool_turns = 10     # model⇄tool round-trips before giving up
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub max_tool_turns: usize,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            max_tool_turns: ExecutionParams::default().max_tool_turns,
        }
    }
}

impl FileAgentConfig {
    pub fn to_execution_params(&self) -> ExecutionParams {
        ExecutionParams::default().with_max_tool_turns(self.max_tool_turns)
    }

    pub(super) fn validate(&self) -> Vec<ConfigError> {
        if self.max_tool_turns == 0 {
            vec![ConfigError::invalid(
                "agent.max_tool_turns",
                "must be at least 1",
            )]
        } else {
            vec![]
        }
    }
}
