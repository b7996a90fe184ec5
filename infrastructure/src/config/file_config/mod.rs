//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to adapter or application
//! types at the composition root.

mod agent;
mod model;
mod server;
mod store;

pub use agent::FileAgentConfig;
pub use model::FileModelConfig;
pub use server::FileServerConfig;
pub use store::FileStoreConfig;

use super::ConfigError;
use serde::{Deserialize, Serialize};

const MASK: &str = "********";

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// HTTP listener
    pub server: FileServerConfig,
    /// Model provider settings
    pub model: FileModelConfig,
    /// Agent loop settings
    pub agent: FileAgentConfig,
    /// Test store settings
    pub store: FileStoreConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut issues = self.model.validate();
        issues.extend(self.agent.validate());
        issues
    }

    /// Render as TOML with the credential masked (for `--show-config`).
    pub fn to_masked_toml(&self) -> Result<String, ConfigError> {
        let mut shown = self.clone();
        if shown.model.api_key.is_some() {
            shown.model.api_key = Some(MASK.to_string());
        }
        Ok(toml::to_string_pretty(&shown)?)
    }
}
