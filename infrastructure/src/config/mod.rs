//! Configuration file loading for testhub-assistant
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `GEMINI_API_KEY` and `TESTHUB_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./testhub.toml` or `./.testhub.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/testhub-assistant/config.toml`
//! 5. Default values

mod error;
mod file_config;
mod loader;

pub use error::ConfigError;
pub use file_config::{
    FileAgentConfig, FileConfig, FileModelConfig, FileServerConfig, FileStoreConfig,
};
pub use loader::ConfigLoader;
