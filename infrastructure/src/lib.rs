//! Infrastructure layer for testhub-assistant
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the tool catalogue and executor, the Gemini
//! model provider, the in-memory test store and configuration loading.

pub mod config;
pub mod providers;
pub mod store;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigLoader, FileAgentConfig, FileConfig, FileModelConfig, FileServerConfig,
    FileStoreConfig,
};
pub use providers::gemini::{GeminiConfig, GeminiGateway};
pub use store::InMemoryTestStore;
pub use tools::{JsonSchemaToolConverter, StoreToolExecutor, TitleResolver, default_tool_spec};
