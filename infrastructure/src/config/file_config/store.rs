//! Store configuration from TOML (`[store]` section)

use serde::{Deserialize, Serialize};

/// Raw store configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreConfig {
    /// Populate the in-memory store with a demo project at startup
    pub seed_demo_data: bool,
}
