//! Model provider configuration from TOML (`[model]` section)

use crate::providers::gemini::{DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_TIMEOUT, GeminiConfig};
use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw model configuration from TOML
///
/// # Example
///
/// ```toml
/// [model]
/// name = "gemini-2.0-flash"
/// request_timeout_secs = 60
/// temperature = 0.2
/// ```
///
/// The credential is normally supplied through `GEMINI_API_KEY` rather than
/// written to a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    pub name: String,
    pub api_base: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            request_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            temperature: None,
        }
    }
}

impl FileModelConfig {
    pub fn to_gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            model: self.name.clone(),
            api_base: self.api_base.clone(),
            api_key: self.api_key.clone(),
            temperature: self.temperature,
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub(super) fn validate(&self) -> Vec<ConfigError> {
        let mut issues = Vec::new();
        if self.name.trim().is_empty() {
            issues.push(ConfigError::invalid("model.name", "must not be empty"));
        }
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            issues.push(ConfigError::invalid(
                "model.api_base",
                format!("'{}' is not an http(s) URL", self.api_base),
            ));
        }
        if self.request_timeout_secs == 0 {
            issues.push(ConfigError::invalid(
                "model.request_timeout_secs",
                "must be at least 1",
            ));
        }
        if let Some(t) = self.temperature.filter(|t| !(0.0..=2.0).contains(t)) {
            issues.push(ConfigError::invalid(
                "model.temperature",
                format!("{} is outside 0.0..=2.0", t),
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_gemini_config() {
        let config = FileModelConfig {
            api_key: Some("key".to_string()),
            request_timeout_secs: 30,
            ..Default::default()
        };
        let gemini = config.to_gemini_config();
        assert_eq!(gemini.model, DEFAULT_MODEL);
        assert_eq!(gemini.api_key.as_deref(), Some("key"));
        assert_eq!(gemini.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = FileModelConfig {
            name: " ".to_string(),
            api_base: "ftp://example.com".to_string(),
            request_timeout_secs: 0,
            temperature: Some(3.5),
            ..Default::default()
        };
        assert_eq!(config.validate().len(), 4);
        assert!(FileModelConfig::default().validate().is_empty());
    }
}
