//! Gemini gateway
//!
//! Owns the HTTP client and credential; every chat request opens a fresh
//! [`GeminiSession`].

use super::session::GeminiSession;
use super::types::{self, GenerationConfig};
use async_trait::async_trait;
use std::time::Duration;
use testhub_application::{GatewayError, LlmGateway, LlmSession};
use testhub_domain::ConversationTurn;
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    pub model: String,
    pub api_base: String,
    pub api_key: Option<String>,
    pub temperature: Option<f32>,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            temperature: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GeminiConfig {
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }

    fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

pub struct GeminiGateway {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiGateway {
    /// Build the gateway. A missing credential is not an error here; it is
    /// reported per request by [`LlmGateway::ensure_ready`].
    pub fn new(config: GeminiConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Other(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

#[async_trait]
impl LlmGateway for GeminiGateway {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn ensure_ready(&self) -> Result<(), GatewayError> {
        self.config
            .credential()
            .map(|_| ())
            .ok_or(GatewayError::MissingCredential)
    }

    async fn create_session(
        &self,
        system_prompt: &str,
        history: &[ConversationTurn],
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        let api_key = self
            .config
            .credential()
            .ok_or(GatewayError::MissingCredential)?;

        let contents = types::history_contents(history);
        debug!(
            model = %self.config.model,
            history = contents.len(),
            "Opening Gemini session"
        );

        Ok(Box::new(GeminiSession::new(
            self.client.clone(),
            self.config.endpoint(),
            api_key.to_string(),
            self.config.model.clone(),
            system_prompt,
            GenerationConfig {
                temperature: self.config.temperature,
            },
            contents,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_format() {
        let config = GeminiConfig {
            api_base: "http://localhost:8080/v1beta/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_missing_or_blank_credential_not_ready() {
        let gateway = GeminiGateway::new(GeminiConfig::default()).unwrap();
        assert!(matches!(
            gateway.ensure_ready(),
            Err(GatewayError::MissingCredential)
        ));

        let gateway = GeminiGateway::new(GeminiConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert!(gateway.ensure_ready().is_err());
    }

    #[tokio::test]
    async fn test_create_session_requires_credential() {
        let gateway = GeminiGateway::new(GeminiConfig::default()).unwrap();
        let result = gateway.create_session("system", &[]).await;
        assert!(matches!(result, Err(GatewayError::MissingCredential)));

        let gateway = GeminiGateway::new(GeminiConfig {
            api_key: Some("key".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert!(gateway.ensure_ready().is_ok());
        assert!(gateway.create_session("system", &[]).await.is_ok());
        assert_eq!(gateway.model_name(), DEFAULT_MODEL);
    }
}
