//! LLM Gateway port
//!
//! Defines the interface for communicating with the model provider.

use async_trait::async_trait;
use testhub_domain::{ConversationTurn, LlmResponse};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Model credential is not configured")]
    MissingCredential,

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// One tool outcome reported back to the model.
///
/// `response` stays a JSON value until the adapter writes the provider's
/// wire format.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResultMessage {
    /// Id of the tool-use block this answers.
    pub call_id: String,
    pub tool_name: String,
    pub response: serde_json::Value,
}

/// Gateway for LLM communication
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Identifier of the model sessions are opened against.
    fn model_name(&self) -> &str;

    /// Fail fast when the gateway cannot possibly serve a request
    /// (e.g. no credential). Called before any response is streamed.
    fn ensure_ready(&self) -> Result<(), GatewayError>;

    /// Open a session seeded with system instructions and prior turns.
    async fn create_session(
        &self,
        system_prompt: &str,
        history: &[ConversationTurn],
    ) -> Result<Box<dyn LlmSession>, GatewayError>;
}

/// An active LLM session
///
/// A session accumulates the exchange so far; every call sends the whole
/// conversation plus the new turn.
#[async_trait]
pub trait LlmSession: Send + Sync {
    /// Send a user turn with the declared tool catalogue.
    async fn send_with_tools(
        &self,
        content: &str,
        tools: &[serde_json::Value],
    ) -> Result<LlmResponse, GatewayError>;

    /// Send the results of one tool batch as a single follow-up turn.
    async fn send_tool_results(
        &self,
        results: &[ToolResultMessage],
    ) -> Result<LlmResponse, GatewayError>;
}
