//! Gemini LLM session implementation
//!
//! `generateContent` is stateless, so the session keeps the conversation
//! locally and sends all of it on every call.

use super::types::{
    self, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};
use async_trait::async_trait;
use serde_json::Value;
use testhub_application::{GatewayError, LlmSession, ToolResultMessage};
use testhub_domain::LlmResponse;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Default)]
struct Transcript {
    contents: Vec<Content>,
    /// Declared on the first `send_with_tools` and reused for follow-ups.
    tools: Vec<Value>,
    /// Last synthesized call id.
    call_seq: usize,
}

pub struct GeminiSession {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    system_instruction: Content,
    generation_config: GenerationConfig,
    transcript: Mutex<Transcript>,
}

impl GeminiSession {
    pub fn new(
        client: reqwest::Client,
        endpoint: String,
        api_key: String,
        model: String,
        system_prompt: &str,
        generation_config: GenerationConfig,
        history: Vec<Content>,
    ) -> Self {
        Self {
            client,
            endpoint,
            api_key,
            model,
            system_instruction: Content::system(system_prompt),
            generation_config,
            transcript: Mutex::new(Transcript {
                contents: history,
                ..Default::default()
            }),
        }
    }

    async fn generate(
        &self,
        contents: &[Content],
        tools: &[Value],
    ) -> Result<GenerateContentResponse, GatewayError> {
        let request = GenerateContentRequest {
            contents,
            system_instruction: Some(&self.system_instruction),
            tools,
            generation_config: Some(&self.generation_config),
        };

        debug!(
            model = %self.model,
            contents = contents.len(),
            tools = tools.len(),
            "Calling Gemini generateContent"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| types::convert_transport_error(&e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| types::convert_transport_error(&e))?;

        if !(200..300).contains(&status) {
            return Err(types::convert_http_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            GatewayError::InvalidResponse(format!("Failed to parse Gemini response: {}", e))
        })
    }

    /// Send `turn` after the history. Both the turn and the model's reply are
    /// appended only once the call succeeds.
    async fn exchange(&self, turn: Content) -> Result<LlmResponse, GatewayError> {
        let mut transcript = self.transcript.lock().await;

        let mut contents = transcript.contents.clone();
        contents.push(turn);
        let raw = self.generate(&contents, &transcript.tools).await?;

        let mut call_seq = transcript.call_seq;
        let (response, model_content) = types::convert_response(raw, &self.model, &mut call_seq)?;

        contents.push(model_content);
        transcript.contents = contents;
        transcript.call_seq = call_seq;
        Ok(response)
    }
}

#[async_trait]
impl LlmSession for GeminiSession {
    async fn send_with_tools(
        &self,
        content: &str,
        tools: &[Value],
    ) -> Result<LlmResponse, GatewayError> {
        {
            let mut transcript = self.transcript.lock().await;
            transcript.tools = types::tool_declarations(tools);
        }
        self.exchange(Content::user_text(content)).await
    }

    async fn send_tool_results(
        &self,
        results: &[ToolResultMessage],
    ) -> Result<LlmResponse, GatewayError> {
        debug!("Sending {} tool results", results.len());
        self.exchange(types::function_responses(results)).await
    }
}
