//! Run Chat use case.
//!
//! Drives one assistant request: open a session from the client transcript,
//! then alternate model turns and tool batches until the model answers in
//! plain text.
//!
//! ```text
//! AWAITING_MODEL ──tool calls──▶ EXECUTING_TOOLS ──one results turn──▶ AWAITING_MODEL
//!        │                                                                  
//!        └──no tool calls──▶ DONE (text is the answer)
//! ```
//!
//! Calls within a batch run strictly one after another in the order the
//! model emitted them, since a later call may depend on what an earlier one
//! changed. The number of batches is capped by
//! [`ExecutionParams::max_tool_turns`].

use crate::config::ExecutionParams;
use crate::ports::llm_gateway::{GatewayError, LlmGateway, ToolResultMessage};
use crate::ports::progress::ChatProgressNotifier;
use crate::ports::tool_executor::ToolExecutorPort;
use crate::ports::tool_schema::ToolSchemaPort;
use crate::use_cases::build_session::{ChatMessage, SessionBuildError, build_session};
use crate::use_cases::tool_helpers::tool_args_preview;
use std::sync::Arc;
use testhub_domain::SessionContext;
use testhub_domain::util::log_preview;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Answer returned when the model is still asking for tools after the
/// configured number of batches.
pub const TURN_LIMIT_ANSWER: &str =
    "抱歉，这个请求需要执行的操作过多，无法在限定步骤内完成。请尝试把需求拆分成更小的步骤后重试。";

/// Errors that abort a chat request.
///
/// Tool failures are not errors here; they are fed back to the model.
#[derive(Error, Debug)]
pub enum RunChatError {
    #[error(transparent)]
    Session(#[from] SessionBuildError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("No response from model")]
    EmptyResponse,
}

/// Input for the [`RunChatUseCase`].
#[derive(Debug, Clone)]
pub struct RunChatInput {
    /// Full client transcript; the last entry opens this request.
    pub messages: Vec<ChatMessage>,
    pub context: SessionContext,
    pub execution: ExecutionParams,
}

impl RunChatInput {
    pub fn new(messages: Vec<ChatMessage>, context: SessionContext) -> Self {
        Self {
            messages,
            context,
            execution: ExecutionParams::default(),
        }
    }

    pub fn with_execution(mut self, execution: ExecutionParams) -> Self {
        self.execution = execution;
        self
    }
}

/// How the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatStop {
    /// The model answered in plain text.
    Completed,
    /// The model was still requesting tools when the batch cap was hit.
    TurnLimitReached,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunChatOutput {
    pub answer: String,
    pub stop: ChatStop,
    /// Number of tool batches executed.
    pub tool_turns: usize,
}

/// Use case for running the assistant's agent loop.
#[derive(Clone)]
pub struct RunChatUseCase {
    gateway: Arc<dyn LlmGateway>,
    tool_executor: Arc<dyn ToolExecutorPort>,
    tool_schema: Arc<dyn ToolSchemaPort>,
}

impl RunChatUseCase {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        tool_executor: Arc<dyn ToolExecutorPort>,
        tool_schema: Arc<dyn ToolSchemaPort>,
    ) -> Self {
        Self {
            gateway,
            tool_executor,
            tool_schema,
        }
    }

    /// Pre-flight check performed before a response stream is opened.
    pub fn ensure_ready(&self) -> Result<(), GatewayError> {
        self.gateway.ensure_ready()
    }

    pub fn model_name(&self) -> &str {
        self.gateway.model_name()
    }

    pub fn tool_count(&self) -> usize {
        self.tool_executor.tool_spec().len()
    }

    /// Run the loop to completion.
    pub async fn execute(
        &self,
        input: RunChatInput,
        progress: &dyn ChatProgressNotifier,
    ) -> Result<RunChatOutput, RunChatError> {
        let plan = build_session(&input.messages, &input.context)?;
        info!(
            "Starting chat ({} prior turns): {}",
            plan.history.len(),
            log_preview(&plan.latest, 100)
        );

        let session = self
            .gateway
            .create_session(&plan.system_prompt, &plan.history)
            .await?;

        let tools = self
            .tool_schema
            .all_tools_schema(self.tool_executor.tool_spec());
        debug!("Chat: {} tools declared", tools.len());

        let mut response = session.send_with_tools(&plan.latest, &tools).await?;

        let max_turns = input.execution.max_tool_turns;
        let mut turn_count = 0;

        loop {
            let tool_calls = response.tool_calls();
            if tool_calls.is_empty() {
                break;
            }

            if turn_count >= max_turns {
                warn!(
                    "Chat tool loop exceeded max_tool_turns ({}); {} pending calls dropped",
                    max_turns,
                    tool_calls.len()
                );
                return Ok(RunChatOutput {
                    answer: TURN_LIMIT_ANSWER.to_string(),
                    stop: ChatStop::TurnLimitReached,
                    tool_turns: turn_count,
                });
            }
            turn_count += 1;

            let mut tool_result_messages = Vec::with_capacity(tool_calls.len());
            for (index, call) in tool_calls.iter().enumerate() {
                debug!(
                    "Tool turn {}: dispatching {} ({})",
                    turn_count,
                    call.tool_name,
                    tool_args_preview(call)
                );
                progress.on_tool_dispatch(call);

                let result = self.tool_executor.execute(call).await;
                if let Some(message) = result.error_message() {
                    debug!("Tool {} reported error: {}", call.tool_name, message);
                }
                progress.on_tool_result(call, &result);

                tool_result_messages.push(ToolResultMessage {
                    call_id: call
                        .native_id
                        .clone()
                        .unwrap_or_else(|| format!("call-{}", index + 1)),
                    tool_name: call.tool_name.clone(),
                    response: result.response,
                });
            }

            debug!(
                "Tool turn {}/{}: sending {} tool results",
                turn_count,
                max_turns,
                tool_result_messages.len()
            );
            progress.on_batch_complete(turn_count, tool_result_messages.len());

            response = session.send_tool_results(&tool_result_messages).await?;
        }

        let answer = response.text_content();
        if answer.trim().is_empty() {
            return Err(RunChatError::EmptyResponse);
        }

        info!("Chat completed in {} tool turns", turn_count);

        Ok(RunChatOutput {
            answer,
            stop: ChatStop::Completed,
            tool_turns: turn_count,
        })
    }
}
