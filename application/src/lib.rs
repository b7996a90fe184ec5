//! Application layer for testhub-assistant
//!
//! This crate contains the agent-loop use case, the session builder, port
//! definitions and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    llm_gateway::{GatewayError, LlmGateway, LlmSession, ToolResultMessage},
    progress::{ChatProgressNotifier, NoChatProgress},
    test_store::{
        DefectPatch, NewDefect, NewProject, NewRequirement, NewTestCase, NewTestPlan, NewTestStep,
        RequirementPatch, StoreError, TestCasePatch, TestStore,
    },
    tool_executor::ToolExecutorPort,
    tool_schema::ToolSchemaPort,
};
pub use use_cases::build_session::{ChatMessage, SessionBuildError, SessionPlan, build_session};
pub use use_cases::run_chat::{
    ChatStop, RunChatError, RunChatInput, RunChatOutput, RunChatUseCase, TURN_LIMIT_ANSWER,
};
