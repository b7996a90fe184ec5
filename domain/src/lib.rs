//! Domain layer for testhub-assistant
//!
//! This crate contains the pure types of the conversational assistant.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tools
//!
//! The model never touches the test-management store directly. It requests
//! named [`ToolCall`]s that are validated against a [`ToolSpec`] and answered
//! with a [`ToolResult`] carrying a JSON payload.
//!
//! ## Disambiguation
//!
//! Update and delete tools accept a title fragment instead of an id. The
//! [`DisambiguationOutcome`] captures whether the fragment named exactly one
//! entity, none, or several.
//!
//! ## Conversation
//!
//! The client resends the whole transcript on every request. A
//! [`ConversationTurn`] is one entry of that transcript after the client's
//! free-form role string has been collapsed to [`Role::User`] or [`Role::Assistant`].

pub mod conversation;
pub mod core;
pub mod disambiguation;
pub mod session;
pub mod testing;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use conversation::{ConversationTurn, Role, SessionContext};
pub use core::error::DomainError;
pub use disambiguation::{Candidate, DisambiguationOutcome, EntityKind, MAX_CANDIDATES};
pub use session::response::{ContentBlock, LlmResponse, StopReason};
pub use testing::{
    entities::{Defect, Project, Requirement, TestCase, TestPlan, TestStep, User},
    filter::{
        DefectFilter, ProjectFilter, RequirementFilter, TestCaseFilter, TestPlanFilter,
        UserFilter,
    },
    statistics::{DefectStats, Overview, RequirementStats, TestCaseStats, format_pass_rate},
    summary::{
        DefectSummary, ProjectSummary, RequirementSummary, TestCaseSummary, TestPlanSummary,
        UserSummary,
    },
    value_objects::{
        DefectStatus, Priority, RequirementStatus, Severity, StatisticsScope, TestCaseStatus,
        TestPlanStatus, UserRole,
    },
};
pub use tool::{
    entities::{ParamType, ToolCall, ToolDefinition, ToolParameter, ToolSpec},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ToolError, ToolResult},
};
