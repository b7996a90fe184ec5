//! Tool domain module
//!
//! This module defines the catalogue of operations the assistant may ask for,
//! how a request for one of them looks, and what comes back.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (registry)   │    │ (invocation) │    │ (JSON reply) │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! # Validation Before Dispatch
//!
//! Models are expected, not guaranteed, to emit well-formed arguments. Every
//! call is checked by a [`ToolValidator`] against its [`ToolDefinition`]
//! before any handler runs: required parameters present, no unknown
//! parameters, JSON types matching, and enum values inside their closed set.
//!
//! # Failure Is Data
//!
//! A [`ToolResult`] is always produced, even on failure. Failures carry an
//! `error` field in the JSON payload so the model can react conversationally.
//!
//! # Architecture
//!
//! - **Domain** (this module): Pure definitions, no I/O
//! - **Application** (`ToolExecutorPort`): Port trait for tool execution
//! - **Infrastructure** (`StoreToolExecutor`): Dispatch onto the test-management store

pub mod entities;
pub mod traits;
pub mod value_objects;

pub use entities::{ParamType, ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ToolError, ToolResult};
