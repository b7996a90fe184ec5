//! Store-backed tool executor, the concrete implementation of [`ToolExecutorPort`].
//!
//! # Execution Path
//!
//! ```text
//! ToolExecutorPort::execute()
//!   ├─ name not in spec?      → {error: "Unknown function"}      (store untouched)
//!   ├─ schema validation fails → {error: "参数错误: ..."}          (store untouched)
//!   └─ dispatch by name → handler
//!        ├─ Ok(payload)        → payload
//!        ├─ Err(ToolError)     → {error: "参数错误|执行失败: ..."}
//!        └─ panic              → {error: "执行失败: ..."}
//! ```

use super::{create, manage, query, statistics};
use async_trait::async_trait;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use testhub_application::{TestStore, ToolExecutorPort};
use testhub_domain::tool::{
    entities::{ToolCall, ToolSpec},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ToolError, ToolResult},
};
use tracing::{debug, error, warn};

/// Executor that runs tools against an injected [`TestStore`].
///
/// | Constructor | Tools |
/// |-------------|-------|
/// | [`new()`](Self::new) | The full catalogue from [`default_tool_spec()`](super::default_tool_spec) |
/// | [`with_tools()`](Self::with_tools) | Custom [`ToolSpec`] (testing / restricted setups) |
#[derive(Clone)]
pub struct StoreToolExecutor {
    tool_spec: ToolSpec,
    store: Arc<dyn TestStore>,
}

impl StoreToolExecutor {
    pub fn new(store: Arc<dyn TestStore>) -> Self {
        Self::with_tools(super::default_tool_spec(), store)
    }

    pub fn with_tools(tool_spec: ToolSpec, store: Arc<dyn TestStore>) -> Self {
        Self { tool_spec, store }
    }

    /// Route a validated call by exact name.
    async fn dispatch(&self, call: &ToolCall) -> Result<serde_json::Value, ToolError> {
        let store = self.store.as_ref();
        match call.tool_name.as_str() {
            query::QUERY_PROJECTS => query::execute_query_projects(store, call).await,
            query::QUERY_TEST_CASES => query::execute_query_test_cases(store, call).await,
            query::QUERY_REQUIREMENTS => query::execute_query_requirements(store, call).await,
            query::QUERY_DEFECTS => query::execute_query_defects(store, call).await,
            query::QUERY_TEST_PLANS => query::execute_query_test_plans(store, call).await,
            query::QUERY_USERS => query::execute_query_users(store, call).await,
            statistics::GET_STATISTICS => statistics::execute_get_statistics(store, call).await,
            create::CREATE_PROJECT => create::execute_create_project(store, call).await,
            create::CREATE_TEST_CASE => create::execute_create_test_case(store, call).await,
            create::CREATE_REQUIREMENT => create::execute_create_requirement(store, call).await,
            create::CREATE_DEFECT => create::execute_create_defect(store, call).await,
            create::CREATE_TEST_PLAN => create::execute_create_test_plan(store, call).await,
            manage::UPDATE_TEST_CASE => manage::execute_update_test_case(store, call).await,
            manage::DELETE_TEST_CASE => manage::execute_delete_test_case(store, call).await,
            manage::UPDATE_REQUIREMENT => manage::execute_update_requirement(store, call).await,
            manage::DELETE_REQUIREMENT => manage::execute_delete_requirement(store, call).await,
            manage::UPDATE_DEFECT => manage::execute_update_defect(store, call).await,
            manage::DELETE_DEFECT => manage::execute_delete_defect(store, call).await,
            // Declared in a custom spec but without a handler.
            _ => Err(ToolError::unknown_function()),
        }
    }
}

#[async_trait]
impl ToolExecutorPort for StoreToolExecutor {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let Some(definition) = self.tool_spec.get(&call.tool_name) else {
            warn!("Model requested unknown tool '{}'", call.tool_name);
            return ToolResult::failure(&call.tool_name, ToolError::unknown_function());
        };

        if let Err(e) = DefaultToolValidator.validate(call, definition) {
            warn!("Rejected {} call: {}", call.tool_name, e);
            return ToolResult::failure(&call.tool_name, ToolError::invalid_argument(e));
        }

        debug!("Executing tool {}", call.tool_name);
        match AssertUnwindSafe(self.dispatch(call)).catch_unwind().await {
            Ok(Ok(payload)) => ToolResult::new(&call.tool_name, payload),
            Ok(Err(e)) => {
                warn!("Tool {} failed: {}", call.tool_name, e);
                ToolResult::failure(&call.tool_name, e)
            }
            Err(_) => {
                error!("Tool {} panicked", call.tool_name);
                ToolResult::failure(
                    &call.tool_name,
                    ToolError::execution_failed("内部错误"),
                )
            }
        }
    }
}
