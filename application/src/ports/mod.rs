//! Port definitions (interfaces) for external dependencies
//!
//! Ports define how the application layer interacts with external systems.
//! Adapters in the infrastructure and presentation layers implement them.

pub mod llm_gateway;
pub mod progress;
pub mod test_store;
pub mod tool_executor;
pub mod tool_schema;
