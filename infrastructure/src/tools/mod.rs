//! Tool implementations for the assistant
//!
//! Every tool is one store operation. Definitions and handlers are grouped
//! by family:
//! - `query`: list projects, test cases, requirements, defects, plans, users
//! - `statistics`: aggregated counts and pass rate
//! - `create`: insert with defaults
//! - `manage`: update/delete by id or title fragment

pub mod create;
pub mod manage;
pub mod query;
pub mod statistics;

mod args;
mod executor;
mod params;
mod resolver;
mod schema;

pub use executor::StoreToolExecutor;
pub use resolver::TitleResolver;
pub use schema::JsonSchemaToolConverter;

use testhub_domain::tool::entities::ToolSpec;

/// Create the tool catalogue declared to the model.
pub fn default_tool_spec() -> ToolSpec {
    ToolSpec::new()
        .register(query::query_projects_definition())
        .register(query::query_test_cases_definition())
        .register(query::query_requirements_definition())
        .register(query::query_defects_definition())
        .register(query::query_test_plans_definition())
        .register(query::query_users_definition())
        .register(statistics::get_statistics_definition())
        .register(create::create_project_definition())
        .register(create::create_test_case_definition())
        .register(create::create_requirement_definition())
        .register(create::create_defect_definition())
        .register(create::create_test_plan_definition())
        .register(manage::update_test_case_definition())
        .register(manage::delete_test_case_definition())
        .register(manage::update_requirement_definition())
        .register(manage::delete_requirement_definition())
        .register(manage::update_defect_definition())
        .register(manage::delete_defect_definition())
}
