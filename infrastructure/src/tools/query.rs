//! Query tools: list projects, test cases, requirements, defects, test plans
//! and users.

use super::args::{HandlerResult, deserialize_limit, non_blank, parse_args, store_failure, to_payload};
use super::params;
use serde::Deserialize;
use testhub_application::TestStore;
use testhub_domain::{
    DefectFilter, DefectStatus, Priority, ProjectFilter, RequirementFilter, RequirementStatus,
    Severity, TestCaseFilter, TestCaseStatus, TestPlanFilter, TestPlanStatus, ToolCall,
    ToolDefinition, UserFilter, UserRole,
};

/// Tool name constants
pub const QUERY_PROJECTS: &str = "query_projects";
pub const QUERY_TEST_CASES: &str = "query_test_cases";
pub const QUERY_REQUIREMENTS: &str = "query_requirements";
pub const QUERY_DEFECTS: &str = "query_defects";
pub const QUERY_TEST_PLANS: &str = "query_test_plans";
pub const QUERY_USERS: &str = "query_users";

pub fn query_projects_definition() -> ToolDefinition {
    ToolDefinition::new(QUERY_PROJECTS, "查询项目列表")
        .with_parameter(params::search("项目名称或描述"))
        .with_parameter(params::limit(ProjectFilter::DEFAULT_LIMIT))
}

pub fn query_test_cases_definition() -> ToolDefinition {
    ToolDefinition::new(QUERY_TEST_CASES, "查询测试用例列表，可按项目、状态、优先级筛选")
        .with_parameter(params::project_id(false))
        .with_parameter(params::test_case_status(false))
        .with_parameter(params::priority(false))
        .with_parameter(params::search("标题或描述"))
        .with_parameter(params::limit(TestCaseFilter::DEFAULT_LIMIT))
}

pub fn query_requirements_definition() -> ToolDefinition {
    ToolDefinition::new(QUERY_REQUIREMENTS, "查询需求列表，可按项目、状态、优先级筛选")
        .with_parameter(params::project_id(false))
        .with_parameter(params::requirement_status(false))
        .with_parameter(params::priority(false))
        .with_parameter(params::search("标题或描述"))
        .with_parameter(params::limit(RequirementFilter::DEFAULT_LIMIT))
}

pub fn query_defects_definition() -> ToolDefinition {
    ToolDefinition::new(QUERY_DEFECTS, "查询缺陷列表，可按项目、状态、严重程度筛选")
        .with_parameter(params::project_id(false))
        .with_parameter(params::defect_status(false))
        .with_parameter(params::severity(false))
        .with_parameter(params::search("标题或描述"))
        .with_parameter(params::limit(DefectFilter::DEFAULT_LIMIT))
}

pub fn query_test_plans_definition() -> ToolDefinition {
    ToolDefinition::new(QUERY_TEST_PLANS, "查询测试计划列表")
        .with_parameter(params::project_id(false))
        .with_parameter(params::test_plan_status(false))
        .with_parameter(params::search("计划名称或描述"))
        .with_parameter(params::limit(TestPlanFilter::DEFAULT_LIMIT))
}

pub fn query_users_definition() -> ToolDefinition {
    ToolDefinition::new(QUERY_USERS, "查询用户列表，可用于查找负责人或指派对象")
        .with_parameter(params::role())
        .with_parameter(params::search("姓名或邮箱"))
        .with_parameter(params::limit(UserFilter::DEFAULT_LIMIT))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct QueryProjectsArgs {
    search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_limit")]
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct QueryTestCasesArgs {
    project_id: Option<String>,
    status: Option<TestCaseStatus>,
    priority: Option<Priority>,
    search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_limit")]
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct QueryRequirementsArgs {
    project_id: Option<String>,
    status: Option<RequirementStatus>,
    priority: Option<Priority>,
    search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_limit")]
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct QueryDefectsArgs {
    project_id: Option<String>,
    status: Option<DefectStatus>,
    severity: Option<Severity>,
    search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_limit")]
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct QueryTestPlansArgs {
    project_id: Option<String>,
    status: Option<TestPlanStatus>,
    search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_limit")]
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct QueryUsersArgs {
    role: Option<UserRole>,
    search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_limit")]
    limit: Option<usize>,
}

pub async fn execute_query_projects(store: &dyn TestStore, call: &ToolCall) -> HandlerResult {
    let args: QueryProjectsArgs = parse_args(call)?;
    let filter = ProjectFilter {
        search: non_blank(args.search),
        limit: args.limit.unwrap_or(ProjectFilter::DEFAULT_LIMIT),
    };
    let projects = store.list_projects(&filter).await.map_err(store_failure)?;
    to_payload(&projects)
}

pub async fn execute_query_test_cases(store: &dyn TestStore, call: &ToolCall) -> HandlerResult {
    let args: QueryTestCasesArgs = parse_args(call)?;
    let filter = TestCaseFilter {
        project_id: non_blank(args.project_id),
        status: args.status,
        priority: args.priority,
        search: non_blank(args.search),
        limit: args.limit.unwrap_or(TestCaseFilter::DEFAULT_LIMIT),
    };
    let cases = store.list_test_cases(&filter).await.map_err(store_failure)?;
    to_payload(&cases)
}

pub async fn execute_query_requirements(store: &dyn TestStore, call: &ToolCall) -> HandlerResult {
    let args: QueryRequirementsArgs = parse_args(call)?;
    let filter = RequirementFilter {
        project_id: non_blank(args.project_id),
        status: args.status,
        priority: args.priority,
        search: non_blank(args.search),
        limit: args.limit.unwrap_or(RequirementFilter::DEFAULT_LIMIT),
    };
    let requirements = store
        .list_requirements(&filter)
        .await
        .map_err(store_failure)?;
    to_payload(&requirements)
}

pub async fn execute_query_defects(store: &dyn TestStore, call: &ToolCall) -> HandlerResult {
    let args: QueryDefectsArgs = parse_args(call)?;
    let filter = DefectFilter {
        project_id: non_blank(args.project_id),
        status: args.status,
        severity: args.severity,
        search: non_blank(args.search),
        limit: args.limit.unwrap_or(DefectFilter::DEFAULT_LIMIT),
    };
    let defects = store.list_defects(&filter).await.map_err(store_failure)?;
    to_payload(&defects)
}

pub async fn execute_query_test_plans(store: &dyn TestStore, call: &ToolCall) -> HandlerResult {
    let args: QueryTestPlansArgs = parse_args(call)?;
    let filter = TestPlanFilter {
        project_id: non_blank(args.project_id),
        status: args.status,
        search: non_blank(args.search),
        limit: args.limit.unwrap_or(TestPlanFilter::DEFAULT_LIMIT),
    };
    let plans = store.list_test_plans(&filter).await.map_err(store_failure)?;
    to_payload(&plans)
}

pub async fn execute_query_users(store: &dyn TestStore, call: &ToolCall) -> HandlerResult {
    let args: QueryUsersArgs = parse_args(call)?;
    let filter = UserFilter {
        role: args.role,
        search: non_blank(args.search),
        limit: args.limit.unwrap_or(UserFilter::DEFAULT_LIMIT),
    };
    let users = store.list_users(&filter).await.map_err(store_failure)?;
    to_payload(&users)
}
