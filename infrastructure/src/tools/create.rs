//! Create tools. Defaults are applied here, before the store is called.

use super::args::{HandlerResult, non_blank, parse_args, store_failure, to_payload};
use super::params;
use serde::Deserialize;
use serde_json::json;
use testhub_application::{
    NewDefect, NewProject, NewRequirement, NewTestCase, NewTestPlan, NewTestStep, TestStore,
};
use testhub_domain::{
    DefectStatus, ParamType, Priority, RequirementStatus, Severity, TestCaseStatus,
    TestPlanStatus, ToolCall, ToolDefinition, ToolParameter,
};

/// Tool name constants
pub const CREATE_PROJECT: &str = "create_project";
pub const CREATE_TEST_CASE: &str = "create_test_case";
pub const CREATE_REQUIREMENT: &str = "create_requirement";
pub const CREATE_DEFECT: &str = "create_defect";
pub const CREATE_TEST_PLAN: &str = "create_test_plan";

pub fn create_project_definition() -> ToolDefinition {
    ToolDefinition::new(CREATE_PROJECT, "创建新项目")
        .with_parameter(ToolParameter::new("name", "项目名称", true))
        .with_parameter(ToolParameter::new("description", "项目描述", false))
        .with_parameter(ToolParameter::new(
            "ownerId",
            "负责人用户ID（默认当前用户）",
            false,
        ))
}

pub fn create_test_case_definition() -> ToolDefinition {
    ToolDefinition::new(
        CREATE_TEST_CASE,
        "创建测试用例。优先级默认 P2，状态默认 UNTESTED",
    )
    .with_parameter(params::project_id(true))
    .with_parameter(ToolParameter::new("title", "用例标题", true))
    .with_parameter(ToolParameter::new("description", "用例描述", false))
    .with_parameter(ToolParameter::new("precondition", "前置条件", false))
    .with_parameter(
        ToolParameter::new(
            "steps",
            "测试步骤列表，每项为 {action, expected} 或一句步骤描述",
            false,
        )
        .with_type(ParamType::Array {
            item_fields: vec!["action".to_string(), "expected".to_string()],
        }),
    )
    .with_parameter(params::priority(false))
    .with_parameter(params::test_case_status(false))
    .with_parameter(ToolParameter::new(
        "creatorId",
        "创建人用户ID（默认当前用户）",
        false,
    ))
}

pub fn create_requirement_definition() -> ToolDefinition {
    ToolDefinition::new(CREATE_REQUIREMENT, "创建需求。优先级默认 P2，状态默认 DRAFT")
        .with_parameter(params::project_id(true))
        .with_parameter(ToolParameter::new("title", "需求标题", true))
        .with_parameter(ToolParameter::new("description", "需求描述", false))
        .with_parameter(params::priority(false))
        .with_parameter(params::requirement_status(false))
        .with_parameter(ToolParameter::new(
            "creatorId",
            "创建人用户ID（默认当前用户）",
            false,
        ))
}

pub fn create_defect_definition() -> ToolDefinition {
    ToolDefinition::new(
        CREATE_DEFECT,
        "提交缺陷。严重程度默认 MEDIUM，优先级默认 P2，状态默认 OPEN",
    )
    .with_parameter(params::project_id(true))
    .with_parameter(ToolParameter::new("title", "缺陷标题", true))
    .with_parameter(ToolParameter::new("description", "缺陷描述与复现步骤", false))
    .with_parameter(params::severity(false))
    .with_parameter(params::priority(false))
    .with_parameter(params::defect_status(false))
    .with_parameter(ToolParameter::new("testCaseId", "关联的测试用例ID", false))
    .with_parameter(ToolParameter::new("assigneeId", "指派给的用户ID", false))
    .with_parameter(ToolParameter::new(
        "reporterId",
        "报告人用户ID（默认当前用户）",
        false,
    ))
}

pub fn create_test_plan_definition() -> ToolDefinition {
    ToolDefinition::new(CREATE_TEST_PLAN, "创建测试计划。状态默认 DRAFT")
        .with_parameter(params::project_id(true))
        .with_parameter(ToolParameter::new("name", "计划名称", true))
        .with_parameter(ToolParameter::new("description", "计划描述", false))
        .with_parameter(params::test_plan_status(false))
        .with_parameter(ToolParameter::new(
            "creatorId",
            "创建人用户ID（默认当前用户）",
            false,
        ))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct CreateProjectArgs {
    name: String,
    description: Option<String>,
    owner_id: Option<String>,
}

/// A step given either as `{action, expected}` or as a bare sentence.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StepArg {
    Text(String),
    Detailed(DetailedStep),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DetailedStep {
    action: String,
    expected: Option<String>,
}

impl StepArg {
    fn into_new_step(self) -> Option<NewTestStep> {
        let (action, expected) = match self {
            StepArg::Text(action) => (action, None),
            StepArg::Detailed(step) => (step.action, non_blank(step.expected)),
        };
        let action = action.trim().to_string();
        (!action.is_empty()).then_some(NewTestStep { action, expected })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct CreateTestCaseArgs {
    project_id: String,
    title: String,
    description: Option<String>,
    precondition: Option<String>,
    #[serde(default)]
    steps: Vec<StepArg>,
    priority: Option<Priority>,
    status: Option<TestCaseStatus>,
    creator_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct CreateRequirementArgs {
    project_id: String,
    title: String,
    description: Option<String>,
    priority: Option<Priority>,
    status: Option<RequirementStatus>,
    creator_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct CreateDefectArgs {
    project_id: String,
    title: String,
    description: Option<String>,
    severity: Option<Severity>,
    priority: Option<Priority>,
    status: Option<DefectStatus>,
    test_case_id: Option<String>,
    assignee_id: Option<String>,
    reporter_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct CreateTestPlanArgs {
    project_id: String,
    name: String,
    description: Option<String>,
    status: Option<TestPlanStatus>,
    creator_id: Option<String>,
}

pub async fn execute_create_project(store: &dyn TestStore, call: &ToolCall) -> HandlerResult {
    let args: CreateProjectArgs = parse_args(call)?;
    let project = store
        .create_project(NewProject {
            name: args.name,
            description: non_blank(args.description),
            owner_id: non_blank(args.owner_id),
        })
        .await
        .map_err(store_failure)?;

    let message = format!("项目「{}」创建成功", project.name);
    Ok(json!({ "success": true, "project": to_payload(&project)?, "message": message }))
}

pub async fn execute_create_test_case(store: &dyn TestStore, call: &ToolCall) -> HandlerResult {
    let args: CreateTestCaseArgs = parse_args(call)?;
    let case = store
        .create_test_case(NewTestCase {
            project_id: args.project_id,
            title: args.title,
            description: non_blank(args.description),
            precondition: non_blank(args.precondition),
            steps: args
                .steps
                .into_iter()
                .filter_map(StepArg::into_new_step)
                .collect(),
            priority: args.priority.unwrap_or_default(),
            status: args.status.unwrap_or_default(),
            creator_id: non_blank(args.creator_id),
        })
        .await
        .map_err(store_failure)?;

    let message = format!(
        "测试用例「{}」创建成功，包含 {} 个步骤",
        case.title,
        case.steps.len()
    );
    Ok(json!({ "success": true, "testCase": to_payload(&case)?, "message": message }))
}

pub async fn execute_create_requirement(store: &dyn TestStore, call: &ToolCall) -> HandlerResult {
    let args: CreateRequirementArgs = parse_args(call)?;
    let requirement = store
        .create_requirement(NewRequirement {
            project_id: args.project_id,
            title: args.title,
            description: non_blank(args.description),
            priority: args.priority.unwrap_or_default(),
            status: args.status.unwrap_or_default(),
            creator_id: non_blank(args.creator_id),
        })
        .await
        .map_err(store_failure)?;

    let message = format!("需求「{}」创建成功", requirement.title);
    Ok(json!({ "success": true, "requirement": to_payload(&requirement)?, "message": message }))
}

pub async fn execute_create_defect(store: &dyn TestStore, call: &ToolCall) -> HandlerResult {
    let args: CreateDefectArgs = parse_args(call)?;
    let defect = store
        .create_defect(NewDefect {
            project_id: args.project_id,
            title: args.title,
            description: non_blank(args.description),
            severity: args.severity.unwrap_or_default(),
            priority: args.priority.unwrap_or_default(),
            status: args.status.unwrap_or_default(),
            test_case_id: non_blank(args.test_case_id),
            assignee_id: non_blank(args.assignee_id),
            reporter_id: non_blank(args.reporter_id),
        })
        .await
        .map_err(store_failure)?;

    let message = format!("缺陷「{}」已提交", defect.title);
    Ok(json!({ "success": true, "defect": to_payload(&defect)?, "message": message }))
}

pub async fn execute_create_test_plan(store: &dyn TestStore, call: &ToolCall) -> HandlerResult {
    let args: CreateTestPlanArgs = parse_args(call)?;
    let plan = store
        .create_test_plan(NewTestPlan {
            project_id: args.project_id,
            name: args.name,
            description: non_blank(args.description),
            status: args.status.unwrap_or_default(),
            creator_id: non_blank(args.creator_id),
        })
        .await
        .map_err(store_failure)?;

    let message = format!("测试计划「{}」创建成功", plan.name);
    Ok(json!({ "success": true, "testPlan": to_payload(&plan)?, "message": message }))
}
