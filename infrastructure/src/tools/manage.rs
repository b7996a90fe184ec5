//! Update and delete tools addressed by id or by title fragment.
//!
//! Without an explicit id the [`TitleResolver`] must narrow the reference to
//! exactly one record first; anything else is answered with a
//! `{success: false, ...}` payload and the store is not written.

use super::args::{EntityRef, HandlerResult, non_blank, parse_args, store_failure, to_payload};
use super::params;
use super::resolver::TitleResolver;
use serde::Deserialize;
use serde_json::json;
use testhub_application::{DefectPatch, RequirementPatch, TestCasePatch, TestStore};
use testhub_domain::{
    DefectStatus, DisambiguationOutcome, EntityKind, Priority, RequirementStatus, Severity,
    TestCaseStatus, ToolCall, ToolDefinition, ToolError, ToolParameter,
};

/// Tool name constants
pub const UPDATE_TEST_CASE: &str = "update_test_case";
pub const DELETE_TEST_CASE: &str = "delete_test_case";
pub const UPDATE_REQUIREMENT: &str = "update_requirement";
pub const DELETE_REQUIREMENT: &str = "delete_requirement";
pub const UPDATE_DEFECT: &str = "update_defect";
pub const DELETE_DEFECT: &str = "delete_defect";

fn with_reference(definition: ToolDefinition, label: &str) -> ToolDefinition {
    definition
        .with_parameter(params::id(label))
        .with_parameter(params::search_title(label))
        .with_parameter(params::scope_project_id())
}

pub fn update_test_case_definition() -> ToolDefinition {
    with_reference(
        ToolDefinition::new(
            UPDATE_TEST_CASE,
            "更新测试用例（如标记执行结果）。只修改提供的字段。不知道ID时用 searchTitle 按标题查找",
        ),
        "测试用例",
    )
    .with_parameter(ToolParameter::new("title", "新标题", false))
    .with_parameter(ToolParameter::new("description", "新描述", false))
    .with_parameter(ToolParameter::new("precondition", "新前置条件", false))
    .with_parameter(params::test_case_status(false))
    .with_parameter(params::priority(false))
}

pub fn delete_test_case_definition() -> ToolDefinition {
    with_reference(
        ToolDefinition::new(DELETE_TEST_CASE, "删除测试用例。不知道ID时用 searchTitle 按标题查找"),
        "测试用例",
    )
}

pub fn update_requirement_definition() -> ToolDefinition {
    with_reference(
        ToolDefinition::new(
            UPDATE_REQUIREMENT,
            "更新需求（如评审通过、进入开发）。只修改提供的字段。不知道ID时用 searchTitle 按标题查找",
        ),
        "需求",
    )
    .with_parameter(ToolParameter::new("title", "新标题", false))
    .with_parameter(ToolParameter::new("description", "新描述", false))
    .with_parameter(params::requirement_status(false))
    .with_parameter(params::priority(false))
}

pub fn delete_requirement_definition() -> ToolDefinition {
    with_reference(
        ToolDefinition::new(DELETE_REQUIREMENT, "删除需求。不知道ID时用 searchTitle 按标题查找"),
        "需求",
    )
}

pub fn update_defect_definition() -> ToolDefinition {
    with_reference(
        ToolDefinition::new(
            UPDATE_DEFECT,
            "更新缺陷（如修改状态、指派处理人）。只修改提供的字段。不知道ID时用 searchTitle 按标题查找",
        ),
        "缺陷",
    )
    .with_parameter(ToolParameter::new("title", "新标题", false))
    .with_parameter(ToolParameter::new("description", "新描述", false))
    .with_parameter(params::defect_status(false))
    .with_parameter(params::severity(false))
    .with_parameter(params::priority(false))
    .with_parameter(ToolParameter::new("assigneeId", "新的处理人用户ID", false))
}

pub fn delete_defect_definition() -> ToolDefinition {
    with_reference(
        ToolDefinition::new(DELETE_DEFECT, "删除缺陷。不知道ID时用 searchTitle 按标题查找"),
        "缺陷",
    )
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct ReferenceArgs {
    id: Option<String>,
    search_title: Option<String>,
    project_id: Option<String>,
}

impl ReferenceArgs {
    fn into_ref(self) -> EntityRef {
        EntityRef::new(self.id, self.search_title, self.project_id)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct UpdateTestCaseArgs {
    id: Option<String>,
    search_title: Option<String>,
    project_id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    precondition: Option<String>,
    status: Option<TestCaseStatus>,
    priority: Option<Priority>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct UpdateRequirementArgs {
    id: Option<String>,
    search_title: Option<String>,
    project_id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    status: Option<RequirementStatus>,
    priority: Option<Priority>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct UpdateDefectArgs {
    id: Option<String>,
    search_title: Option<String>,
    project_id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    status: Option<DefectStatus>,
    severity: Option<Severity>,
    priority: Option<Priority>,
    assignee_id: Option<String>,
}

enum Target {
    Id(String),
    /// Did not resolve; the payload explains why.
    Unresolved(serde_json::Value),
}

async fn resolve_target(
    store: &dyn TestStore,
    kind: EntityKind,
    reference: &EntityRef,
) -> Result<Target, ToolError> {
    let outcome = TitleResolver::new(store)
        .resolve(kind, reference)
        .await
        .map_err(store_failure)?;
    Ok(match outcome {
        DisambiguationOutcome::Resolved(id) => Target::Id(id),
        other => Target::Unresolved(
            other
                .failure_payload(kind)
                .unwrap_or_else(|| json!({ "success": false })),
        ),
    })
}

fn nothing_to_update(kind: EntityKind) -> serde_json::Value {
    json!({
        "success": false,
        "error": format!("没有提供需要更新的{}字段", kind.label()),
    })
}

pub async fn execute_update_test_case(store: &dyn TestStore, call: &ToolCall) -> HandlerResult {
    let args: UpdateTestCaseArgs = parse_args(call)?;
    let patch = TestCasePatch {
        title: non_blank(args.title),
        description: args.description,
        precondition: args.precondition,
        status: args.status,
        priority: args.priority,
    };

    let reference = EntityRef::new(args.id, args.search_title, args.project_id);
    let id = match resolve_target(store, EntityKind::TestCase, &reference).await? {
        Target::Id(id) => id,
        Target::Unresolved(payload) => return Ok(payload),
    };
    if patch.is_empty() {
        return Ok(nothing_to_update(EntityKind::TestCase));
    }

    let case = store
        .update_test_case(&id, patch)
        .await
        .map_err(store_failure)?;
    let message = format!("测试用例「{}」已更新", case.title);
    Ok(json!({ "success": true, "testCase": to_payload(&case)?, "message": message }))
}

pub async fn execute_update_requirement(store: &dyn TestStore, call: &ToolCall) -> HandlerResult {
    let args: UpdateRequirementArgs = parse_args(call)?;
    let patch = RequirementPatch {
        title: non_blank(args.title),
        description: args.description,
        status: args.status,
        priority: args.priority,
    };

    let reference = EntityRef::new(args.id, args.search_title, args.project_id);
    let id = match resolve_target(store, EntityKind::Requirement, &reference).await? {
        Target::Id(id) => id,
        Target::Unresolved(payload) => return Ok(payload),
    };
    if patch.is_empty() {
        return Ok(nothing_to_update(EntityKind::Requirement));
    }

    let requirement = store
        .update_requirement(&id, patch)
        .await
        .map_err(store_failure)?;
    let message = format!("需求「{}」已更新", requirement.title);
    Ok(json!({ "success": true, "requirement": to_payload(&requirement)?, "message": message }))
}

pub async fn execute_update_defect(store: &dyn TestStore, call: &ToolCall) -> HandlerResult {
    let args: UpdateDefectArgs = parse_args(call)?;
    let patch = DefectPatch {
        title: non_blank(args.title),
        description: args.description,
        status: args.status,
        severity: args.severity,
        priority: args.priority,
        assignee_id: non_blank(args.assignee_id),
    };

    let reference = EntityRef::new(args.id, args.search_title, args.project_id);
    let id = match resolve_target(store, EntityKind::Defect, &reference).await? {
        Target::Id(id) => id,
        Target::Unresolved(payload) => return Ok(payload),
    };
    if patch.is_empty() {
        return Ok(nothing_to_update(EntityKind::Defect));
    }

    let defect = store
        .update_defect(&id, patch)
        .await
        .map_err(store_failure)?;
    let message = format!("缺陷「{}」已更新", defect.title);
    Ok(json!({ "success": true, "defect": to_payload(&defect)?, "message": message }))
}

async fn execute_delete(store: &dyn TestStore, call: &ToolCall, kind: EntityKind) -> HandlerResult {
    let args: ReferenceArgs = parse_args(call)?;
    let id = match resolve_target(store, kind, &args.into_ref()).await? {
        Target::Id(id) => id,
        Target::Unresolved(payload) => return Ok(payload),
    };

    match kind {
        EntityKind::TestCase => store.delete_test_case(&id).await,
        EntityKind::Requirement => store.delete_requirement(&id).await,
        EntityKind::Defect => store.delete_defect(&id).await,
    }
    .map_err(store_failure)?;

    Ok(json!({
        "success": true,
        "deletedId": id,
        "message": format!("{} {} 已删除", kind.label(), id),
    }))
}

pub async fn execute_delete_test_case(store: &dyn TestStore, call: &ToolCall) -> HandlerResult {
    execute_delete(store, call, EntityKind::TestCase).await
}

pub async fn execute_delete_requirement(store: &dyn TestStore, call: &ToolCall) -> HandlerResult {
    execute_delete(store, call, EntityKind::Requirement).await
}

pub async fn execute_delete_defect(store: &dyn TestStore, call: &ToolCall) -> HandlerResult {
    execute_delete(store, call, EntityKind::Defect).await
}
