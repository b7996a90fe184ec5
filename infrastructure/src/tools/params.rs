//! Parameter declarations reused across tool definitions.

use testhub_domain::{
    DefectStatus, ParamType, Priority, RequirementStatus, Severity, TestCaseStatus,
    TestPlanStatus, ToolParameter, UserRole,
};

/// Enum parameter whose description also lists the accepted values, for
/// providers that ignore the schema's `enum`.
fn closed(name: &str, label: &str, values: &[&str], required: bool) -> ToolParameter {
    ToolParameter::new(name, format!("{label}，可选值: {}", values.join(", ")), required)
        .with_values(values)
}

pub(super) fn project_id(required: bool) -> ToolParameter {
    let description = if required {
        "所属项目ID（用户未指定时使用当前项目ID）"
    } else {
        "按项目ID筛选"
    };
    ToolParameter::new("projectId", description, required)
}

pub(super) fn search(fields: &str) -> ToolParameter {
    ToolParameter::new("search", format!("搜索关键词，匹配{fields}"), false)
}

pub(super) fn limit(default: usize) -> ToolParameter {
    ToolParameter::new("limit", format!("返回数量上限，默认 {default}"), false)
        .with_type(ParamType::Number)
}

pub(super) fn id(label: &str) -> ToolParameter {
    ToolParameter::new("id", format!("{label}ID（已知时优先使用）"), false)
}

pub(super) fn search_title(label: &str) -> ToolParameter {
    ToolParameter::new(
        "searchTitle",
        format!("按标题关键词查找{label}（不知道ID时使用）"),
        false,
    )
}

pub(super) fn scope_project_id() -> ToolParameter {
    ToolParameter::new("projectId", "限定 searchTitle 查找的项目ID", false)
}

pub(super) fn test_case_status(required: bool) -> ToolParameter {
    closed("status", "测试用例状态", TestCaseStatus::VALUES, required)
}

pub(super) fn requirement_status(required: bool) -> ToolParameter {
    closed("status", "需求状态", RequirementStatus::VALUES, required)
}

pub(super) fn defect_status(required: bool) -> ToolParameter {
    closed("status", "缺陷状态", DefectStatus::VALUES, required)
}

pub(super) fn test_plan_status(required: bool) -> ToolParameter {
    closed("status", "测试计划状态", TestPlanStatus::VALUES, required)
}

pub(super) fn priority(required: bool) -> ToolParameter {
    closed("priority", "优先级，P0 最高", Priority::VALUES, required)
}

pub(super) fn severity(required: bool) -> ToolParameter {
    closed("severity", "严重程度", Severity::VALUES, required)
}

pub(super) fn role() -> ToolParameter {
    closed("role", "用户角色", UserRole::VALUES, false)
}
