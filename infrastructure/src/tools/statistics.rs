//! Statistics tool: aggregated counts, optionally scoped to one project.

use super::args::{HandlerResult, non_blank, parse_args, store_failure, to_payload};
use super::params;
use serde::Deserialize;
use testhub_application::TestStore;
use testhub_domain::{
    DefectFilter, DefectStats, DefectStatus, Overview, RequirementFilter, RequirementStats,
    RequirementStatus, Severity, StatisticsScope, TestCaseFilter, TestCaseStats, TestCaseStatus,
    ToolCall, ToolDefinition, ToolError, ToolParameter,
};

pub const GET_STATISTICS: &str = "get_statistics";

pub fn get_statistics_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_STATISTICS,
        "获取统计数据：测试用例执行情况与通过率、缺陷分布、需求进度。不指定 type 时返回总览",
    )
    .with_parameter(params::project_id(false))
    .with_parameter(
        ToolParameter::new(
            "type",
            format!("统计类型，可选值: {}", StatisticsScope::VALUES.join(", ")),
            false,
        )
        .with_values(StatisticsScope::VALUES),
    )
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct StatisticsArgs {
    project_id: Option<String>,
    #[serde(rename = "type")]
    scope: Option<StatisticsScope>,
}

pub async fn execute_get_statistics(store: &dyn TestStore, call: &ToolCall) -> HandlerResult {
    let args: StatisticsArgs = parse_args(call)?;
    let project_id = non_blank(args.project_id);
    let project_id = project_id.as_deref();

    match args.scope {
        Some(StatisticsScope::TestCases) => to_payload(&test_case_stats(store, project_id).await?),
        Some(StatisticsScope::Defects) => to_payload(&defect_stats(store, project_id).await?),
        Some(StatisticsScope::Requirements) => {
            to_payload(&requirement_stats(store, project_id).await?)
        }
        None => {
            let (projects, test_cases, defects, requirements) = futures::try_join!(
                async { store.count_projects(project_id).await.map_err(store_failure) },
                test_case_stats(store, project_id),
                defect_stats(store, project_id),
                requirement_stats(store, project_id),
            )?;
            to_payload(&Overview {
                projects,
                test_cases,
                defects,
                requirements,
            })
        }
    }
}

async fn test_case_stats(
    store: &dyn TestStore,
    project_id: Option<&str>,
) -> Result<TestCaseStats, ToolError> {
    let all = TestCaseFilter::for_project(project_id);
    let passed = all.clone().with_status(TestCaseStatus::Passed);
    let failed = all.clone().with_status(TestCaseStatus::Failed);
    let blocked = all.clone().with_status(TestCaseStatus::Blocked);
    let skipped = all.clone().with_status(TestCaseStatus::Skipped);
    let untested = all.clone().with_status(TestCaseStatus::Untested);

    let (total, passed, failed, blocked, skipped, untested) = futures::try_join!(
        store.count_test_cases(&all),
        store.count_test_cases(&passed),
        store.count_test_cases(&failed),
        store.count_test_cases(&blocked),
        store.count_test_cases(&skipped),
        store.count_test_cases(&untested),
    )
    .map_err(store_failure)?;

    Ok(TestCaseStats::new(
        total, passed, failed, blocked, skipped, untested,
    ))
}

async fn defect_stats(
    store: &dyn TestStore,
    project_id: Option<&str>,
) -> Result<DefectStats, ToolError> {
    let all = DefectFilter::for_project(project_id);
    let open = all.clone().with_status(DefectStatus::Open);
    let in_progress = all.clone().with_status(DefectStatus::InProgress);
    let resolved = all.clone().with_status(DefectStatus::Resolved);
    let closed = all.clone().with_status(DefectStatus::Closed);
    let critical = all.clone().with_severity(Severity::Critical);

    let (total, open, in_progress, resolved, closed, critical) = futures::try_join!(
        store.count_defects(&all),
        store.count_defects(&open),
        store.count_defects(&in_progress),
        store.count_defects(&resolved),
        store.count_defects(&closed),
        store.count_defects(&critical),
    )
    .map_err(store_failure)?;

    Ok(DefectStats {
        total,
        open,
        in_progress,
        resolved,
        closed,
        critical,
    })
}

async fn requirement_stats(
    store: &dyn TestStore,
    project_id: Option<&str>,
) -> Result<RequirementStats, ToolError> {
    let all = RequirementFilter::for_project(project_id);
    let draft = all.clone().with_status(RequirementStatus::Draft);
    let pending_review = all.clone().with_status(RequirementStatus::PendingReview);
    let approved = all.clone().with_status(RequirementStatus::Approved);
    let in_progress = all.clone().with_status(RequirementStatus::InProgress);
    let completed = all.clone().with_status(RequirementStatus::Completed);

    let (total, draft, pending_review, approved, in_progress, completed) = futures::try_join!(
        store.count_requirements(&all),
        store.count_requirements(&draft),
        store.count_requirements(&pending_review),
        store.count_requirements(&approved),
        store.count_requirements(&in_progress),
        store.count_requirements(&completed),
    )
    .map_err(store_failure)?;

    Ok(RequirementStats {
        total,
        draft,
        pending_review,
        approved,
        in_progress,
        completed,
    })
}
