//! Projected list records returned by query tools.
//!
//! Related users are flattened to their display name and nested children to
//! a count, so a listing stays small enough to hand back to the model.

use super::value_objects::{
    DefectStatus, Priority, RequirementStatus, Severity, TestCaseStatus, TestPlanStatus, UserRole,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub owner: Option<String>,
    pub test_case_count: usize,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseSummary {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub status: TestCaseStatus,
    pub priority: Priority,
    pub creator: Option<String>,
    pub step_count: usize,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementSummary {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub status: RequirementStatus,
    pub priority: Priority,
    pub creator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectSummary {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub status: DefectStatus,
    pub severity: Severity,
    pub priority: Priority,
    pub assignee: Option<String>,
    pub reporter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestPlanSummary {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub status: TestPlanStatus,
    pub creator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}
