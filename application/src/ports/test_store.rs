//! Test store port
//!
//! The persistence collaborator behind the assistant's tools. Each tool maps
//! to one operation here; the store owns durable state, id generation,
//! timestamps and relation projection.

use async_trait::async_trait;
use testhub_domain::testing::summary::{
    DefectSummary, ProjectSummary, RequirementSummary, TestCaseSummary, TestPlanSummary,
    UserSummary,
};
use testhub_domain::{
    Candidate, Defect, DefectFilter, DefectStatus, EntityKind, Priority, Project, ProjectFilter,
    Requirement, RequirementFilter, RequirementStatus, Severity, TestCase, TestCaseFilter,
    TestCaseStatus, TestPlan, TestPlanFilter, TestPlanStatus, UserFilter,
};
use thiserror::Error;

/// Errors raised by a store adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Constraint violated: {0}")]
    Constraint(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTestStep {
    pub action: String,
    pub expected: Option<String>,
}

/// A test case to insert together with its ordered steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTestCase {
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub precondition: Option<String>,
    pub steps: Vec<NewTestStep>,
    pub priority: Priority,
    pub status: TestCaseStatus,
    pub creator_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequirement {
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: RequirementStatus,
    pub creator_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDefect {
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub severity: Severity,
    pub priority: Priority,
    pub status: DefectStatus,
    pub test_case_id: Option<String>,
    pub assignee_id: Option<String>,
    pub reporter_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTestPlan {
    pub project_id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: TestPlanStatus,
    pub creator_id: Option<String>,
}

/// Partial update: `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestCasePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub precondition: Option<String>,
    pub status: Option<TestCaseStatus>,
    pub priority: Option<Priority>,
}

/// Partial update: `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<RequirementStatus>,
    pub priority: Option<Priority>,
}

/// Partial update: `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<DefectStatus>,
    pub severity: Option<Severity>,
    pub priority: Option<Priority>,
    pub assignee_id: Option<String>,
}

impl TestCasePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl RequirementPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl DefectPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Port for the test-management store.
///
/// List operations honour the filter's `limit`; count operations ignore it.
#[async_trait]
pub trait TestStore: Send + Sync {
    // ==================== Queries ====================

    async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<ProjectSummary>, StoreError>;

    async fn list_test_cases(
        &self,
        filter: &TestCaseFilter,
    ) -> Result<Vec<TestCaseSummary>, StoreError>;

    async fn list_requirements(
        &self,
        filter: &RequirementFilter,
    ) -> Result<Vec<RequirementSummary>, StoreError>;

    async fn list_defects(&self, filter: &DefectFilter) -> Result<Vec<DefectSummary>, StoreError>;

    async fn list_test_plans(
        &self,
        filter: &TestPlanFilter,
    ) -> Result<Vec<TestPlanSummary>, StoreError>;

    async fn list_users(&self, filter: &UserFilter) -> Result<Vec<UserSummary>, StoreError>;

    /// Title look-up used by disambiguation; read-only.
    async fn find_candidates(
        &self,
        kind: EntityKind,
        title_fragment: &str,
        project_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Candidate>, StoreError>;

    // ==================== Aggregation ====================

    /// Number of projects, or 1/0 when scoped to one project id.
    async fn count_projects(&self, project_id: Option<&str>) -> Result<usize, StoreError>;

    async fn count_test_cases(&self, filter: &TestCaseFilter) -> Result<usize, StoreError>;

    async fn count_requirements(&self, filter: &RequirementFilter) -> Result<usize, StoreError>;

    async fn count_defects(&self, filter: &DefectFilter) -> Result<usize, StoreError>;

    // ==================== Mutations ====================

    async fn create_project(&self, project: NewProject) -> Result<Project, StoreError>;

    async fn create_test_case(&self, case: NewTestCase) -> Result<TestCase, StoreError>;

    async fn create_requirement(
        &self,
        requirement: NewRequirement,
    ) -> Result<Requirement, StoreError>;

    async fn create_defect(&self, defect: NewDefect) -> Result<Defect, StoreError>;

    async fn create_test_plan(&self, plan: NewTestPlan) -> Result<TestPlan, StoreError>;

    async fn update_test_case(&self, id: &str, patch: TestCasePatch)
    -> Result<TestCase, StoreError>;

    async fn update_requirement(
        &self,
        id: &str,
        patch: RequirementPatch,
    ) -> Result<Requirement, StoreError>;

    async fn update_defect(&self, id: &str, patch: DefectPatch) -> Result<Defect, StoreError>;

    async fn delete_test_case(&self, id: &str) -> Result<(), StoreError>;

    async fn delete_requirement(&self, id: &str) -> Result<(), StoreError>;

    async fn delete_defect(&self, id: &str) -> Result<(), StoreError>;
}
