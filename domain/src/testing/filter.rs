//! List filters used by query tools and count aggregation.
//!
//! A filter combines exact matches on the scalar fields that are set with an
//! optional free-text `search` that matches when ANY of the entity's text
//! fields contains it (case-insensitive). `limit` caps list results and is
//! ignored when counting.

use super::entities::{Defect, Project, Requirement, TestCase, TestPlan, User};
use super::value_objects::{
    DefectStatus, Priority, RequirementStatus, Severity, TestCaseStatus, TestPlanStatus, UserRole,
};

/// Case-insensitive substring match.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn any_text_matches(search: Option<&str>, fields: &[Option<&str>]) -> bool {
    match search {
        None => true,
        Some(term) => fields
            .iter()
            .flatten()
            .any(|field| contains_ignore_case(field, term)),
    }
}

fn scalar_matches<T: PartialEq>(wanted: Option<&T>, actual: &T) -> bool {
    wanted.is_none_or(|w| w == actual)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFilter {
    pub search: Option<String>,
    pub limit: usize,
}

impl ProjectFilter {
    pub const DEFAULT_LIMIT: usize = 10;

    pub fn matches(&self, project: &Project) -> bool {
        any_text_matches(
            self.search.as_deref(),
            &[Some(&project.name), project.description.as_deref()],
        )
    }
}

impl Default for ProjectFilter {
    fn default() -> Self {
        Self {
            search: None,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCaseFilter {
    pub project_id: Option<String>,
    pub status: Option<TestCaseStatus>,
    pub priority: Option<Priority>,
    pub search: Option<String>,
    pub limit: usize,
}

impl TestCaseFilter {
    pub const DEFAULT_LIMIT: usize = 20;

    pub fn for_project(project_id: Option<&str>) -> Self {
        Self {
            project_id: project_id.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: TestCaseStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, case: &TestCase) -> bool {
        scalar_matches(self.project_id.as_ref(), &case.project_id)
            && scalar_matches(self.status.as_ref(), &case.status)
            && scalar_matches(self.priority.as_ref(), &case.priority)
            && any_text_matches(
                self.search.as_deref(),
                &[Some(&case.title), case.description.as_deref()],
            )
    }
}

impl Default for TestCaseFilter {
    fn default() -> Self {
        Self {
            project_id: None,
            status: None,
            priority: None,
            search: None,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementFilter {
    pub project_id: Option<String>,
    pub status: Option<RequirementStatus>,
    pub priority: Option<Priority>,
    pub search: Option<String>,
    pub limit: usize,
}

impl RequirementFilter {
    pub const DEFAULT_LIMIT: usize = 20;

    pub fn for_project(project_id: Option<&str>) -> Self {
        Self {
            project_id: project_id.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: RequirementStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, requirement: &Requirement) -> bool {
        scalar_matches(self.project_id.as_ref(), &requirement.project_id)
            && scalar_matches(self.status.as_ref(), &requirement.status)
            && scalar_matches(self.priority.as_ref(), &requirement.priority)
            && any_text_matches(
                self.search.as_deref(),
                &[Some(&requirement.title), requirement.description.as_deref()],
            )
    }
}

impl Default for RequirementFilter {
    fn default() -> Self {
        Self {
            project_id: None,
            status: None,
            priority: None,
            search: None,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefectFilter {
    pub project_id: Option<String>,
    pub status: Option<DefectStatus>,
    pub severity: Option<Severity>,
    pub search: Option<String>,
    pub limit: usize,
}

impl DefectFilter {
    pub const DEFAULT_LIMIT: usize = 20;

    pub fn for_project(project_id: Option<&str>) -> Self {
        Self {
            project_id: project_id.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: DefectStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn matches(&self, defect: &Defect) -> bool {
        scalar_matches(self.project_id.as_ref(), &defect.project_id)
            && scalar_matches(self.status.as_ref(), &defect.status)
            && scalar_matches(self.severity.as_ref(), &defect.severity)
            && any_text_matches(
                self.search.as_deref(),
                &[Some(&defect.title), defect.description.as_deref()],
            )
    }
}

impl Default for DefectFilter {
    fn default() -> Self {
        Self {
            project_id: None,
            status: None,
            severity: None,
            search: None,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestPlanFilter {
    pub project_id: Option<String>,
    pub status: Option<TestPlanStatus>,
    pub search: Option<String>,
    pub limit: usize,
}

impl TestPlanFilter {
    pub const DEFAULT_LIMIT: usize = 10;

    pub fn matches(&self, plan: &TestPlan) -> bool {
        scalar_matches(self.project_id.as_ref(), &plan.project_id)
            && scalar_matches(self.status.as_ref(), &plan.status)
            && any_text_matches(
                self.search.as_deref(),
                &[Some(&plan.name), plan.description.as_deref()],
            )
    }
}

impl Default for TestPlanFilter {
    fn default() -> Self {
        Self {
            project_id: None,
            status: None,
            search: None,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFilter {
    pub role: Option<UserRole>,
    pub search: Option<String>,
    pub limit: usize,
}

impl UserFilter {
    pub const DEFAULT_LIMIT: usize = 20;

    pub fn matches(&self, user: &User) -> bool {
        scalar_matches(self.role.as_ref(), &user.role)
            && any_text_matches(self.search.as_deref(), &[Some(&user.name), Some(&user.email)])
    }
}

impl Default for UserFilter {
    fn default() -> Self {
        Self {
            role: None,
            search: None,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn case(project: &str, title: &str, description: Option<&str>, status: TestCaseStatus) -> TestCase {
        TestCase {
            id: format!("{project}-{title}"),
            project_id: project.to_string(),
            title: title.to_string(),
            description: description.map(str::to_string),
            precondition: None,
            steps: vec![],
            priority: Priority::P2,
            status,
            creator_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_default_limits() {
        assert_eq!(ProjectFilter::default().limit, 10);
        assert_eq!(TestPlanFilter::default().limit, 10);
        assert_eq!(TestCaseFilter::default().limit, 20);
        assert_eq!(RequirementFilter::default().limit, 20);
        assert_eq!(DefectFilter::default().limit, 20);
        assert_eq!(UserFilter::default().limit, 20);
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = TestCaseFilter::default();
        assert!(filter.matches(&case("P1", "Login", None, TestCaseStatus::Passed)));
    }

    #[test]
    fn test_scalars_are_exact_and_combined() {
        let filter = TestCaseFilter::for_project(Some("P1")).with_status(TestCaseStatus::Failed);
        assert!(filter.matches(&case("P1", "Login", None, TestCaseStatus::Failed)));
        assert!(!filter.matches(&case("P1", "Login", None, TestCaseStatus::Passed)));
        assert!(!filter.matches(&case("P2", "Login", None, TestCaseStatus::Failed)));
    }

    #[test]
    fn test_search_is_or_across_text_fields() {
        let filter = TestCaseFilter {
            search: Some("CHECKOUT".to_string()),
            ..TestCaseFilter::default()
        };
        assert!(filter.matches(&case("P1", "Checkout happy path", None, TestCaseStatus::Untested)));
        assert!(filter.matches(&case("P1", "Payment", Some("covers checkout"), TestCaseStatus::Untested)));
        assert!(!filter.matches(&case("P1", "Payment", Some("refunds"), TestCaseStatus::Untested)));
    }

    #[test]
    fn test_user_search_covers_email() {
        let user = User {
            id: "u1".to_string(),
            name: "Zhang San".to_string(),
            email: "zhangsan@example.com".to_string(),
            role: UserRole::Tester,
            created_at: Utc::now(),
        };
        let filter = UserFilter {
            search: Some("example.com".to_string()),
            ..UserFilter::default()
        };
        assert!(filter.matches(&user));

        let filter = UserFilter {
            role: Some(UserRole::Admin),
            ..UserFilter::default()
        };
        assert!(!filter.matches(&user));
    }
}
