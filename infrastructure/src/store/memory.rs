//! In-memory implementation of [`TestStore`].
//!
//! Created once at startup and shared behind an `Arc`. All tables sit behind
//! one [`RwLock`], so each operation is atomic. Listings return the most
//! recently created records first.

use async_trait::async_trait;
use chrono::Utc;
use testhub_application::{
    DefectPatch, NewDefect, NewProject, NewRequirement, NewTestCase, NewTestPlan,
    RequirementPatch, StoreError, TestCasePatch, TestStore,
};
use testhub_domain::testing::filter::contains_ignore_case;
use testhub_domain::testing::summary::{
    DefectSummary, ProjectSummary, RequirementSummary, TestCaseSummary, TestPlanSummary,
    UserSummary,
};
use testhub_domain::{
    Candidate, Defect, DefectFilter, EntityKind, Project, ProjectFilter, Requirement,
    RequirementFilter, TestCase, TestCaseFilter, TestPlan, TestPlanFilter, TestStep, User,
    UserFilter, UserRole,
};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    projects: Vec<Project>,
    test_cases: Vec<TestCase>,
    requirements: Vec<Requirement>,
    defects: Vec<Defect>,
    test_plans: Vec<TestPlan>,
}

impl Tables {
    fn user_name(&self, id: Option<&String>) -> Option<String> {
        let id = id?;
        self.users.iter().find(|u| &u.id == id).map(|u| u.name.clone())
    }

    fn require_project(&self, id: &str) -> Result<(), StoreError> {
        if self.projects.iter().any(|p| p.id == id) {
            Ok(())
        } else {
            Err(StoreError::not_found("Project", id))
        }
    }

    fn require_user(&self, id: Option<&String>) -> Result<(), StoreError> {
        match id {
            Some(id) if !self.users.iter().any(|u| &u.id == id) => {
                Err(StoreError::not_found("User", id.as_str()))
            }
            _ => Ok(()),
        }
    }

    fn require_test_case(&self, id: Option<&String>) -> Result<(), StoreError> {
        match id {
            Some(id) if !self.test_cases.iter().any(|c| &c.id == id) => {
                Err(StoreError::not_found("TestCase", id.as_str()))
            }
            _ => Ok(()),
        }
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Titles and names must carry text; a blank one can never be found by title.
fn require_text(value: &str, field: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::Constraint(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Process-local [`TestStore`].
#[derive(Debug, Default)]
pub struct InMemoryTestStore {
    tables: RwLock<Tables>,
}

impl InMemoryTestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user. Users are managed outside the assistant, so there is no
    /// tool for this; it exists for seeding and tests.
    pub async fn add_user(&self, name: &str, email: &str, role: UserRole) -> User {
        let user = User {
            id: new_id(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            created_at: Utc::now(),
        };
        self.tables.write().await.users.push(user.clone());
        user
    }
}

#[async_trait]
impl TestStore for InMemoryTestStore {
    // ==================== Queries ====================

    async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<ProjectSummary>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .projects
            .iter()
            .rev()
            .filter(|p| filter.matches(p))
            .take(filter.limit)
            .map(|p| ProjectSummary {
                id: p.id.clone(),
                name: p.name.clone(),
                description: p.description.clone(),
                owner: tables.user_name(p.owner_id.as_ref()),
                test_case_count: tables
                    .test_cases
                    .iter()
                    .filter(|c| c.project_id == p.id)
                    .count(),
                created_at: p.created_at,
            })
            .collect())
    }

    async fn list_test_cases(
        &self,
        filter: &TestCaseFilter,
    ) -> Result<Vec<TestCaseSummary>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .test_cases
            .iter()
            .rev()
            .filter(|c| filter.matches(c))
            .take(filter.limit)
            .map(|c| TestCaseSummary {
                id: c.id.clone(),
                project_id: c.project_id.clone(),
                title: c.title.clone(),
                status: c.status,
                priority: c.priority,
                creator: tables.user_name(c.creator_id.as_ref()),
                step_count: c.steps.len(),
                updated_at: c.updated_at,
            })
            .collect())
    }

    async fn list_requirements(
        &self,
        filter: &RequirementFilter,
    ) -> Result<Vec<RequirementSummary>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .requirements
            .iter()
            .rev()
            .filter(|r| filter.matches(r))
            .take(filter.limit)
            .map(|r| RequirementSummary {
                id: r.id.clone(),
                project_id: r.project_id.clone(),
                title: r.title.clone(),
                status: r.status,
                priority: r.priority,
                creator: tables.user_name(r.creator_id.as_ref()),
            })
            .collect())
    }

    async fn list_defects(&self, filter: &DefectFilter) -> Result<Vec<DefectSummary>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .defects
            .iter()
            .rev()
            .filter(|d| filter.matches(d))
            .take(filter.limit)
            .map(|d| DefectSummary {
                id: d.id.clone(),
                project_id: d.project_id.clone(),
                title: d.title.clone(),
                status: d.status,
                severity: d.severity,
                priority: d.priority,
                assignee: tables.user_name(d.assignee_id.as_ref()),
                reporter: tables.user_name(d.reporter_id.as_ref()),
            })
            .collect())
    }

    async fn list_test_plans(
        &self,
        filter: &TestPlanFilter,
    ) -> Result<Vec<TestPlanSummary>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .test_plans
            .iter()
            .rev()
            .filter(|p| filter.matches(p))
            .take(filter.limit)
            .map(|p| TestPlanSummary {
                id: p.id.clone(),
                project_id: p.project_id.clone(),
                name: p.name.clone(),
                status: p.status,
                creator: tables.user_name(p.creator_id.as_ref()),
            })
            .collect())
    }

    async fn list_users(&self, filter: &UserFilter) -> Result<Vec<UserSummary>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| filter.matches(u))
            .take(filter.limit)
            .map(|u| UserSummary {
                id: u.id.clone(),
                name: u.name.clone(),
                email: u.email.clone(),
                role: u.role,
            })
            .collect())
    }

    async fn find_candidates(
        &self,
        kind: EntityKind,
        title_fragment: &str,
        project_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Candidate>, StoreError> {
        let tables = self.tables.read().await;
        let in_scope = |pid: &str, title: &str| {
            project_id.is_none_or(|wanted| wanted == pid)
                && contains_ignore_case(title, title_fragment)
        };
        let candidate = |id: &str, title: &str, status: &str, pid: &str| Candidate {
            id: id.to_string(),
            title: title.to_string(),
            status: status.to_string(),
            project_id: pid.to_string(),
        };

        let found: Vec<Candidate> = match kind {
            EntityKind::TestCase => tables
                .test_cases
                .iter()
                .rev()
                .filter(|c| in_scope(&c.project_id, &c.title))
                .take(limit)
                .map(|c| candidate(&c.id, &c.title, c.status.as_str(), &c.project_id))
                .collect(),
            EntityKind::Requirement => tables
                .requirements
                .iter()
                .rev()
                .filter(|r| in_scope(&r.project_id, &r.title))
                .take(limit)
                .map(|r| candidate(&r.id, &r.title, r.status.as_str(), &r.project_id))
                .collect(),
            EntityKind::Defect => tables
                .defects
                .iter()
                .rev()
                .filter(|d| in_scope(&d.project_id, &d.title))
                .take(limit)
                .map(|d| candidate(&d.id, &d.title, d.status.as_str(), &d.project_id))
                .collect(),
        };
        Ok(found)
    }

    // ==================== Aggregation ====================

    async fn count_projects(&self, project_id: Option<&str>) -> Result<usize, StoreError> {
        let tables = self.tables.read().await;
        Ok(match project_id {
            Some(id) => tables.projects.iter().filter(|p| p.id == id).count(),
            None => tables.projects.len(),
        })
    }

    async fn count_test_cases(&self, filter: &TestCaseFilter) -> Result<usize, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.test_cases.iter().filter(|c| filter.matches(c)).count())
    }

    async fn count_requirements(&self, filter: &RequirementFilter) -> Result<usize, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .requirements
            .iter()
            .filter(|r| filter.matches(r))
            .count())
    }

    async fn count_defects(&self, filter: &DefectFilter) -> Result<usize, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.defects.iter().filter(|d| filter.matches(d)).count())
    }

    // ==================== Mutations ====================

    async fn create_project(&self, project: NewProject) -> Result<Project, StoreError> {
        require_text(&project.name, "project name")?;
        let mut tables = self.tables.write().await;
        tables.require_user(project.owner_id.as_ref())?;

        let now = Utc::now();
        let created = Project {
            id: new_id(),
            name: project.name,
            description: project.description,
            owner_id: project.owner_id,
            created_at: now,
            updated_at: now,
        };
        tables.projects.push(created.clone());
        debug!("Created project {}", created.id);
        Ok(created)
    }

    async fn create_test_case(&self, case: NewTestCase) -> Result<TestCase, StoreError> {
        require_text(&case.title, "test case title")?;
        let mut tables = self.tables.write().await;
        tables.require_project(&case.project_id)?;
        tables.require_user(case.creator_id.as_ref())?;

        let now = Utc::now();
        let created = TestCase {
            id: new_id(),
            project_id: case.project_id,
            title: case.title,
            description: case.description,
            precondition: case.precondition,
            steps: case
                .steps
                .into_iter()
                .zip(1..)
                .map(|(step, order)| TestStep {
                    order,
                    action: step.action,
                    expected: step.expected,
                })
                .collect(),
            priority: case.priority,
            status: case.status,
            creator_id: case.creator_id,
            created_at: now,
            updated_at: now,
        };
        tables.test_cases.push(created.clone());
        debug!(
            "Created test case {} with {} steps",
            created.id,
            created.steps.len()
        );
        Ok(created)
    }

    async fn create_requirement(
        &self,
        requirement: NewRequirement,
    ) -> Result<Requirement, StoreError> {
        require_text(&requirement.title, "requirement title")?;
        let mut tables = self.tables.write().await;
        tables.require_project(&requirement.project_id)?;
        tables.require_user(requirement.creator_id.as_ref())?;

        let now = Utc::now();
        let created = Requirement {
            id: new_id(),
            project_id: requirement.project_id,
            title: requirement.title,
            description: requirement.description,
            priority: requirement.priority,
            status: requirement.status,
            creator_id: requirement.creator_id,
            created_at: now,
            updated_at: now,
        };
        tables.requirements.push(created.clone());
        Ok(created)
    }

    async fn create_defect(&self, defect: NewDefect) -> Result<Defect, StoreError> {
        require_text(&defect.title, "defect title")?;
        let mut tables = self.tables.write().await;
        tables.require_project(&defect.project_id)?;
        tables.require_test_case(defect.test_case_id.as_ref())?;
        tables.require_user(defect.assignee_id.as_ref())?;
        tables.require_user(defect.reporter_id.as_ref())?;

        let now = Utc::now();
        let created = Defect {
            id: new_id(),
            project_id: defect.project_id,
            title: defect.title,
            description: defect.description,
            severity: defect.severity,
            priority: defect.priority,
            status: defect.status,
            test_case_id: defect.test_case_id,
            assignee_id: defect.assignee_id,
            reporter_id: defect.reporter_id,
            created_at: now,
            updated_at: now,
        };
        tables.defects.push(created.clone());
        Ok(created)
    }

    async fn create_test_plan(&self, plan: NewTestPlan) -> Result<TestPlan, StoreError> {
        require_text(&plan.name, "test plan name")?;
        let mut tables = self.tables.write().await;
        tables.require_project(&plan.project_id)?;
        tables.require_user(plan.creator_id.as_ref())?;

        let now = Utc::now();
        let created = TestPlan {
            id: new_id(),
            project_id: plan.project_id,
            name: plan.name,
            description: plan.description,
            status: plan.status,
            creator_id: plan.creator_id,
            created_at: now,
            updated_at: now,
        };
        tables.test_plans.push(created.clone());
        Ok(created)
    }

    async fn update_test_case(
        &self,
        id: &str,
        patch: TestCasePatch,
    ) -> Result<TestCase, StoreError> {
        let mut tables = self.tables.write().await;
        let case = tables
            .test_cases
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::not_found("TestCase", id))?;

        if let Some(title) = patch.title {
            case.title = title;
        }
        if let Some(description) = patch.description {
            case.description = Some(description);
        }
        if let Some(precondition) = patch.precondition {
            case.precondition = Some(precondition);
        }
        if let Some(status) = patch.status {
            case.status = status;
        }
        if let Some(priority) = patch.priority {
            case.priority = priority;
        }
        case.updated_at = Utc::now();
        Ok(case.clone())
    }

    async fn update_requirement(
        &self,
        id: &str,
        patch: RequirementPatch,
    ) -> Result<Requirement, StoreError> {
        let mut tables = self.tables.write().await;
        let requirement = tables
            .requirements
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::not_found("Requirement", id))?;

        if let Some(title) = patch.title {
            requirement.title = title;
        }
        if let Some(description) = patch.description {
            requirement.description = Some(description);
        }
        if let Some(status) = patch.status {
            requirement.status = status;
        }
        if let Some(priority) = patch.priority {
            requirement.priority = priority;
        }
        requirement.updated_at = Utc::now();
        Ok(requirement.clone())
    }

    async fn update_defect(&self, id: &str, patch: DefectPatch) -> Result<Defect, StoreError> {
        let mut tables = self.tables.write().await;
        tables.require_user(patch.assignee_id.as_ref())?;
        let defect = tables
            .defects
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| StoreError::not_found("Defect", id))?;

        if let Some(title) = patch.title {
            defect.title = title;
        }
        if let Some(description) = patch.description {
            defect.description = Some(description);
        }
        if let Some(status) = patch.status {
            defect.status = status;
        }
        if let Some(severity) = patch.severity {
            defect.severity = severity;
        }
        if let Some(priority) = patch.priority {
            defect.priority = priority;
        }
        if let Some(assignee_id) = patch.assignee_id {
            defect.assignee_id = Some(assignee_id);
        }
        defect.updated_at = Utc::now();
        Ok(defect.clone())
    }

    async fn delete_test_case(&self, id: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.test_cases.len();
        tables.test_cases.retain(|c| c.id != id);
        if tables.test_cases.len() == before {
            return Err(StoreError::not_found("TestCase", id));
        }
        // Defects keep existing without the link.
        for defect in tables
            .defects
            .iter_mut()
            .filter(|d| d.test_case_id.as_deref() == Some(id))
        {
            defect.test_case_id = None;
        }
        Ok(())
    }

    async fn delete_requirement(&self, id: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.requirements.len();
        tables.requirements.retain(|r| r.id != id);
        if tables.requirements.len() == before {
            return Err(StoreError::not_found("Requirement", id));
        }
        Ok(())
    }

    async fn delete_defect(&self, id: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.defects.len();
        tables.defects.retain(|d| d.id != id);
        if tables.defects.len() == before {
            return Err(StoreError::not_found("Defect", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testhub_application::NewTestStep;
    use testhub_domain::{DefectStatus, Priority, Severity, TestCaseStatus};

    async fn project(store: &InMemoryTestStore, name: &str) -> Project {
        store
            .create_project(NewProject {
                name: name.to_string(),
                description: None,
                owner_id: None,
            })
            .await
            .unwrap()
    }

    fn new_case(project_id: &str, title: &str) -> NewTestCase {
        NewTestCase {
            project_id: project_id.to_string(),
            title: title.to_string(),
            description: None,
            precondition: None,
            steps: vec![],
            priority: Priority::P2,
            status: TestCaseStatus::Untested,
            creator_id: None,
        }
    }

    #[tokio::test]
    async fn test_steps_are_numbered_from_one() {
        let store = InMemoryTestStore::new();
        let p = project(&store, "Shop").await;
        let mut case = new_case(&p.id, "Checkout");
        case.steps = vec![
            NewTestStep {
                action: "Open cart".to_string(),
                expected: None,
            },
            NewTestStep {
                action: "Pay".to_string(),
                expected: Some("Order placed".to_string()),
            },
        ];

        let created = store.create_test_case(case).await.unwrap();

        let orders: Vec<u32> = created.steps.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_listing_projects_creator_name_and_newest_first() {
        let store = InMemoryTestStore::new();
        let user = store
            .add_user("Li Lei", "lilei@example.com", UserRole::Tester)
            .await;
        let p = project(&store, "Shop").await;
        let mut first = new_case(&p.id, "First");
        first.creator_id = Some(user.id.clone());
        store.create_test_case(first).await.unwrap();
        store.create_test_case(new_case(&p.id, "Second")).await.unwrap();

        let rows = store
            .list_test_cases(&TestCaseFilter::default())
            .await
            .unwrap();

        assert_eq!(rows[0].title, "Second");
        assert_eq!(rows[1].title, "First");
        assert_eq!(rows[1].creator.as_deref(), Some("Li Lei"));
    }

    #[tokio::test]
    async fn test_unknown_references_rejected() {
        let store = InMemoryTestStore::new();
        let p = project(&store, "Shop").await;

        let err = store
            .create_test_case(new_case("missing", "X"))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::not_found("Project", "missing"));

        let mut case = new_case(&p.id, "X");
        case.creator_id = Some("ghost".to_string());
        let err = store.create_test_case(case).await.unwrap_err();
        assert_eq!(err, StoreError::not_found("User", "ghost"));
    }

    #[tokio::test]
    async fn test_candidates_scoped_and_capped() {
        let store = InMemoryTestStore::new();
        let a = project(&store, "A").await;
        let b = project(&store, "B").await;
        for i in 0..4 {
            store
                .create_test_case(new_case(&a.id, &format!("Login {i}")))
                .await
                .unwrap();
        }
        store.create_test_case(new_case(&b.id, "Login B")).await.unwrap();

        let all = store
            .find_candidates(EntityKind::TestCase, "login", None, 3)
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        let scoped = store
            .find_candidates(EntityKind::TestCase, "LOGIN", Some(&b.id), 5)
            .await
            .unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].title, "Login B");
    }

    #[tokio::test]
    async fn test_delete_test_case_unlinks_defects() {
        let store = InMemoryTestStore::new();
        let p = project(&store, "Shop").await;
        let case = store.create_test_case(new_case(&p.id, "Pay")).await.unwrap();
        let defect = store
            .create_defect(NewDefect {
                project_id: p.id.clone(),
                title: "Pay fails".to_string(),
                description: None,
                severity: Severity::High,
                priority: Priority::P1,
                status: DefectStatus::Open,
                test_case_id: Some(case.id.clone()),
                assignee_id: None,
                reporter_id: None,
            })
            .await
            .unwrap();

        store.delete_test_case(&case.id).await.unwrap();

        let err = store.delete_test_case(&case.id).await.unwrap_err();
        assert_eq!(err, StoreError::not_found("TestCase", case.id.as_str()));
        let updated = store
            .update_defect(&defect.id, DefectPatch::default())
            .await
            .unwrap();
        assert!(updated.test_case_id.is_none());
    }
}
