//! Demo data for local runs (`store.seed_demo_data = true`).

use super::InMemoryTestStore;
use testhub_application::{
    NewDefect, NewProject, NewRequirement, NewTestCase, NewTestPlan, NewTestStep, StoreError,
    TestStore,
};
use testhub_domain::{
    DefectStatus, Priority, RequirementStatus, Severity, TestCaseStatus, TestPlanStatus, UserRole,
};
use tracing::info;

fn step(action: &str, expected: &str) -> NewTestStep {
    NewTestStep {
        action: action.to_string(),
        expected: Some(expected.to_string()),
    }
}

impl InMemoryTestStore {
    /// Populate one project with a handful of users, cases, requirements,
    /// defects and a plan. Returns the project id.
    pub async fn seed_demo_data(&self) -> Result<String, StoreError> {
        let admin = self
            .add_user("张伟", "zhangwei@example.com", UserRole::Admin)
            .await;
        let tester = self
            .add_user("李娜", "lina@example.com", UserRole::Tester)
            .await;
        let developer = self
            .add_user("王强", "wangqiang@example.com", UserRole::Developer)
            .await;

        let project = self
            .create_project(NewProject {
                name: "电商平台".to_string(),
                description: Some("在线商城核心业务".to_string()),
                owner_id: Some(admin.id.clone()),
            })
            .await?;

        self.create_test_case(NewTestCase {
            project_id: project.id.clone(),
            title: "用户登录-正确密码".to_string(),
            description: None,
            precondition: Some("用户已注册".to_string()),
            steps: vec![
                step("打开登录页", "显示登录表单"),
                step("输入正确的用户名和密码", "登录成功并跳转首页"),
            ],
            priority: Priority::P0,
            status: TestCaseStatus::Passed,
            creator_id: Some(tester.id.clone()),
        })
        .await?;

        let checkout = self
            .create_test_case(NewTestCase {
                project_id: project.id.clone(),
                title: "购物车结算".to_string(),
                description: Some("多件商品结算流程".to_string()),
                precondition: None,
                steps: vec![
                    step("添加两件商品到购物车", "购物车数量为2"),
                    step("点击结算并支付", "生成订单"),
                ],
                priority: Priority::P1,
                status: TestCaseStatus::Failed,
                creator_id: Some(tester.id.clone()),
            })
            .await?;

        self.create_test_case(NewTestCase {
            project_id: project.id.clone(),
            title: "用户登录-错误密码".to_string(),
            description: None,
            precondition: None,
            steps: vec![step("输入错误密码", "提示密码错误")],
            priority: Priority::P1,
            status: TestCaseStatus::Untested,
            creator_id: Some(tester.id.clone()),
        })
        .await?;

        self.create_requirement(NewRequirement {
            project_id: project.id.clone(),
            title: "支持手机号登录".to_string(),
            description: None,
            priority: Priority::P1,
            status: RequirementStatus::Approved,
            creator_id: Some(admin.id.clone()),
        })
        .await?;

        self.create_defect(NewDefect {
            project_id: project.id.clone(),
            title: "结算时金额计算错误".to_string(),
            description: Some("两件商品总价少算一件".to_string()),
            severity: Severity::High,
            priority: Priority::P1,
            status: DefectStatus::Open,
            test_case_id: Some(checkout.id.clone()),
            assignee_id: Some(developer.id.clone()),
            reporter_id: Some(tester.id.clone()),
        })
        .await?;

        self.create_test_plan(NewTestPlan {
            project_id: project.id.clone(),
            name: "v1.0 回归测试".to_string(),
            description: None,
            status: TestPlanStatus::Active,
            creator_id: Some(admin.id.clone()),
        })
        .await?;

        info!("Seeded demo project {}", project.id);
        Ok(project.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testhub_domain::{DefectFilter, TestCaseFilter};

    #[tokio::test]
    async fn test_seed_creates_linked_records() {
        let store = InMemoryTestStore::new();
        let project_id = store.seed_demo_data().await.unwrap();

        let cases = store
            .count_test_cases(&TestCaseFilter::for_project(Some(project_id.as_str())))
            .await
            .unwrap();
        assert_eq!(cases, 3);

        let defects = store
            .list_defects(&DefectFilter::for_project(Some(project_id.as_str())))
            .await
            .unwrap();
        assert_eq!(defects.len(), 1);
        assert_eq!(defects[0].assignee.as_deref(), Some("王强"));
    }
}
