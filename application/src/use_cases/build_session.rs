//! Conversation session builder.
//!
//! Turns the client's transcript and context ids into what the model
//! consumes: system instructions, prior turns in the two-role schema, and the
//! message that opens this request's loop.

use serde::{Deserialize, Serialize};
use testhub_domain::{ConversationTurn, DomainError, Role, SessionContext};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionBuildError {
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// A message as the client sends it. `role` is free-form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

/// Everything needed to open a model session for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    pub system_prompt: String,
    /// Every message except the last, with roles collapsed.
    pub history: Vec<ConversationTurn>,
    /// Content of the last message; sent as the new user turn.
    pub latest: String,
}

/// Build the session plan for a request.
///
/// Fails only when `messages` is empty.
pub fn build_session(
    messages: &[ChatMessage],
    context: &SessionContext,
) -> Result<SessionPlan, SessionBuildError> {
    let (last, earlier) = messages
        .split_last()
        .ok_or(DomainError::EmptyConversation)?;

    let history = earlier
        .iter()
        .map(|m| ConversationTurn::new(Role::from_client(&m.role), m.content.clone()))
        .collect();

    Ok(SessionPlan {
        system_prompt: system_prompt(context),
        history,
        latest: last.content.clone(),
    })
}

const OPERATING_PRINCIPLES: &str = r#"你是测试管理平台的智能助手，可以通过工具查询和管理项目、测试用例、需求、缺陷和测试计划。

## 工作原则
1. 直接行动，不要反问：当用户意图明确时，立即调用相应工具完成操作，不要要求用户提供ID。
2. 引用已有数据时优先使用标题：更新或删除测试用例、需求、缺陷时，如果不知道ID，使用 searchTitle 参数按标题关键词查找。
3. 如果工具返回多个匹配结果(matches)，请列出候选项并请用户确认具体是哪一个；如果未找到，根据 suggestion 提示用户。
4. 创建数据时，未指定的优先级默认为 P2，测试用例状态默认为 UNTESTED，缺陷状态默认为 OPEN。
5. 只使用工具返回的数据回答，不要编造ID或统计数字。
6. 使用简洁的中文回复，操作完成后说明执行结果。

## 取值范围
- 测试用例状态: UNTESTED, PASSED, FAILED, BLOCKED, SKIPPED
- 需求状态: DRAFT, PENDING_REVIEW, APPROVED, IN_PROGRESS, COMPLETED
- 缺陷状态: OPEN, IN_PROGRESS, RESOLVED, CLOSED
- 缺陷严重程度: LOW, MEDIUM, HIGH, CRITICAL
- 优先级: P0, P1, P2, P3

## 示例
- "把登录测试标记为通过" → update_test_case(searchTitle="登录", status="PASSED")
- "登录失败那个用例执行失败了" → update_test_case(searchTitle="登录失败", status="FAILED")
- "创建一个标题为X的测试用例" → create_test_case(projectId=当前项目, title="X")
- "提个缺陷：支付页面白屏，很严重" → create_defect(projectId=当前项目, title="支付页面白屏", severity="CRITICAL")
- "需求'导出报表'已经评审通过了" → update_requirement(searchTitle="导出报表", status="APPROVED")
- "删掉那个重复的注册用例" → delete_test_case(searchTitle="注册")
- "现在测试通过率怎么样" → get_statistics(projectId=当前项目, type="testcases")
- "还有哪些严重缺陷没解决" → query_defects(projectId=当前项目, severity="CRITICAL", status="OPEN")"#;

/// System instructions with the caller's context ids injected.
pub fn system_prompt(context: &SessionContext) -> String {
    let mut prompt = String::from(OPERATING_PRINCIPLES);
    prompt.push_str("\n\n## 当前上下文\n");

    match &context.current_project_id {
        Some(id) => prompt.push_str(&format!(
            "- 当前项目ID: {id}。用户未指定项目时，所有工具的 projectId 默认使用该值。\n"
        )),
        None => prompt.push_str("- 当前未选择项目。需要项目时，可先使用 query_projects 查找。\n"),
    }

    if let Some(id) = &context.current_user_id {
        prompt.push_str(&format!(
            "- 当前用户ID: {id}。创建数据时 creatorId / reporterId / ownerId 默认使用该值。\n"
        ));
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_messages_rejected() {
        let err = build_session(&[], &SessionContext::default()).unwrap_err();
        assert!(matches!(
            err,
            SessionBuildError::Domain(DomainError::EmptyConversation)
        ));
    }

    #[test]
    fn test_single_message_has_no_history() {
        let plan = build_session(&[ChatMessage::user("你好")], &SessionContext::default()).unwrap();
        assert!(plan.history.is_empty());
        assert_eq!(plan.latest, "你好");
    }

    #[test]
    fn test_roles_collapse_to_two() {
        let messages = vec![
            ChatMessage::user("查一下缺陷"),
            ChatMessage::new("assistant", "共有 3 个缺陷"),
            ChatMessage::new("system", "ignored role"),
            ChatMessage::user("第一个是什么"),
        ];
        let plan = build_session(&messages, &SessionContext::default()).unwrap();

        assert_eq!(plan.history.len(), 3);
        assert_eq!(plan.history[0].role, Role::User);
        assert_eq!(plan.history[1].role, Role::Assistant);
        assert_eq!(plan.history[2].role, Role::Assistant);
        assert_eq!(plan.latest, "第一个是什么");
    }

    #[test]
    fn test_context_ids_injected() {
        let context = SessionContext::new(Some("P1".to_string()), Some("U7".to_string()));
        let prompt = system_prompt(&context);
        assert!(prompt.contains("当前项目ID: P1"));
        assert!(prompt.contains("当前用户ID: U7"));
        assert!(prompt.contains("searchTitle"));
    }

    #[test]
    fn test_prompt_without_context() {
        let prompt = system_prompt(&SessionContext::default());
        assert!(prompt.contains("当前未选择项目"));
        assert!(!prompt.contains("当前用户ID"));
    }
}
