//! Route handlers.

use super::dto::{ChatRequest, HealthResponse};
use super::error::AppError;
use super::state::AppState;
use super::stream::spawn_chat;
use axum::Json;
use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, CONNECTION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use tracing::{info, warn};

/// `POST /api/chat`
///
/// Validation failures are answered with a JSON error before any streaming
/// starts; after that the outcome is only ever reported inside the body.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Response, AppError> {
    if request.messages.is_empty() {
        warn!("Rejected chat request without messages");
        return Err(AppError::EmptyMessages);
    }
    state.chat.ensure_ready()?;

    info!(
        messages = request.messages.len(),
        project = request.current_project_id.as_deref().unwrap_or("-"),
        "Chat request"
    );

    let input = request.into_input(state.execution.clone());
    let body = spawn_chat(state.chat.clone(), input);
    let headers = [
        (CONTENT_TYPE, "text/plain; charset=utf-8"),
        (CACHE_CONTROL, "no-cache"),
        (CONNECTION, "keep-alive"),
    ];
    Ok((headers, body).into_response())
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: state.chat.model_name().to_string(),
        tools: state.chat.tool_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use testhub_application::{
        ChatMessage, ExecutionParams, GatewayError, LlmGateway, LlmSession, RunChatUseCase,
        ToolResultMessage,
    };
    use testhub_domain::{ContentBlock, ConversationTurn, LlmResponse, StopReason};
    use testhub_infrastructure::{InMemoryTestStore, JsonSchemaToolConverter, StoreToolExecutor};

    // ==================== Test Mocks ====================

    type Script = Arc<Mutex<VecDeque<Result<LlmResponse, GatewayError>>>>;

    struct ScriptedSession {
        script: Script,
        tool_results: Arc<Mutex<Vec<Vec<ToolResultMessage>>>>,
    }

    impl ScriptedSession {
        fn next(&self) -> Result<LlmResponse, GatewayError> {
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::Other("script exhausted".to_string())))
        }
    }

    #[async_trait]
    impl LlmSession for ScriptedSession {
        async fn send_with_tools(
            &self,
            _content: &str,
            _tools: &[Value],
        ) -> Result<LlmResponse, GatewayError> {
            self.next()
        }

        async fn send_tool_results(
            &self,
            results: &[ToolResultMessage],
        ) -> Result<LlmResponse, GatewayError> {
            self.tool_results.lock().unwrap().push(results.to_vec());
            self.next()
        }
    }

    struct ScriptedGateway {
        ready: bool,
        script: Script,
        tool_results: Arc<Mutex<Vec<Vec<ToolResultMessage>>>>,
    }

    impl ScriptedGateway {
        fn new(responses: Vec<Result<LlmResponse, GatewayError>>) -> Self {
            Self {
                ready: true,
                script: Arc::new(Mutex::new(responses.into())),
                tool_results: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        fn model_name(&self) -> &str {
            "scripted"
        }

        fn ensure_ready(&self) -> Result<(), GatewayError> {
            if self.ready {
                Ok(())
            } else {
                Err(GatewayError::MissingCredential)
            }
        }

        async fn create_session(
            &self,
            _system_prompt: &str,
            _history: &[ConversationTurn],
        ) -> Result<Box<dyn LlmSession>, GatewayError> {
            Ok(Box::new(ScriptedSession {
                script: self.script.clone(),
                tool_results: self.tool_results.clone(),
            }))
        }
    }

    fn tool_use(id: &str, name: &str, input: Value) -> ContentBlock {
        ContentBlock::ToolUse {
            id: id.to_string(),
            name: name.to_string(),
            input: input
                .as_object()
                .map(|m| m.clone().into_iter().collect())
                .unwrap_or_default(),
        }
    }

    fn tool_response(blocks: Vec<ContentBlock>) -> LlmResponse {
        LlmResponse {
            content: blocks,
            stop_reason: Some(StopReason::ToolUse),
            model: None,
        }
    }

    fn state_with(gateway: ScriptedGateway, store: Arc<InMemoryTestStore>) -> AppState {
        let chat = RunChatUseCase::new(
            Arc::new(gateway),
            Arc::new(StoreToolExecutor::new(store)),
            Arc::new(JsonSchemaToolConverter),
        );
        AppState::new(chat, ExecutionParams::default())
    }

    fn request(project: Option<&str>) -> ChatRequest {
        ChatRequest {
            messages: vec![ChatMessage::user("创建一个标题为X的测试用例")],
            current_user_id: None,
            current_project_id: project.map(str::to_string),
        }
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_empty_messages_rejected_before_model() {
        let gateway = ScriptedGateway::new(vec![]);
        let state = state_with(gateway, Arc::new(InMemoryTestStore::new()));
        let req = ChatRequest {
            messages: vec![],
            current_user_id: None,
            current_project_id: None,
        };

        let err = chat(State(state), Json(req)).await.unwrap_err();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let response = err.into_response();
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["error"], "messages must be a non-empty array");
    }

    #[tokio::test]
    async fn test_missing_credential_fails_before_stream() {
        let mut gateway = ScriptedGateway::new(vec![]);
        gateway.ready = false;
        let state = state_with(gateway, Arc::new(InMemoryTestStore::new()));

        let err = chat(State(state), Json(request(None))).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::NotReady(GatewayError::MissingCredential)
        ));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_plain_answer_streams_without_notices() {
        let gateway = ScriptedGateway::new(vec![Ok(LlmResponse::from_text("你好！"))]);
        let state = state_with(gateway, Arc::new(InMemoryTestStore::new()));

        let response = chat(State(state), Json(request(None))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(headers[CACHE_CONTROL], "no-cache");
        assert_eq!(headers[CONNECTION], "keep-alive");
        assert_eq!(body_text(response).await, "你好！");
    }

    #[tokio::test]
    async fn test_create_case_in_current_project() {
        let store = Arc::new(InMemoryTestStore::new());
        let project_id = store.seed_demo_data().await.unwrap();
        let gateway = ScriptedGateway::new(vec![
            Ok(tool_response(vec![tool_use(
                "call-1",
                "create_test_case",
                json!({"projectId": &project_id, "title": "X"}),
            )])),
            Ok(LlmResponse::from_text("已创建测试用例 X。")),
        ]);
        let tool_results = gateway.tool_results.clone();
        let state = state_with(gateway, store);

        let response = chat(State(state), Json(request(Some(project_id.as_str()))))
            .await
            .unwrap();

        assert_eq!(
            body_text(response).await,
            "\n正在执行: create_test_case...\n已创建测试用例 X。"
        );
        let batches = tool_results.lock().unwrap();
        assert_eq!(batches.len(), 1);
        let created = &batches[0][0].response["testCase"];
        assert_eq!(created["status"], "UNTESTED");
        assert_eq!(created["priority"], "P2");
        assert_eq!(created["projectId"], json!(&project_id));
    }

    #[tokio::test]
    async fn test_two_calls_two_notices_one_follow_up() {
        let gateway = ScriptedGateway::new(vec![
            Ok(tool_response(vec![
                tool_use("a", "query_projects", json!({})),
                tool_use("b", "get_statistics", json!({})),
            ])),
            Ok(LlmResponse::from_text("统计完成")),
        ]);
        let tool_results = gateway.tool_results.clone();
        let state = state_with(gateway, Arc::new(InMemoryTestStore::new()));

        let response = chat(State(state), Json(request(None))).await.unwrap();

        assert_eq!(
            body_text(response).await,
            "\n正在执行: query_projects...\n\n正在执行: get_statistics...\n统计完成"
        );
        let batches = tool_results.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 2);
    }

    #[tokio::test]
    async fn test_gateway_failure_mid_loop_writes_apology() {
        let gateway = ScriptedGateway::new(vec![
            Ok(tool_response(vec![tool_use("a", "query_users", json!({}))])),
            Err(GatewayError::RequestFailed("boom".to_string())),
        ]);
        let state = state_with(gateway, Arc::new(InMemoryTestStore::new()));

        let response = chat(State(state), Json(request(None))).await.unwrap();

        assert_eq!(
            body_text(response).await,
            "\n正在执行: query_users...\n\n抱歉，处理您的请求时出现错误: Gateway error: Request failed: boom"
        );
    }

    #[tokio::test]
    async fn test_health_reports_model_and_tools() {
        let state = state_with(
            ScriptedGateway::new(vec![]),
            Arc::new(InMemoryTestStore::new()),
        );

        let Json(health) = health(State(state)).await;

        assert_eq!(health.status, "ok");
        assert_eq!(health.model, "scripted");
        assert_eq!(health.tools, 18);
    }
}
