//! Wire types for the Gemini `generateContent` API and conversions to and
//! from domain types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use testhub_application::{GatewayError, ToolResultMessage};
use testhub_domain::{ContentBlock, ConversationTurn, LlmResponse, Role, StopReason};

pub const USER_ROLE: &str = "user";
pub const MODEL_ROLE: &str = "model";

// ─── Wire format ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user_text(text: &str) -> Self {
        Self {
            role: USER_ROLE.to_string(),
            parts: vec![Part::text(text)],
        }
    }

    /// System instructions carry no role.
    pub fn system(text: &str) -> Self {
        Self {
            role: String::new(),
            parts: vec![Part::text(text)],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
    /// Opaque token the API expects back verbatim on the next request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought_signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
}

impl Part {
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub response: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest<'a> {
    pub contents: &'a [Content],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<&'a Content>,
    #[serde(skip_serializing_if = "no_tools")]
    pub tools: &'a [Value],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<&'a GenerationConfig>,
}

fn no_tools(tools: &&[Value]) -> bool {
    tools.is_empty()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<Value>,
    #[serde(default)]
    pub model_version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

// ─── Domain → Gemini ─────────────────────────────────────────────

/// Convert prior turns into Gemini contents.
///
/// The API requires the conversation to open with a user turn and to
/// alternate roles, so leading model turns are dropped and consecutive
/// turns of the same role are merged into one content with several parts.
pub fn history_contents(turns: &[ConversationTurn]) -> Vec<Content> {
    let mut contents: Vec<Content> = Vec::new();
    for turn in turns.iter().skip_while(|t| !t.is_user()) {
        let role = match turn.role {
            Role::User => USER_ROLE,
            Role::Assistant => MODEL_ROLE,
        };
        match contents.last_mut() {
            Some(last) if last.role == role => last.parts.push(Part::text(&turn.text)),
            _ => contents.push(Content {
                role: role.to_string(),
                parts: vec![Part::text(&turn.text)],
            }),
        }
    }
    contents
}

/// Wrap the tool catalogue as one Gemini `tools` entry.
pub fn tool_declarations(tools: &[Value]) -> Vec<Value> {
    if tools.is_empty() {
        return Vec::new();
    }
    vec![json!({ "functionDeclarations": tools })]
}

/// One user content answering every call of a batch.
///
/// `functionResponse.response` must be a JSON object; other payloads are
/// wrapped as `{"result": …}`.
pub fn function_responses(results: &[ToolResultMessage]) -> Content {
    let parts = results
        .iter()
        .map(|result| {
            let response = match &result.response {
                Value::Object(_) => result.response.clone(),
                other => json!({ "result": other }),
            };
            Part {
                function_response: Some(FunctionResponse {
                    id: None,
                    name: result.tool_name.clone(),
                    response,
                }),
                ..Default::default()
            }
        })
        .collect();

    Content {
        role: USER_ROLE.to_string(),
        parts,
    }
}

// ─── Gemini → Domain ─────────────────────────────────────────────

pub fn convert_finish_reason(reason: Option<&str>, has_calls: bool) -> StopReason {
    if has_calls {
        return StopReason::ToolUse;
    }
    match reason {
        None | Some("STOP") => StopReason::EndTurn,
        Some("MAX_TOKENS") => StopReason::MaxTokens,
        Some(other) => StopReason::Other(other.to_string()),
    }
}

/// Convert the first candidate into an [`LlmResponse`] and the model content
/// to append to the history.
///
/// Gemini does not always assign call ids, so missing ones are synthesized
/// from `next_call_id` (`call-1`, `call-2`, …).
pub fn convert_response(
    response: GenerateContentResponse,
    model: &str,
    next_call_id: &mut usize,
) -> Result<(LlmResponse, Content), GatewayError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.get("blockReason"))
            .and_then(Value::as_str)
            .unwrap_or("no candidates");
        return Err(GatewayError::InvalidResponse(format!(
            "Gemini returned no candidates ({})",
            reason
        )));
    };

    let mut content = candidate.content.unwrap_or(Content {
        role: MODEL_ROLE.to_string(),
        parts: Vec::new(),
    });
    content.role = MODEL_ROLE.to_string();

    let mut blocks = Vec::new();
    for part in &content.parts {
        if part.thought == Some(true) {
            continue;
        }
        if let Some(text) = part.text.as_deref().filter(|t| !t.is_empty()) {
            blocks.push(ContentBlock::text(text));
        }
        if let Some(call) = &part.function_call {
            let id = call.id.clone().unwrap_or_else(|| {
                *next_call_id += 1;
                format!("call-{}", next_call_id)
            });
            let input: HashMap<String, Value> = match &call.args {
                Value::Object(map) => map.clone().into_iter().collect(),
                _ => HashMap::new(),
            };
            blocks.push(ContentBlock::ToolUse {
                id,
                name: call.name.clone(),
                input,
            });
        }
    }

    let has_calls = blocks
        .iter()
        .any(|b| matches!(b, ContentBlock::ToolUse { .. }));
    let llm_response = LlmResponse {
        content: blocks,
        stop_reason: Some(convert_finish_reason(
            candidate.finish_reason.as_deref(),
            has_calls,
        )),
        model: Some(response.model_version.unwrap_or_else(|| model.to_string())),
    };
    Ok((llm_response, content))
}

/// Map a non-success HTTP status to a gateway error.
pub fn convert_http_error(status: u16, body: &str) -> GatewayError {
    let message = serde_json::from_str::<Map<String, Value>>(body)
        .ok()
        .and_then(|m| m.get("error")?.get("message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string());

    match status {
        401 | 403 => GatewayError::RequestFailed(format!("Authentication failed: {}", message)),
        408 | 504 => GatewayError::Timeout,
        429 => GatewayError::RequestFailed(format!("Rate limited: {}", message)),
        _ => GatewayError::RequestFailed(format!("HTTP {}: {}", status, message)),
    }
}

/// Map a transport error to a gateway error.
pub fn convert_transport_error(err: &reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else if err.is_connect() {
        GatewayError::ConnectionError(err.to_string())
    } else if err.is_decode() {
        GatewayError::InvalidResponse(err.to_string())
    } else {
        GatewayError::RequestFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: Value) -> GenerateContentResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_history_drops_leading_model_turns_and_merges_roles() {
        let turns = vec![
            ConversationTurn::assistant("你好，我是测试助手"),
            ConversationTurn::user("列出项目"),
            ConversationTurn::user("只要前两个"),
            ConversationTurn::assistant("好的"),
        ];

        let contents = history_contents(&turns);

        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0].role, USER_ROLE);
        assert_eq!(contents[0].parts.len(), 2);
        assert_eq!(contents[1].role, MODEL_ROLE);
        assert_eq!(contents[1].parts[0].text.as_deref(), Some("好的"));
    }

    #[test]
    fn test_function_responses_wrap_non_objects() {
        let results = vec![
            ToolResultMessage {
                call_id: "call-1".to_string(),
                tool_name: "query_projects".to_string(),
                response: json!([{"id": "p1"}]),
            },
            ToolResultMessage {
                call_id: "call-2".to_string(),
                tool_name: "get_statistics".to_string(),
                response: json!({"total": 3}),
            },
        ];

        let content = function_responses(&results);

        assert_eq!(content.role, USER_ROLE);
        let first = content.parts[0].function_response.as_ref().unwrap();
        assert_eq!(first.response, json!({"result": [{"id": "p1"}]}));
        let second = content.parts[1].function_response.as_ref().unwrap();
        assert_eq!(second.response, json!({"total": 3}));
    }

    #[test]
    fn test_convert_response_synthesizes_call_ids() {
        let body = parse(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"functionCall": {"name": "query_projects", "args": {"limit": 2}},
                         "thoughtSignature": "sig-1"},
                        {"functionCall": {"name": "query_users", "args": {}}}
                    ]
                },
                "finishReason": "STOP"
            }]
        }));
        let mut seq = 0;

        let (response, content) = convert_response(body, "gemini-2.0-flash", &mut seq).unwrap();

        let calls = response.tool_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].native_id.as_deref(), Some("call-1"));
        assert_eq!(calls[1].native_id.as_deref(), Some("call-2"));
        assert_eq!(response.stop_reason, Some(StopReason::ToolUse));
        assert_eq!(content.parts[0].thought_signature.as_deref(), Some("sig-1"));
        assert_eq!(seq, 2);
    }

    #[test]
    fn test_convert_response_text_skips_thoughts() {
        let body = parse(json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "thinking...", "thought": true},
                    {"text": "共有 3 个项目。"}
                ]},
                "finishReason": "STOP"
            }],
            "modelVersion": "gemini-2.0-flash-001"
        }));
        let mut seq = 0;

        let (response, content) = convert_response(body, "gemini-2.0-flash", &mut seq).unwrap();

        assert_eq!(response.text_content(), "共有 3 个项目。");
        assert_eq!(response.stop_reason, Some(StopReason::EndTurn));
        assert_eq!(response.model.as_deref(), Some("gemini-2.0-flash-001"));
        assert_eq!(content.role, MODEL_ROLE);
    }

    #[test]
    fn test_convert_response_blocked_prompt() {
        let body = parse(json!({"promptFeedback": {"blockReason": "SAFETY"}}));
        let mut seq = 0;

        let err = convert_response(body, "m", &mut seq).unwrap_err();

        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_convert_http_error_extracts_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid"}}"#;
        let err = convert_http_error(400, body);
        assert_eq!(
            err.to_string(),
            "Request failed: HTTP 400: API key not valid"
        );
        assert!(matches!(convert_http_error(504, ""), GatewayError::Timeout));
    }

    #[test]
    fn test_request_serialization() {
        let contents = vec![Content::user_text("hi")];
        let system = Content::system("be brief");
        let tools = tool_declarations(&[json!({"name": "query_projects"})]);
        let config = GenerationConfig {
            temperature: Some(0.2),
        };
        let request = GenerateContentRequest {
            contents: &contents,
            system_instruction: Some(&system),
            tools: &tools,
            generation_config: Some(&config),
        };

        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "be brief");
        assert_eq!(
            value["tools"][0]["functionDeclarations"][0]["name"],
            "query_projects"
        );
        let temperature = value["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.2).abs() < 1e-6);
    }
}
