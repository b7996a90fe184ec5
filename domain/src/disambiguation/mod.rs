//! Disambiguation of title-based references.
//!
//! Update and delete tools let the model name an entity by a fragment of its
//! title instead of an id. Resolution is read-only: the store is asked for at
//! most [`MAX_CANDIDATES`] case-insensitive substring matches and the result
//! is classified here.
//!
//! | Input | Matches | Outcome |
//! |-------|---------|---------|
//! | id given | – | `Resolved(id)` (store not consulted) |
//! | neither id nor fragment | – | `InsufficientInput` |
//! | fragment | 0 | `NotFound` with a suggestion |
//! | fragment | 1 | `Resolved(id)` |
//! | fragment | >1 | `Ambiguous` with every candidate |

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Upper bound on candidates fetched for one fragment.
pub const MAX_CANDIDATES: usize = 5;

/// Entity families that support look-up by title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    TestCase,
    Requirement,
    Defect,
}

impl EntityKind {
    /// Display name used in messages to the model.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::TestCase => "测试用例",
            EntityKind::Requirement => "需求",
            EntityKind::Defect => "缺陷",
        }
    }

    /// The query tool the model can use to refine its search.
    pub fn query_tool(&self) -> &'static str {
        match self {
            EntityKind::TestCase => "query_test_cases",
            EntityKind::Requirement => "query_requirements",
            EntityKind::Defect => "query_defects",
        }
    }
}

/// A possible match for a fuzzy reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub title: String,
    pub status: String,
    #[serde(rename = "projectId")]
    pub project_id: String,
}

/// Outcome of resolving an id-or-title reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisambiguationOutcome {
    Resolved(String),
    NotFound { query: String, suggestion: String },
    Ambiguous { query: String, candidates: Vec<Candidate> },
    InsufficientInput,
}

impl DisambiguationOutcome {
    /// Classify the candidates found for `query`.
    pub fn classify(kind: EntityKind, query: &str, mut candidates: Vec<Candidate>) -> Self {
        match candidates.len() {
            0 => DisambiguationOutcome::NotFound {
                query: query.to_string(),
                suggestion: format!(
                    "请提供更准确的标题关键词，或先使用 {} 查询{}列表",
                    kind.query_tool(),
                    kind.label()
                ),
            },
            1 => DisambiguationOutcome::Resolved(candidates.remove(0).id),
            _ => DisambiguationOutcome::Ambiguous {
                query: query.to_string(),
                candidates,
            },
        }
    }

    pub fn resolved_id(&self) -> Option<&str> {
        match self {
            DisambiguationOutcome::Resolved(id) => Some(id),
            _ => None,
        }
    }

    /// The `{success:false, ...}` payload reported to the model when the
    /// reference did not resolve to exactly one entity.
    pub fn failure_payload(&self, kind: EntityKind) -> Option<Value> {
        match self {
            DisambiguationOutcome::Resolved(_) => None,
            DisambiguationOutcome::NotFound { query, suggestion } => Some(json!({
                "success": false,
                "error": format!("未找到标题包含\"{}\"的{}", query, kind.label()),
                "suggestion": suggestion,
            })),
            DisambiguationOutcome::Ambiguous { query, candidates } => Some(json!({
                "success": false,
                "error": format!(
                    "找到{}个标题包含\"{}\"的{}，请指定具体是哪一个",
                    candidates.len(),
                    query,
                    kind.label()
                ),
                "matches": candidates,
            })),
            DisambiguationOutcome::InsufficientInput => Some(json!({
                "success": false,
                "error": format!("请提供{}的ID或标题(searchTitle)", kind.label()),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, title: &str) -> Candidate {
        Candidate {
            id: id.to_string(),
            title: title.to_string(),
            status: "UNTESTED".to_string(),
            project_id: "P1".to_string(),
        }
    }

    #[test]
    fn classify_zero_is_not_found() {
        let outcome = DisambiguationOutcome::classify(EntityKind::TestCase, "登录", vec![]);
        let payload = outcome.failure_payload(EntityKind::TestCase).unwrap();
        assert_eq!(payload["success"], false);
        assert!(payload["error"].as_str().unwrap().contains("登录"));
        assert!(payload["suggestion"].as_str().unwrap().contains("query_test_cases"));
    }

    #[test]
    fn classify_one_is_resolved() {
        let outcome = DisambiguationOutcome::classify(
            EntityKind::Defect,
            "crash",
            vec![candidate("D1", "App crash on start")],
        );
        assert_eq!(outcome, DisambiguationOutcome::Resolved("D1".to_string()));
        assert!(outcome.failure_payload(EntityKind::Defect).is_none());
    }

    #[test]
    fn classify_many_is_ambiguous_with_all_matches() {
        let outcome = DisambiguationOutcome::classify(
            EntityKind::TestCase,
            "login",
            vec![candidate("T1", "login ok"), candidate("T2", "login fails")],
        );
        let payload = outcome.failure_payload(EntityKind::TestCase).unwrap();
        assert_eq!(payload["success"], false);
        assert_eq!(payload["matches"].as_array().unwrap().len(), 2);
        assert_eq!(payload["matches"][1]["id"], "T2");
        assert_eq!(payload["matches"][0]["projectId"], "P1");
    }

    #[test]
    fn insufficient_input_payload() {
        let payload = DisambiguationOutcome::InsufficientInput
            .failure_payload(EntityKind::Requirement)
            .unwrap();
        assert_eq!(payload["success"], false);
        assert!(payload["error"].as_str().unwrap().contains("需求"));
    }
}
