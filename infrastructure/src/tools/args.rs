//! Argument decoding shared by the tool handlers.
//!
//! Calls have already passed [`DefaultToolValidator`] when they get here, so
//! a decoding failure is rare and reported the same way: `参数错误: ...`.
//!
//! [`DefaultToolValidator`]: testhub_domain::DefaultToolValidator

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use testhub_application::StoreError;
use testhub_domain::{ToolCall, ToolError};

pub(crate) type HandlerResult = Result<serde_json::Value, ToolError>;

/// Decode the call's present arguments into a typed argument struct.
pub(crate) fn parse_args<T: DeserializeOwned>(call: &ToolCall) -> Result<T, ToolError> {
    call.parse_arguments().map_err(ToolError::invalid_argument)
}

pub(crate) fn store_failure(error: StoreError) -> ToolError {
    ToolError::execution_failed(error)
}

pub(crate) fn to_payload<T: Serialize>(value: &T) -> HandlerResult {
    serde_json::to_value(value).map_err(ToolError::execution_failed)
}

/// Blank strings count as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// `limit` arrives as a JSON number, which models sometimes write as `5.0`.
pub(crate) fn deserialize_limit<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(n) if n.is_finite() && n >= 1.0 => Ok(Some(n as usize)),
        Some(n) => Err(D::Error::custom(format!(
            "limit must be a positive number, got {n}"
        ))),
    }
}

/// Identity of an update/delete target: an explicit id or a title fragment,
/// optionally scoped to a project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct EntityRef {
    pub id: Option<String>,
    pub search_title: Option<String>,
    pub project_id: Option<String>,
}

impl EntityRef {
    pub fn new(id: Option<String>, search_title: Option<String>, project_id: Option<String>) -> Self {
        Self {
            id: non_blank(id),
            search_title: non_blank(search_title),
            project_id: non_blank(project_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct LimitOnly {
        #[serde(default, deserialize_with = "deserialize_limit")]
        limit: Option<usize>,
    }

    #[test]
    fn test_limit_accepts_integer_and_float() {
        let args: LimitOnly = parse_args(&ToolCall::new("q").with_arg("limit", 5)).unwrap();
        assert_eq!(args.limit, Some(5));
        let args: LimitOnly = parse_args(&ToolCall::new("q").with_arg("limit", 7.0)).unwrap();
        assert_eq!(args.limit, Some(7));
        let args: LimitOnly = parse_args(&ToolCall::new("q")).unwrap();
        assert_eq!(args.limit, None);
    }

    #[test]
    fn test_limit_rejects_non_positive() {
        let err = parse_args::<LimitOnly>(&ToolCall::new("q").with_arg("limit", json!(0)))
            .unwrap_err();
        assert!(err.message.starts_with("参数错误"));
        assert!(err.message.contains("limit must be a positive number"));
    }

    #[test]
    fn test_null_argument_is_absent() {
        let call = ToolCall::new("q").with_arg("limit", serde_json::Value::Null);
        let args: LimitOnly = parse_args(&call).unwrap();
        assert_eq!(args.limit, None);
    }

    #[test]
    fn test_entity_ref_drops_blank_values() {
        let reference = EntityRef::new(Some(" ".to_string()), Some("登录".to_string()), None);
        assert!(reference.id.is_none());
        assert_eq!(reference.search_title.as_deref(), Some("登录"));
    }
}
