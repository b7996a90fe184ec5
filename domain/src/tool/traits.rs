//! Tool domain traits
//!
//! Contains pure domain logic traits for tool validation.
//! The async ToolExecutorPort is defined in the application layer (ports).

use super::entities::{ParamType, ToolCall, ToolDefinition};
use serde_json::Value;

/// Validator for tool calls
///
/// This is a pure domain trait that validates tool calls
/// against their definitions without any I/O operations.
pub trait ToolValidator {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String>;
}

/// Default implementation of ToolValidator
///
/// `null` arguments count as absent.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String> {
        for param in definition.required_parameters() {
            let present = call
                .arguments
                .get(&param.name)
                .is_some_and(|v| !v.is_null());
            if !present {
                return Err(format!(
                    "Missing required parameter '{}' for tool '{}'",
                    param.name, definition.name
                ));
            }
        }

        for (name, value) in call.present_arguments() {
            let Some(param) = definition.parameter(name) else {
                return Err(format!(
                    "Unknown parameter '{}' for tool '{}'",
                    name, definition.name
                ));
            };
            check_type(name, value, &param.param_type)?;
        }

        Ok(())
    }
}

fn check_type(name: &str, value: &Value, param_type: &ParamType) -> Result<(), String> {
    match param_type {
        ParamType::String if !value.is_string() => Err(format!(
            "Parameter '{}' must be a string, got {}",
            name,
            json_kind(value)
        )),
        ParamType::Number if !value.is_number() => Err(format!(
            "Parameter '{}' must be a number, got {}",
            name,
            json_kind(value)
        )),
        ParamType::Array { item_fields } => {
            let Some(items) = value.as_array() else {
                return Err(format!(
                    "Parameter '{}' must be an array, got {}",
                    name,
                    json_kind(value)
                ));
            };
            for item in items {
                let ok = item.is_string() || (!item_fields.is_empty() && item.is_object());
                if !ok {
                    return Err(format!(
                        "Parameter '{}' contains an invalid item: {}",
                        name,
                        json_kind(item)
                    ));
                }
            }
            Ok(())
        }
        ParamType::Enum { values } => match value.as_str() {
            Some(s) if values.iter().any(|v| v == s) => Ok(()),
            Some(s) => Err(format!(
                "Parameter '{}' must be one of [{}], got '{}'",
                name,
                values.join(", "),
                s
            )),
            None => Err(format!(
                "Parameter '{}' must be a string, got {}",
                name,
                json_kind(value)
            )),
        },
        _ => Ok(()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::ToolParameter;
    use serde_json::json;

    fn definition() -> ToolDefinition {
        ToolDefinition::new("create_test_case", "Create a test case")
            .with_parameter(ToolParameter::new("projectId", "Project", true))
            .with_parameter(ToolParameter::new("title", "Title", true))
            .with_parameter(
                ToolParameter::new("priority", "Priority", false)
                    .with_values(&["P0", "P1", "P2", "P3"]),
            )
            .with_parameter(ToolParameter::new("limit", "Limit", false).with_type(ParamType::Number))
            .with_parameter(ToolParameter::new("steps", "Steps", false).with_type(
                ParamType::Array {
                    item_fields: vec!["action".to_string(), "expected".to_string()],
                },
            ))
    }

    #[test]
    fn test_validator_missing_required() {
        let call = ToolCall::new("create_test_case").with_arg("projectId", "P1");
        let result = DefaultToolValidator.validate(&call, &definition());
        assert!(result.unwrap_err().contains("Missing required parameter 'title'"));
    }

    #[test]
    fn test_validator_null_required_is_missing() {
        let call = ToolCall::new("create_test_case")
            .with_arg("projectId", "P1")
            .with_arg("title", Value::Null);
        assert!(DefaultToolValidator.validate(&call, &definition()).is_err());
    }

    #[test]
    fn test_validator_unknown_param() {
        let call = ToolCall::new("create_test_case")
            .with_arg("projectId", "P1")
            .with_arg("title", "Login")
            .with_arg("owner", "bob");
        let result = DefaultToolValidator.validate(&call, &definition());
        assert!(result.unwrap_err().contains("Unknown parameter 'owner'"));
    }

    #[test]
    fn test_validator_enum_outside_set() {
        let call = ToolCall::new("create_test_case")
            .with_arg("projectId", "P1")
            .with_arg("title", "Login")
            .with_arg("priority", "URGENT");
        let result = DefaultToolValidator.validate(&call, &definition());
        assert!(result.unwrap_err().contains("must be one of [P0, P1, P2, P3]"));
    }

    #[test]
    fn test_validator_wrong_type() {
        let call = ToolCall::new("create_test_case")
            .with_arg("projectId", json!(42))
            .with_arg("title", "Login");
        let result = DefaultToolValidator.validate(&call, &definition());
        assert!(result.unwrap_err().contains("must be a string, got number"));

        let call = ToolCall::new("create_test_case")
            .with_arg("projectId", "P1")
            .with_arg("title", "Login")
            .with_arg("limit", "ten");
        assert!(DefaultToolValidator.validate(&call, &definition()).is_err());
    }

    #[test]
    fn test_validator_array_items() {
        let ok = ToolCall::new("create_test_case")
            .with_arg("projectId", "P1")
            .with_arg("title", "Login")
            .with_arg(
                "steps",
                json!(["open page", { "action": "submit", "expected": "welcome" }]),
            );
        assert!(DefaultToolValidator.validate(&ok, &definition()).is_ok());

        let bad = ToolCall::new("create_test_case")
            .with_arg("projectId", "P1")
            .with_arg("title", "Login")
            .with_arg("steps", json!([1, 2]));
        assert!(DefaultToolValidator.validate(&bad, &definition()).is_err());
    }

    #[test]
    fn test_validator_valid_call() {
        let call = ToolCall::new("create_test_case")
            .with_arg("projectId", "P1")
            .with_arg("title", "Login")
            .with_arg("priority", "P1")
            .with_arg("limit", json!(5))
            .with_arg("steps", Value::Null);
        assert!(DefaultToolValidator.validate(&call, &definition()).is_ok());
    }
}
