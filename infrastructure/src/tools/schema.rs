//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`]. Produces one function
//! declaration per tool in the shape Gemini's `functionDeclarations` expects
//! (an OpenAPI-style schema subset).

use testhub_application::ToolSchemaPort;
use testhub_domain::tool::entities::{ParamType, ToolDefinition};
use serde_json::{Map, Value, json};

/// Handles param_type → schema mapping:
/// - `String` → `{"type": "string"}`
/// - `Number` → `{"type": "number"}`
/// - `Enum` → `{"type": "string", "enum": [...]}`
/// - `Array` → `{"type": "array", "items": ...}` with string items, or object
///   items carrying the declared fields
pub struct JsonSchemaToolConverter;

fn param_schema(param_type: &ParamType, description: &str) -> Value {
    let mut prop = Map::new();
    prop.insert("type".to_string(), json!(param_type.json_type()));
    prop.insert("description".to_string(), json!(description));

    match param_type {
        ParamType::Enum { values } => {
            prop.insert("enum".to_string(), json!(values));
        }
        ParamType::Array { item_fields } if item_fields.is_empty() => {
            prop.insert("items".to_string(), json!({ "type": "string" }));
        }
        ParamType::Array { item_fields } => {
            let fields: Map<String, Value> = item_fields
                .iter()
                .map(|f| (f.clone(), json!({ "type": "string" })))
                .collect();
            prop.insert(
                "items".to_string(),
                json!({ "type": "object", "properties": fields }),
            );
        }
        ParamType::String | ParamType::Number => {}
    }

    Value::Object(prop)
}

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            properties.insert(
                param.name.clone(),
                param_schema(&param.param_type, &param.description),
            );
            if param.required {
                required.push(json!(param.name));
            }
        }

        json!({
            "name": tool.name,
            "description": tool.description,
            "parameters": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::default_tool_spec;
    use testhub_domain::tool::entities::ToolParameter;

    #[test]
    fn test_tool_to_schema() {
        let converter = JsonSchemaToolConverter;
        let tool = ToolDefinition::new("query_defects", "Query defects")
            .with_parameter(ToolParameter::new("projectId", "Project", false))
            .with_parameter(
                ToolParameter::new("severity", "Severity", false)
                    .with_values(&["LOW", "MEDIUM", "HIGH", "CRITICAL"]),
            )
            .with_parameter(ToolParameter::new("limit", "Limit", true).with_type(ParamType::Number));

        let schema = converter.tool_to_schema(&tool);

        assert_eq!(schema["name"], "query_defects");
        assert_eq!(schema["parameters"]["type"], "object");
        let props = &schema["parameters"]["properties"];
        assert_eq!(props["projectId"]["type"], "string");
        assert_eq!(props["severity"]["type"], "string");
        assert_eq!(props["severity"]["enum"][3], "CRITICAL");
        assert_eq!(props["limit"]["type"], "number");
        assert_eq!(schema["parameters"]["required"], json!(["limit"]));
    }

    #[test]
    fn test_array_items() {
        let schema = param_schema(
            &ParamType::Array {
                item_fields: vec!["action".to_string(), "expected".to_string()],
            },
            "Steps",
        );
        assert_eq!(schema["type"], "array");
        assert_eq!(schema["items"]["type"], "object");
        assert_eq!(schema["items"]["properties"]["expected"]["type"], "string");

        let plain = param_schema(&ParamType::Array { item_fields: vec![] }, "Tags");
        assert_eq!(plain["items"]["type"], "string");
    }

    #[test]
    fn test_all_tools_schema_is_sorted() {
        let tools = JsonSchemaToolConverter.all_tools_schema(&default_tool_spec());
        let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 18);
    }
}
