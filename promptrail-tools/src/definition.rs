//! Tool definitions sent to the model.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// JSON Schema for an object type (tool parameters).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObjectJsonSchema {
    /// The schema type (always "object" for tool parameters).
    #[serde(rename = "type")]
    pub schema_type: String,

    /// Property definitions, in declaration order.
    pub properties: IndexMap<String, JsonValue>,

    /// List of required property names.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub required: Vec<String>,
}

impl Default for ObjectJsonSchema {
    fn default() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: IndexMap::new(),
            required: Vec::new(),
        }
    }
}

impl ObjectJsonSchema {
    /// Create a new empty object schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property.
    #[must_use]
    pub fn with_property(mut self, name: &str, schema: JsonValue, required: bool) -> Self {
        self.properties.insert(name.to_string(), schema);
        if required && !self.is_required(name) {
            self.required.push(name.to_string());
        }
        self
    }

    /// Add a string property.
    #[must_use]
    pub fn string(self, name: &str, desc: &str, required: bool) -> Self {
        self.with_property(
            name,
            serde_json::json!({"type": "string", "description": desc}),
            required,
        )
    }

    /// Add a string property restricted to a set of values.
    #[must_use]
    pub fn enum_values(self, name: &str, desc: &str, values: &[&str], required: bool) -> Self {
        self.with_property(
            name,
            serde_json::json!({"type": "string", "description": desc, "enum": values}),
            required,
        )
    }

    /// Check if a property is required.
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

impl From<ObjectJsonSchema> for JsonValue {
    fn from(schema: ObjectJsonSchema) -> Self {
        serde_json::to_value(schema).unwrap_or(JsonValue::Null)
    }
}

/// Complete tool definition sent to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    /// Tool name, matched exactly against model tool calls.
    pub name: String,

    /// Human-readable description of what the tool does.
    pub description: String,

    /// JSON Schema for the tool's parameters.
    pub parameters_json_schema: JsonValue,
}

impl ToolDefinition {
    /// Create a definition with an empty parameter schema.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters_json_schema: ObjectJsonSchema::new().into(),
        }
    }

    /// Set the parameters schema.
    #[must_use]
    pub fn with_parameters(mut self, schema: impl Into<JsonValue>) -> Self {
        self.parameters_json_schema = schema.into();
        self
    }

    /// Get the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the parameters schema.
    #[must_use]
    pub fn parameters(&self) -> &JsonValue {
        &self.parameters_json_schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_definition_schema() {
        let def = ToolDefinition::new("noop", "Does nothing");
        assert_eq!(
            def.parameters(),
            &serde_json::json!({"type": "object", "properties": {}})
        );
    }

    #[test]
    fn test_schema_keeps_declaration_order() {
        let schema = ObjectJsonSchema::new()
            .string("query", "Search query", true)
            .string("region", "Country code", false)
            .enum_values("topic", "Category", &["general", "news"], false);

        let keys: Vec<&str> = schema.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["query", "region", "topic"]);
        assert!(schema.is_required("query"));
        assert!(!schema.is_required("topic"));

        let json: JsonValue = schema.into();
        assert_eq!(json["properties"]["topic"]["enum"], serde_json::json!(["general", "news"]));
        assert_eq!(json["required"], serde_json::json!(["query"]));
    }
}
