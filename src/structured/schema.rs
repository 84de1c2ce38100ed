//! Schema generation utilities.
//!
//! Builds the closed object schemas this crate sends with structured-output
//! requests. The shape is deliberately flat: named properties with primitive
//! types, fixed-literal (`const`) constraints, and no additional properties.

use serde_json::json;

/// Builder for closed JSON object schemas.
#[derive(Debug, Clone, Default)]
pub struct SchemaGenerator {
    title: Option<String>,
    properties: Vec<(String, serde_json::Value)>,
    required: Vec<String>,
    additional_properties: bool,
}

impl SchemaGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn add_property(mut self, name: impl Into<String>, schema: serde_json::Value) -> Self {
        self.properties.push((name.into(), schema));
        self
    }

    /// Mark every property added so far as required.
    pub fn require_all(mut self) -> Self {
        self.required = self.properties.iter().map(|(n, _)| n.clone()).collect();
        self
    }

    pub fn set_required(mut self, required: &[String]) -> Self {
        self.required = required.to_vec();
        self
    }

    /// Allow properties beyond the declared ones. Off by default: the
    /// schemas here describe closed shapes.
    pub fn allow_additional_properties(mut self) -> Self {
        self.additional_properties = true;
        self
    }

    pub fn build(self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert("type".into(), json!("object"));

        let mut properties = serde_json::Map::new();
        for (name, schema) in self.properties {
            properties.insert(name, schema);
        }
        map.insert("properties".into(), properties.into());

        if !self.required.is_empty() {
            map.insert("required".into(), self.required.into());
        }

        if !self.additional_properties {
            map.insert("additionalProperties".into(), json!(false));
        }

        if let Some(title) = self.title {
            map.insert("title".into(), title.into());
        }

        map.into()
    }
}

/// A free `number` property schema.
pub fn number() -> serde_json::Value {
    json!({"type": "number"})
}

/// A bounded `integer` property schema.
pub fn integer(minimum: i64, maximum: i64) -> serde_json::Value {
    json!({"type": "integer", "minimum": minimum, "maximum": maximum})
}

/// A `boolean` property schema.
pub fn boolean() -> serde_json::Value {
    json!({"type": "boolean"})
}

/// A fixed-literal property schema: only `value` is accepted.
pub fn constant(value: impl Into<serde_json::Value>) -> serde_json::Value {
    json!({"const": value.into()})
}

/// An `integer` property restricted to an explicit set of values.
pub fn integer_enum(values: &[i64]) -> serde_json::Value {
    json!({"type": "integer", "enum": values})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_generator_basic() {
        let schema = SchemaGenerator::new()
            .add_property("wave_type", integer(0, 3))
            .add_property("sound_vol", number())
            .build();

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["wave_type"]["type"], "integer");
        assert_eq!(schema["properties"]["sound_vol"]["type"], "number");
    }

    #[test]
    fn test_schema_generator_closed_by_default() {
        let schema = SchemaGenerator::new().build();
        assert_eq!(schema["additionalProperties"], false);

        let open = SchemaGenerator::new().allow_additional_properties().build();
        assert!(open.get("additionalProperties").is_none());
    }

    #[test]
    fn test_require_all() {
        let schema = SchemaGenerator::new()
            .add_property("a", number())
            .add_property("b", boolean())
            .require_all()
            .build();

        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 2);
        assert_eq!(required[0], "a");
        assert_eq!(required[1], "b");
    }

    #[test]
    fn test_constant_property() {
        let schema = constant(16);
        assert_eq!(schema["const"], 16);
    }
}
