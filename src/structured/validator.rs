//! Structural validator for model output.
//!
//! Interprets a data-shape descriptor (property name -> expected primitive
//! type, plus fixed-literal constraints) against parsed JSON. Closed-shape
//! semantics are explicit: in strict mode, properties not named by the
//! schema are rejected.

use crate::structured::error::{ValidationError, ValidationResult};
use serde_json::Value;
use std::collections::HashSet;

/// Validator for structured output.
pub struct OutputValidator {
    schema: Value,
    strict: bool,
}

impl OutputValidator {
    pub fn new(schema: Value, strict: bool) -> Self {
        Self { schema, strict }
    }

    /// Strict validation: extra properties are rejected unless the schema
    /// explicitly allows them.
    pub fn strict(schema: Value) -> Self {
        Self::new(schema, true)
    }

    pub fn lenient(schema: Value) -> Self {
        Self::new(schema, false)
    }

    /// Validate data against the schema.
    pub fn validate(&self, data: &Value) -> ValidationResult {
        let schema = self.schema.clone();
        self.validate_against_schema(data, &schema, "")
    }

    fn validate_against_schema(&self, data: &Value, schema: &Value, path: &str) -> ValidationResult {
        let mut errors = Vec::new();

        let schema_type = schema.get("type").and_then(|t| t.as_str());
        if let Some(type_name) = schema_type {
            if let Err(e) = self.validate_type(data, type_name, path) {
                errors.push(e);
                return ValidationResult::failure(errors);
            }
        }

        if matches!(schema_type, Some("integer") | Some("number")) {
            if let Some(num) = data.as_f64() {
                self.validate_number(num, schema, path, &mut errors);
            }
        }

        if schema_type == Some("object") && data.is_object() {
            self.validate_object(data, schema, path, &mut errors);
        }

        if let Some(expected) = schema.get("const") {
            if data != expected {
                errors.push(ValidationError::with_path(
                    format!("Expected fixed value {}, got {}", expected, data),
                    path.to_string(),
                ));
            }
        }

        if let Some(enum_values) = schema.get("enum").and_then(|e| e.as_array()) {
            if !enum_values.contains(data) {
                let allowed: Vec<String> = enum_values.iter().map(|v| v.to_string()).collect();
                errors.push(ValidationError::with_path(
                    format!("Value not in allowed enum values: {}", allowed.join(", ")),
                    path.to_string(),
                ));
            }
        }

        if errors.is_empty() {
            ValidationResult::success(data.clone())
        } else {
            ValidationResult::failure(errors)
        }
    }

    fn validate_type(
        &self,
        data: &Value,
        expected_type: &str,
        path: &str,
    ) -> Result<(), ValidationError> {
        let is_valid = match expected_type {
            "string" => data.is_string(),
            "integer" => data.is_i64() || data.is_u64(),
            "number" => data.is_number(),
            "boolean" => data.is_boolean(),
            "object" => data.is_object(),
            "null" => data.is_null(),
            _ => true, // Unknown type, accept anything
        };

        if is_valid {
            return Ok(());
        }

        let actual_type = match data {
            Value::String(_) => "string",
            Value::Number(_) => {
                if data.as_i64().is_some() {
                    "integer"
                } else {
                    "number"
                }
            }
            Value::Bool(_) => "boolean",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Null => "null",
        };
        Err(ValidationError::with_path(
            format!("Expected type '{}', got '{}'", expected_type, actual_type),
            path.to_string(),
        ))
    }

    fn validate_number(
        &self,
        value: f64,
        schema: &Value,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        if let Some(minimum) = schema.get("minimum").and_then(|m| m.as_f64()) {
            if value < minimum {
                errors.push(ValidationError::with_path(
                    format!("Value below minimum ({})", minimum),
                    path.to_string(),
                ));
            }
        }

        if let Some(maximum) = schema.get("maximum").and_then(|m| m.as_f64()) {
            if value > maximum {
                errors.push(ValidationError::with_path(
                    format!("Value above maximum ({})", maximum),
                    path.to_string(),
                ));
            }
        }
    }

    fn validate_object(
        &self,
        data: &Value,
        schema: &Value,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        let obj = match data.as_object() {
            Some(o) => o,
            None => return,
        };

        let required: Vec<&str> = schema
            .get("required")
            .and_then(|r| r.as_array())
            .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default();

        for prop_name in &required {
            if !obj.contains_key(*prop_name) {
                errors.push(ValidationError::with_path(
                    format!("Missing required property: {}", prop_name),
                    join_path(path, prop_name),
                ));
            }
        }

        let empty = serde_json::Map::new();
        let properties = schema
            .get("properties")
            .and_then(|p| p.as_object())
            .unwrap_or(&empty);

        for (prop_name, prop_schema) in properties {
            if let Some(prop_value) = obj.get(prop_name) {
                let result =
                    self.validate_against_schema(prop_value, prop_schema, &join_path(path, prop_name));
                if !result.is_valid() {
                    errors.extend(result.errors);
                }
            }
        }

        let additional_allowed = schema
            .get("additionalProperties")
            .and_then(|a| a.as_bool())
            .unwrap_or(!self.strict);

        if !additional_allowed {
            let allowed_keys: HashSet<&str> = properties.keys().map(|k| k.as_str()).collect();
            for key in obj.keys() {
                if !allowed_keys.contains(key.as_str()) {
                    errors.push(ValidationError::with_path(
                        format!("Additional property not allowed: {}", key),
                        join_path(path, key),
                    ));
                }
            }
        }
    }
}

fn join_path(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", path, segment)
    }
}
