//! Response parsing and the `response_format` request fragment.

use crate::structured::error::{ValidationError, ValidationResult};
use crate::structured::validator::OutputValidator;
use regex::Regex;

/// The JSON-schema `response_format` sent with a structured request.
///
/// Serializes to the OpenAI Chat Completions shape:
///
/// ```json
/// {
///   "type": "json_schema",
///   "json_schema": {
///     "name": "sound_spec",
///     "strict": true,
///     "schema": { ... }
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaFormat {
    pub name: String,
    pub schema: serde_json::Value,
    pub strict: bool,
}

impl SchemaFormat {
    pub fn new(name: impl Into<String>, schema: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            schema,
            strict: true,
        }
    }

    pub fn to_request_value(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "json_schema",
            "json_schema": {
                "name": self.name,
                "strict": self.strict,
                "schema": self.schema
            }
        })
    }
}

/// Model response content, parsed and validated.
#[derive(Debug, Clone)]
pub struct StructuredOutput {
    /// Raw response content as string
    pub raw: String,
    /// Parsed JSON data (None if parsing failed)
    pub parsed: Option<serde_json::Value>,
    /// Validation result (always populated)
    pub validation_result: ValidationResult,
}

impl StructuredOutput {
    /// Parse raw content and validate it against a schema.
    pub fn from_response(content: impl Into<String>, validator: &OutputValidator) -> Self {
        let content = content.into();
        let parsed = Self::parse_json(content.trim());

        let validation_result = match &parsed {
            Some(value) => validator.validate(value),
            None => ValidationResult::from_error(ValidationError::without_path(
                "response content is not valid JSON",
            )),
        };

        Self {
            raw: content,
            parsed,
            validation_result,
        }
    }

    /// Parse JSON from text, with support for markdown code blocks.
    ///
    /// Models occasionally wrap the payload even when asked not to; extract
    /// from ```json fences or the outermost object before giving up.
    fn parse_json(text: &str) -> Option<serde_json::Value> {
        if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(text) {
            return Some(parsed);
        }

        let patterns = [
            r"```json\s*([\s\S]*?)\s*```",
            r"```\s*([\s\S]*?)\s*```",
            r"\{[\s\S]*\}",
        ];

        for pattern in patterns {
            if let Ok(re) = Regex::new(pattern) {
                if let Some(captures) = re.captures(text) {
                    let candidate = match captures.get(1) {
                        Some(inner) => inner.as_str(),
                        None => captures.get(0).map(|c| c.as_str()).unwrap_or(text),
                    };

                    if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(candidate.trim())
                    {
                        return Some(parsed);
                    }
                }
            }
        }

        None
    }

    pub fn is_valid(&self) -> bool {
        self.validation_result.is_valid()
    }

    /// The validated data. Only meaningful when [`Self::is_valid`] holds.
    pub fn data(&self) -> Option<&serde_json::Value> {
        self.validation_result.data()
    }

    pub fn errors(&self) -> Vec<ValidationError> {
        self.validation_result.errors.clone()
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.validation_result.error_messages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator() -> OutputValidator {
        OutputValidator::strict(json!({
            "type": "object",
            "properties": {"result": {"type": "string"}},
            "required": ["result"],
            "additionalProperties": false
        }))
    }

    #[test]
    fn test_schema_format_request_value() {
        let format = SchemaFormat::new("sound_spec", json!({"type": "object"}));
        let value = format.to_request_value();

        assert_eq!(value["type"], "json_schema");
        assert_eq!(value["json_schema"]["name"], "sound_spec");
        assert_eq!(value["json_schema"]["strict"], true);
        assert_eq!(value["json_schema"]["schema"]["type"], "object");
    }

    #[test]
    fn test_plain_json_content() {
        let output = StructuredOutput::from_response(r#"{"result": "ok"}"#, &validator());
        assert!(output.is_valid());
        assert_eq!(output.data().unwrap()["result"], "ok");
    }

    #[test]
    fn test_markdown_fenced_content() {
        let output = StructuredOutput::from_response(
            "Here you go:\n```json\n{\"result\": \"ok\"}\n```",
            &validator(),
        );
        assert!(output.is_valid());
        assert_eq!(output.parsed.as_ref().unwrap()["result"], "ok");
    }

    #[test]
    fn test_non_json_content_fails() {
        let output = StructuredOutput::from_response("not json at all", &validator());
        assert!(!output.is_valid());
        assert!(output.parsed.is_none());
        assert!(output.error_messages()[0].contains("not valid JSON"));
    }

    #[test]
    fn test_schema_violation_fails() {
        let output = StructuredOutput::from_response(r#"{"result": 3}"#, &validator());
        assert!(!output.is_valid());
        assert!(output.parsed.is_some());
    }
}
