//! Structured generation requester.
//!
//! Issues one schema-constrained request per prompt against the current
//! client handle and returns the parsed, validated [`SoundSpec`]. No
//! retries; every failure class maps onto one [`crate::Error`] variant.

use crate::client::ClientRegistry;
use crate::message::Message;
use crate::spec::SoundSpec;
use crate::structured::{OutputValidator, SchemaFormat, StructuredOutput};
use crate::{Error, Result};
use serde_json::json;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4.1";

/// Fixed instruction sent as the `system` message.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert retro-sound designer. \
    Produce ONLY a sound specification matching the schema, and set sample_size to 16.";

const COMPLETIONS_PATH: &str = "/chat/completions";

pub struct SpecRequester {
    model: String,
}

impl SpecRequester {
    pub fn new() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    /// Request a sound specification for `prompt`.
    ///
    /// The handle is loaded from the registry once, before the request goes
    /// out; a credential swap mid-flight does not affect this call.
    pub async fn request_spec(
        &self,
        registry: &ClientRegistry,
        prompt: &str,
    ) -> Result<SoundSpec> {
        let handle = registry.handle();

        let body = json!({
            "model": self.model,
            "messages": [
                Message::system(SYSTEM_INSTRUCTION),
                Message::user(prompt),
            ],
            "response_format": SchemaFormat::new("sound_spec", SoundSpec::schema().clone())
                .to_request_value(),
        });

        let response = handle.execute_json(COMPLETIONS_PATH, &body).await?;

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                Error::validation("response carried no message content", Vec::new())
            })?;

        let validator = OutputValidator::strict(SoundSpec::schema().clone());
        let output = StructuredOutput::from_response(content, &validator);
        if !output.is_valid() {
            return Err(Error::validation(
                format!(
                    "model output does not match the sound specification schema: {}",
                    output.error_messages().join("; ")
                ),
                output.errors(),
            ));
        }

        let data = output
            .data()
            .cloned()
            .unwrap_or(serde_json::Value::Null);
        let spec: SoundSpec = serde_json::from_value(data)?;
        Ok(spec)
    }
}

impl Default for SpecRequester {
    fn default() -> Self {
        Self::new()
    }
}
