//! Closed-shape structured output: schema building, response parsing,
//! and structural validation.
//!
//! - [`SchemaGenerator`]: build the JSON schema sent with the request
//! - [`OutputValidator`]: validate model output against that schema
//! - [`StructuredOutput`]: parsed + validated response content
//! - [`SchemaFormat`]: the `response_format` request fragment
//!
//! # Examples
//!
//! ```
//! use ai_sfx::structured::{OutputValidator, SchemaGenerator};
//! use serde_json::json;
//!
//! let schema = SchemaGenerator::new()
//!     .add_property("volume", json!({"type": "number"}))
//!     .require_all()
//!     .build();
//!
//! let validator = OutputValidator::strict(schema);
//! assert!(validator.validate(&json!({"volume": 0.5})).is_valid());
//! assert!(!validator.validate(&json!({"volume": 0.5, "extra": 1})).is_valid());
//! ```

pub mod error;
pub mod output;
pub mod schema;
pub mod validator;

pub use error::{ValidationError, ValidationResult};
pub use output::{SchemaFormat, StructuredOutput};
pub use schema::SchemaGenerator;
pub use validator::OutputValidator;
