use crate::structured::ValidationError;
use crate::synth::SynthesisError;
use crate::transport::TransportError;
use thiserror::Error;

/// Unified error type for the generation pipeline.
///
/// Aggregates the three failure classes a generation can hit: request
/// failures (network, auth, rate limit), validation failures (model output
/// does not match the sound specification schema), and synthesis failures
/// (parameters the synthesizer rejects).
#[derive(Debug, Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("remote error: HTTP {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("validation error: {message}")]
    Validation {
        message: String,
        errors: Vec<ValidationError>,
    },

    #[error("synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a validation error from a message and the individual findings.
    pub fn validation(msg: impl Into<String>, errors: Vec<ValidationError>) -> Self {
        Error::Validation {
            message: msg.into(),
            errors,
        }
    }

    /// Whether this error came from issuing the request itself
    /// (as opposed to validating or synthesizing its result).
    pub fn is_request(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Remote { .. })
    }
}
