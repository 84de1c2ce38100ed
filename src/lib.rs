//! # ai-sfx
//!
//! Turn a natural-language description of a sound effect into a playable,
//! downloadable retro WAV.
//!
//! The crate wires three components into one linear pipeline:
//!
//! 1. A credential-scoped HTTP client handle, swappable at runtime
//!    ([`ClientRegistry`]).
//! 2. A structured-output request against an OpenAI-compatible Chat
//!    Completions endpoint, constrained by a closed JSON schema
//!    ([`client::SpecRequester`]).
//! 3. An sfxr-style procedural synthesizer that renders the validated
//!    parameter set into 16-bit PCM WAV bytes ([`synth::render`]).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ai_sfx::{ClientRegistry, SfxPipeline};
//!
//! #[tokio::main]
//! async fn main() -> ai_sfx::Result<()> {
//!     let registry = ClientRegistry::from_env()?;
//!     let pipeline = SfxPipeline::new(registry);
//!
//!     if let Some(generation) = pipeline.generate("coin pickup").await? {
//!         generation.artifact.write_to(&generation.file_name)?;
//!         println!("wrote {}", generation.file_name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Credential registry and the structured generation requester |
//! | [`transport`] | HTTP execution against the model endpoint |
//! | [`structured`] | Closed-shape JSON schema building and validation |
//! | [`spec`] | The sound specification produced by the model |
//! | [`synth`] | Deterministic sfxr-style synthesis and WAV encoding |
//! | [`pipeline`] | Single-in-flight orchestration from prompt to artifact |

pub mod client;
pub mod message;
pub mod pipeline;
pub mod slug;
pub mod spec;
pub mod structured;
pub mod synth;
pub mod transport;

// Re-export main types for convenience
pub use client::{ClientRegistry, SpecRequester};
pub use message::{Message, MessageRole};
pub use pipeline::{Generation, SfxPipeline};
pub use spec::SoundSpec;
pub use synth::{AudioArtifact, SynthesisError};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::Error;
