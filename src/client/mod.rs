//! Client side of the pipeline: the credential-scoped handle registry and
//! the structured generation requester.

pub mod registry;
pub mod requester;

pub use registry::ClientRegistry;
pub use requester::SpecRequester;
