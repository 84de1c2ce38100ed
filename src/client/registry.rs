//! Credential-scoped client registry.
//!
//! Holds the single live [`HttpTransport`] behind an [`ArcSwap`]. Supplying
//! a new credential replaces the handle wholesale; requests hold the `Arc`
//! they loaded at issue time, so a request that straddles a swap finishes
//! on the handle it started with.

use crate::transport::HttpTransport;
use crate::Result;
use arc_swap::ArcSwap;
use std::env;
use std::sync::Arc;

/// Default endpoint for the generation request.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Environment variable consulted once for the default credential.
pub const CREDENTIAL_ENV_VAR: &str = "OPENAI_API_KEY";

pub struct ClientRegistry {
    handle: ArcSwap<HttpTransport>,
    base_url: String,
}

impl ClientRegistry {
    /// Create a registry bound to the default endpoint. The credential may
    /// be blank; requests will then go out unauthenticated and fail at the
    /// remote, not locally.
    pub fn new(credential: impl Into<String>) -> Result<Self> {
        Self::with_base_url(credential, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        credential: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let base_url = base_url.into();
        let transport = HttpTransport::new(credential, &base_url)?;
        Ok(Self {
            handle: ArcSwap::from_pointee(transport),
            base_url,
        })
    }

    /// Source the default credential from the environment at construction.
    /// Absent variable means a blank credential, matching [`Self::new`].
    pub fn from_env() -> Result<Self> {
        Self::new(env::var(CREDENTIAL_ENV_VAR).unwrap_or_default())
    }

    /// Replace the active client when `secret` is non-empty and differs
    /// from the current credential. Otherwise a no-op: the held handle is
    /// unchanged and no new client is constructed.
    ///
    /// The secret is never checked for correctness here; a bad key fails
    /// at request time.
    pub fn set_credential(&self, secret: &str) -> Result<()> {
        if secret.is_empty() || secret == self.handle.load().credential() {
            return Ok(());
        }

        let transport = HttpTransport::new(secret, &self.base_url)?;
        self.handle.store(Arc::new(transport));
        tracing::debug!("replaced credential-bound client handle");
        Ok(())
    }

    /// Load the current handle. Callers keep the `Arc` for the duration of
    /// a request.
    pub fn handle(&self) -> Arc<HttpTransport> {
        self.handle.load_full()
    }
}
