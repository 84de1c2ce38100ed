//! Orchestration: one linear flow from prompt to artifact.
//!
//! `prompt -> requester -> synthesis -> slug`, with a single-slot in-flight
//! marker guarding re-entry. A second `generate` while one is pending is
//! silently dropped, not queued. The marker is released by an RAII guard on
//! every exit path, so the pipeline is always re-enterable after a failure.

use crate::client::{ClientRegistry, SpecRequester};
use crate::slug::slug;
use crate::synth::{self, AudioArtifact};
use crate::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// The outcome of one successful generation.
#[derive(Debug, Clone)]
pub struct Generation {
    pub artifact: AudioArtifact,
    /// `<slug>.wav`, derived from the prompt.
    pub file_name: String,
}

pub struct SfxPipeline {
    registry: ClientRegistry,
    requester: SpecRequester,
    in_flight: AtomicBool,
}

impl SfxPipeline {
    pub fn new(registry: ClientRegistry) -> Self {
        Self::with_requester(registry, SpecRequester::new())
    }

    pub fn with_requester(registry: ClientRegistry, requester: SpecRequester) -> Self {
        Self {
            registry,
            requester,
            in_flight: AtomicBool::new(false),
        }
    }

    /// The credential registry, for swapping the key at runtime.
    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run one generation.
    ///
    /// Returns `Ok(None)` without touching the network when the prompt is
    /// empty after trimming or when a generation is already in flight.
    /// Failures are logged here, at the orchestration boundary, and
    /// propagated as a single error; no partial artifact is produced.
    pub async fn generate(&self, prompt: &str) -> Result<Option<Generation>> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Ok(None);
        }

        // acquired before the first await, released on drop
        let _guard = match InFlightGuard::acquire(&self.in_flight) {
            Some(guard) => guard,
            None => {
                tracing::debug!("generation already in flight, dropping invocation");
                return Ok(None);
            }
        };

        match self.run(prompt).await {
            Ok(generation) => Ok(Some(generation)),
            Err(e) => {
                warn!(error = %e, "sound generation failed");
                Err(e)
            }
        }
    }

    async fn run(&self, prompt: &str) -> Result<Generation> {
        info!(prompt, "generating sound effect");

        let spec = self.requester.request_spec(&self.registry, prompt).await?;
        let artifact = synth::render(&spec)?;
        let file_name = format!("{}.wav", slug(prompt));

        info!(file_name, bytes = artifact.wav_bytes().len(), "generated");
        Ok(Generation {
            artifact,
            file_name,
        })
    }
}

/// Single-slot in-flight marker with guaranteed release.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_single_slot() {
        let flag = AtomicBool::new(false);

        let first = InFlightGuard::acquire(&flag);
        assert!(first.is_some());
        assert!(InFlightGuard::acquire(&flag).is_none());

        drop(first);
        assert!(InFlightGuard::acquire(&flag).is_some());
    }

    #[tokio::test]
    async fn test_empty_prompt_is_noop() {
        let registry = ClientRegistry::new("sk-test").unwrap();
        let pipeline = SfxPipeline::new(registry);

        assert!(pipeline.generate("").await.unwrap().is_none());
        assert!(pipeline.generate("   \n ").await.unwrap().is_none());
        assert!(!pipeline.is_busy());
    }
}
