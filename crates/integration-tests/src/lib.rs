//! Shared fixtures for the end-to-end resolution tests

use qmore_core::port::queue_engine::mocks::InMemoryQueueEngine;
use qmore_core::port::time_provider::mocks::ManualTimeProvider;
use qmore_core::port::Shuffler;
use qmore_core::{QueueResolver, ResolverConfig};
use std::sync::Arc;

/// Fixed start time for deterministic cache expiry
pub const T0: i64 = 1_700_000_000_000;

/// Resolver wired exactly like production, with an injectable clock and shuffler
pub struct Harness {
    pub engine: Arc<InMemoryQueueEngine>,
    pub clock: Arc<ManualTimeProvider>,
    pub resolver: QueueResolver,
}

impl Harness {
    pub fn new(engine: InMemoryQueueEngine, shuffler: Arc<dyn Shuffler>) -> Self {
        Self::with_config(engine, shuffler, &ResolverConfig::default())
    }

    pub fn with_config(
        engine: InMemoryQueueEngine,
        shuffler: Arc<dyn Shuffler>,
        config: &ResolverConfig,
    ) -> Self {
        let engine = Arc::new(engine);
        let clock = Arc::new(ManualTimeProvider::new(T0));
        let resolver = QueueResolver::standard(engine.clone(), config, clock.clone(), shuffler)
            .expect("valid resolver config");
        Self {
            engine,
            clock,
            resolver,
        }
    }

    pub async fn resolve(&self, identifiers: &[&str]) -> Vec<String> {
        self.resolver
            .resolve_queue_names(identifiers)
            .await
            .expect("resolution succeeds")
    }
}

/// Sorted copy, for permutation assertions
pub fn sorted(mut names: Vec<String>) -> Vec<String> {
    names.sort();
    names
}
