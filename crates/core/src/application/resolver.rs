//! Queue Resolver - runs transformers left to right over an identifier list
//!
//! ```text
//! let resolver = QueueResolver::standard(engine, &ResolverConfig::default(),
//!     Arc::new(SystemTimeProvider), Arc::new(ThreadRngShuffler))?;
//! let queues = resolver.resolve_queue_names(&["@critical", "jobs-*", "!jobs-slow"]).await?;
//! ```

use crate::application::group_expansion::IdentifierGroupTransformer;
use crate::application::priority_ordering::PriorityTransformer;
use crate::application::transformer::QueueTransformer;
use crate::config::ResolverConfig;
use crate::domain::QueueIdentifier;
use crate::error::Result;
use crate::port::{QueueEngine, Shuffler, TimeProvider};
use std::sync::Arc;
use tracing::{debug, info};

/// Ordered transformer pipeline producing the queue names a worker polls
pub struct QueueResolver {
    transformers: Vec<Arc<dyn QueueTransformer>>,
}

impl QueueResolver {
    pub fn new(transformers: Vec<Arc<dyn QueueTransformer>>) -> Self {
        Self { transformers }
    }

    /// Group expansion followed by priority ordering, sharing one engine
    ///
    /// # Errors
    /// `AppError::Config` if a configured TTL is negative
    pub fn standard(
        engine: Arc<dyn QueueEngine>,
        config: &ResolverConfig,
        time_provider: Arc<dyn TimeProvider>,
        shuffler: Arc<dyn Shuffler>,
    ) -> Result<Self> {
        config.validate()?;

        let expansion = IdentifierGroupTransformer::new(
            Arc::clone(&engine),
            config.group_cache_ttl_ms,
            Arc::clone(&time_provider),
        )?;
        let priority = PriorityTransformer::new(
            engine,
            config.priority_cache_ttl_ms,
            time_provider,
            shuffler,
        )?;

        Ok(Self::new(vec![Arc::new(expansion), Arc::new(priority)]))
    }

    pub fn transformers(&self) -> &[Arc<dyn QueueTransformer>] {
        &self.transformers
    }

    /// Resolve raw identifiers into concrete, ordered queue names
    pub async fn resolve_queue_names<S: AsRef<str>>(&self, identifiers: &[S]) -> Result<Vec<String>> {
        let parsed = identifiers
            .iter()
            .map(|raw| QueueIdentifier::parse(raw.as_ref()))
            .collect();

        let resolved = self.resolve(parsed).await?;
        info!(
            requested = identifiers.len(),
            resolved = resolved.len(),
            "Resolved queue names"
        );
        Ok(resolved.into_iter().map(QueueIdentifier::into_string).collect())
    }

    /// Feed each transformer the previous one's output; no post-processing
    pub async fn resolve(&self, identifiers: Vec<QueueIdentifier>) -> Result<Vec<QueueIdentifier>> {
        let mut current = identifiers;
        for transformer in &self.transformers {
            let input = current.len();
            current = transformer.transform(current).await?;
            debug!(
                stage = transformer.name(),
                input,
                output = current.len(),
                "Applied queue transformer"
            );
        }
        Ok(current)
    }

    /// Drop cached pattern definitions in every stage
    pub fn invalidate_caches(&self) {
        for transformer in &self.transformers {
            transformer.invalidate();
        }
    }
}
