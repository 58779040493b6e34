//! Identifier-Group Expansion
//!
//! Replaces `@group` references with the group's member patterns, then
//! narrows every pattern down to static names plus known queues that match.

use crate::application::pattern_cache::PatternCache;
use crate::application::transformer::QueueTransformer;
use crate::domain::{GlobPattern, IdentifierGroups, QueueIdentifier};
use crate::error::Result;
use crate::port::{QueueEngine, TimeProvider};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Expands group references and matches patterns against known queues
pub struct IdentifierGroupTransformer {
    engine: Arc<dyn QueueEngine>,
    groups: PatternCache<IdentifierGroups>,
}

impl IdentifierGroupTransformer {
    /// # Errors
    /// `AppError::Config` if `ttl_ms` is negative
    pub fn new(
        engine: Arc<dyn QueueEngine>,
        ttl_ms: i64,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Result<Self> {
        Ok(Self {
            engine,
            groups: PatternCache::new("identifier_groups", ttl_ms, time_provider)?,
        })
    }

    async fn groups(&self) -> Result<Arc<IdentifierGroups>> {
        let engine = Arc::clone(&self.engine);
        self.groups
            .get_or_refresh(|| async move {
                let patterns = engine.get_identifier_group_patterns().await?;
                Ok(IdentifierGroups::from_patterns(patterns))
            })
            .await
    }
}

#[async_trait]
impl QueueTransformer for IdentifierGroupTransformer {
    fn name(&self) -> &'static str {
        "identifier_groups"
    }

    async fn transform(&self, identifiers: Vec<QueueIdentifier>) -> Result<Vec<QueueIdentifier>> {
        // Group definitions are only fetched when something references one
        let expanded = if identifiers.iter().any(|q| q.group_name().is_some()) {
            let groups = self.groups().await?;
            expand_groups(identifiers, &groups)
        } else {
            identifiers
        };

        let known = self.engine.get_known_queue_names().await?;
        let matched = match_known_queues(&expanded, &known)?;

        debug!(
            expanded = expanded.len(),
            known = known.len(),
            matched = matched.len(),
            "Expanded queue identifiers"
        );
        Ok(matched)
    }

    fn invalidate(&self) {
        self.groups.invalidate();
    }
}

/// Replace each group reference with its members, flipping member negation
/// when the reference itself is negated. Unknown groups contribute nothing.
pub fn expand_groups(
    identifiers: Vec<QueueIdentifier>,
    groups: &IdentifierGroups,
) -> Vec<QueueIdentifier> {
    let mut expanded = Vec::with_capacity(identifiers.len());

    for identifier in identifiers {
        let Some(name) = identifier.group_name() else {
            expanded.push(identifier);
            continue;
        };

        let Some(members) = groups.members(name) else {
            debug!(group = name, "Unknown identifier group, skipping");
            continue;
        };

        if identifier.is_negated() {
            expanded.extend(members.iter().map(QueueIdentifier::negate));
        } else {
            expanded.extend(members.iter().cloned());
        }
    }

    expanded
}

/// Ordered, duplicate-free accumulator whose slots survive removal
///
/// A removed queue keeps its slot; admitting it again revives it in place
/// instead of moving it to the end.
#[derive(Default)]
struct MatchAccumulator {
    slots: Vec<(QueueIdentifier, bool)>,
    index: HashMap<String, usize>,
}

impl MatchAccumulator {
    fn admit(&mut self, queue: QueueIdentifier) {
        match self.index.get(queue.as_str()) {
            Some(&slot) => self.slots[slot].1 = true,
            None => {
                self.index.insert(queue.as_str().to_string(), self.slots.len());
                self.slots.push((queue, true));
            }
        }
    }

    /// Deactivate every known queue the glob matches; names the engine does
    /// not report are never touched
    fn remove_known(&mut self, glob: &GlobPattern, known_queues: &[String]) {
        for name in known_queues.iter().filter(|name| glob.is_match(name)) {
            if let Some(&slot) = self.index.get(name.as_str()) {
                self.slots[slot].1 = false;
            }
        }
    }

    fn into_queues(self) -> Vec<QueueIdentifier> {
        self.slots
            .into_iter()
            .filter_map(|(queue, active)| active.then_some(queue))
            .collect()
    }
}

/// Narrow expanded patterns to static names and matching known queues
///
/// Patterns apply in order: a later negation removes queues admitted earlier.
pub fn match_known_queues(
    patterns: &[QueueIdentifier],
    known_queues: &[String],
) -> Result<Vec<QueueIdentifier>> {
    let mut result = MatchAccumulator::default();

    for pattern in patterns {
        if pattern.is_static() {
            result.admit(pattern.clone());
            continue;
        }

        let glob = GlobPattern::compile(pattern.pattern_body())?;
        if pattern.is_negated() {
            result.remove_known(&glob, known_queues);
        } else {
            known_queues
                .iter()
                .filter(|name| glob.is_match(name))
                .for_each(|name| result.admit(QueueIdentifier::literal(name.as_str())));
        }
    }

    Ok(result.into_queues())
}
