//! Priority Ordering
//!
//! Partitions an expanded queue list into priority buckets, highest first.
//! Each queue is claimed by the first bucket whose include rules match it;
//! whatever is left lands in the default bucket at the sentinel's position.

use crate::application::pattern_cache::PatternCache;
use crate::application::transformer::QueueTransformer;
use crate::domain::{BucketRule, BucketSpec, PriorityPlan, QueueIdentifier};
use crate::error::Result;
use crate::port::{QueueEngine, Shuffler, TimeProvider};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Reorders queues into priority buckets
pub struct PriorityTransformer {
    engine: Arc<dyn QueueEngine>,
    plan: PatternCache<PriorityPlan>,
    shuffler: Arc<dyn Shuffler>,
}

impl PriorityTransformer {
    /// # Errors
    /// `AppError::Config` if `ttl_ms` is negative
    pub fn new(
        engine: Arc<dyn QueueEngine>,
        ttl_ms: i64,
        time_provider: Arc<dyn TimeProvider>,
        shuffler: Arc<dyn Shuffler>,
    ) -> Result<Self> {
        Ok(Self {
            engine,
            plan: PatternCache::new("priority_patterns", ttl_ms, time_provider)?,
            shuffler,
        })
    }

    async fn plan(&self) -> Result<Arc<PriorityPlan>> {
        let engine = Arc::clone(&self.engine);
        self.plan
            .get_or_refresh(|| async move {
                let patterns = engine.get_priority_patterns().await?;
                PriorityPlan::compile(&patterns)
            })
            .await
    }
}

#[async_trait]
impl QueueTransformer for PriorityTransformer {
    fn name(&self) -> &'static str {
        "priority"
    }

    async fn transform(&self, identifiers: Vec<QueueIdentifier>) -> Result<Vec<QueueIdentifier>> {
        let plan = self.plan().await?;
        let ordered = prioritize(&plan, identifiers, self.shuffler.as_ref());
        debug!(
            buckets = plan.buckets.len(),
            queues = ordered.len(),
            "Prioritized queue identifiers"
        );
        Ok(ordered)
    }

    fn invalidate(&self) {
        self.plan.invalidate();
    }
}

/// Apply a compiled priority plan to a queue list
pub fn prioritize(
    plan: &PriorityPlan,
    identifiers: Vec<QueueIdentifier>,
    shuffler: &dyn Shuffler,
) -> Vec<QueueIdentifier> {
    let mut remaining = identifiers;
    let mut buckets: Vec<Vec<QueueIdentifier>> = Vec::with_capacity(plan.buckets.len() + 1);

    for spec in &plan.buckets {
        let mut bucket = claim_bucket(spec, &remaining);

        let claimed: HashSet<&str> = bucket.iter().map(QueueIdentifier::as_str).collect();
        remaining.retain(|q| !claimed.contains(q.as_str()));

        if spec.fairly {
            shuffler.shuffle(&mut bucket);
        }
        buckets.push(bucket);
    }

    let mut default_bucket = remaining;
    if plan.default_fairly() {
        shuffler.shuffle(&mut default_bucket);
    }
    let position = plan.default_position().min(buckets.len());
    buckets.insert(position, default_bucket);

    buckets.into_iter().flatten().collect()
}

/// Run one bucket's rules in order against the unclaimed pool
fn claim_bucket(spec: &BucketSpec, pool: &[QueueIdentifier]) -> Vec<QueueIdentifier> {
    let mut bucket: Vec<QueueIdentifier> = Vec::new();

    for rule in &spec.rules {
        match rule {
            BucketRule::Exclude(glob) => bucket.retain(|q| !glob.is_match(q.as_str())),
            BucketRule::Include(glob) => {
                for queue in pool {
                    if glob.is_match(queue.as_str()) && !bucket.contains(queue) {
                        bucket.push(queue.clone());
                    }
                }
            }
        }
    }

    bucket
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriorityPattern;
    use crate::port::queue_engine::mocks::InMemoryQueueEngine;
    use crate::port::shuffler::mocks::ReverseShuffler;
    use crate::port::time_provider::mocks::ManualTimeProvider;
    use crate::port::ThreadRngShuffler;

    fn queues(raw: &[&str]) -> Vec<QueueIdentifier> {
        raw.iter().map(|r| QueueIdentifier::literal(*r)).collect()
    }

    fn names(queues: &[QueueIdentifier]) -> Vec<&str> {
        queues.iter().map(QueueIdentifier::as_str).collect()
    }

    fn plan(patterns: Vec<PriorityPattern>) -> PriorityPlan {
        PriorityPlan::compile(&patterns).unwrap()
    }

    #[test]
    fn test_default_inserted_at_sentinel_position() {
        let plan = plan(vec![
            PriorityPattern::new(["a"], false),
            PriorityPattern::new(["default"], false),
            PriorityPattern::new(["c"], false),
        ]);
        let result = prioritize(&plan, queues(&["a", "b", "c"]), &ReverseShuffler);
        assert_eq!(names(&result), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unclaimed_appended_without_sentinel() {
        let plan = plan(vec![PriorityPattern::new(["a"], false)]);
        let result = prioritize(&plan, queues(&["b", "a"]), &ReverseShuffler);
        assert_eq!(names(&result), vec!["a", "b"]);
    }

    #[test]
    fn test_default_first_when_sentinel_leads() {
        let plan = plan(vec![
            PriorityPattern::new(["default"], false),
            PriorityPattern::new(["hi*"], false),
        ]);
        let result = prioritize(&plan, queues(&["hi-1", "lo", "hi-2"]), &ReverseShuffler);
        assert_eq!(names(&result), vec!["lo", "hi-1", "hi-2"]);
    }

    #[test]
    fn test_first_matching_bucket_claims() {
        let plan = plan(vec![
            PriorityPattern::new(["mail*"], false),
            PriorityPattern::new(["*"], false),
        ]);
        let result = prioritize(&plan, queues(&["x", "mail-1", "y"]), &ReverseShuffler);
        assert_eq!(names(&result), vec!["mail-1", "x", "y"]);
    }

    #[test]
    fn test_rule_order_sets_bucket_order() {
        let plan = plan(vec![PriorityPattern::new(["b*", "a*"], false)]);
        let result = prioritize(&plan, queues(&["a1", "b1", "a2", "b2"]), &ReverseShuffler);
        assert_eq!(names(&result), vec!["b1", "b2", "a1", "a2"]);
    }

    #[test]
    fn test_exclude_rule_returns_queue_to_pool() {
        let plan = plan(vec![
            PriorityPattern::new(["mail*", "!mail-bulk"], false),
            PriorityPattern::new(["mail-bulk"], false),
            PriorityPattern::new(["default"], false),
        ]);
        let result = prioritize(
            &plan,
            queues(&["other", "mail-bulk", "mail-fast"]),
            &ReverseShuffler,
        );
        assert_eq!(names(&result), vec!["mail-fast", "mail-bulk", "other"]);
    }

    #[test]
    fn test_fair_bucket_uses_shuffler() {
        let plan = plan(vec![
            PriorityPattern::new(["x", "y", "z"], true),
            PriorityPattern::new(["default"], false),
        ]);
        let result = prioritize(&plan, queues(&["w", "x", "y", "z"]), &ReverseShuffler);
        assert_eq!(names(&result), vec!["z", "y", "x", "w"]);
    }

    #[test]
    fn test_fair_default_bucket_uses_shuffler() {
        let plan = plan(vec![
            PriorityPattern::new(["a"], false),
            PriorityPattern::new(["default"], true),
        ]);
        let result = prioritize(&plan, queues(&["a", "b", "c"]), &ReverseShuffler);
        assert_eq!(names(&result), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_fair_bucket_is_permutation() {
        let plan = plan(vec![PriorityPattern::new(["*"], true)]);
        for _ in 0..20 {
            let result = prioritize(&plan, queues(&["x", "y", "z"]), &ThreadRngShuffler);
            let mut sorted = names(&result);
            sorted.sort();
            assert_eq!(sorted, vec!["x", "y", "z"]);
        }
    }

    #[test]
    fn test_empty_plan_is_identity() {
        let result = prioritize(&PriorityPlan::default(), queues(&["c", "a", "b"]), &ReverseShuffler);
        assert_eq!(names(&result), vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_transform_caches_plan() {
        let engine = Arc::new(InMemoryQueueEngine::new().with_priorities(vec![
            PriorityPattern::new(["b"], false),
            PriorityPattern::new(["default"], false),
        ]));
        let clock = Arc::new(ManualTimeProvider::new(1_000));
        let transformer =
            PriorityTransformer::new(engine.clone(), 60_000, clock.clone(), Arc::new(ReverseShuffler))
                .unwrap();

        for _ in 0..3 {
            let result = transformer.transform(queues(&["a", "b"])).await.unwrap();
            assert_eq!(names(&result), vec!["b", "a"]);
        }
        assert_eq!(engine.priority_calls(), 1);

        clock.advance(60_000);
        transformer.transform(queues(&["a"])).await.unwrap();
        assert_eq!(engine.priority_calls(), 2);
    }
}
