//! End-to-end resolution properties
//!
//! Each test drives the standard pipeline (group expansion -> priority
//! ordering) through an in-memory engine.

use qmore_core::domain::PriorityPattern;
use qmore_core::port::queue_engine::mocks::InMemoryQueueEngine;
use qmore_core::port::shuffler::mocks::ReverseShuffler;
use qmore_core::port::{SeededShuffler, ThreadRngShuffler};
use qmore_infra_redis::decode::{decode_identifier_groups, decode_priority_patterns};
use qmore_integration_tests::{sorted, Harness};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

#[tokio::test]
async fn test_static_identifier_without_real_queue() {
    let harness = Harness::new(InMemoryQueueEngine::new(), Arc::new(ReverseShuffler));
    assert_eq!(harness.resolve(&["queueA"]).await, vec!["queueA"]);
}

#[tokio::test]
async fn test_wildcard_uses_known_queue_order() {
    let engine = InMemoryQueueEngine::new().with_known_queues(["jobs-1", "jobs-2", "other"]);
    let harness = Harness::new(engine, Arc::new(ReverseShuffler));
    assert_eq!(harness.resolve(&["jobs-*"]).await, vec!["jobs-1", "jobs-2"]);
}

#[tokio::test]
async fn test_negation_removes_prior_match() {
    let engine = InMemoryQueueEngine::new().with_known_queues(["jobs-1", "jobs-2"]);
    let harness = Harness::new(engine, Arc::new(ReverseShuffler));
    assert_eq!(harness.resolve(&["jobs-*", "!jobs-2"]).await, vec!["jobs-1"]);
}

#[tokio::test]
async fn test_negation_spares_names_the_engine_does_not_know() {
    let engine = InMemoryQueueEngine::new().with_known_queues(["reports-us"]);
    let harness = Harness::new(engine, Arc::new(ReverseShuffler));

    assert_eq!(
        harness
            .resolve(&["mail", "reports-eu", "reports-*", "!mail", "!reports-*"])
            .await,
        vec!["mail", "reports-eu"]
    );
}

#[tokio::test]
async fn test_negated_group_flips_member_negation() {
    // grp = [a, !b]; !@grp -> [!a, b]: "a" removed, "b" kept as a static name
    let engine = InMemoryQueueEngine::new()
        .with_group("grp", ["a", "!b"])
        .with_known_queues(["a", "b"]);
    let harness = Harness::new(engine, Arc::new(ReverseShuffler));

    assert_eq!(harness.resolve(&["a", "!@grp"]).await, vec!["b"]);
}

#[tokio::test]
async fn test_priority_buckets_around_default() {
    let engine = InMemoryQueueEngine::new().with_priorities(vec![
        PriorityPattern::new(["a"], false),
        PriorityPattern::new(["default"], false),
        PriorityPattern::new(["c"], false),
    ]);
    let harness = Harness::new(engine, Arc::new(ReverseShuffler));

    assert_eq!(harness.resolve(&["c", "b", "a"]).await, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_unclaimed_queue_appended_without_sentinel() {
    let engine =
        InMemoryQueueEngine::new().with_priorities(vec![PriorityPattern::new(["a"], false)]);
    let harness = Harness::new(engine, Arc::new(ReverseShuffler));

    assert_eq!(harness.resolve(&["b", "a"]).await, vec!["a", "b"]);
}

#[tokio::test]
async fn test_fair_bucket_is_always_a_permutation() {
    let engine = InMemoryQueueEngine::new()
        .with_known_queues(["x", "y", "z", "slow"])
        .with_priorities(vec![
            PriorityPattern::new(["x", "y", "z"], true),
            PriorityPattern::new(["default"], false),
        ]);
    let harness = Harness::new(engine, Arc::new(ThreadRngShuffler));

    for _ in 0..25 {
        let result = harness.resolve(&["*"]).await;
        assert_eq!(result.len(), 4);
        assert_eq!(sorted(result[..3].to_vec()), vec!["x", "y", "z"]);
        assert_eq!(result[3], "slow");
    }
}

#[tokio::test]
async fn test_seeded_shuffler_reproduces_fair_order() {
    let build = || {
        let engine = InMemoryQueueEngine::new()
            .with_known_queues(["q1", "q2", "q3", "q4", "q5"])
            .with_priorities(vec![PriorityPattern::new(["q*"], true)]);
        Harness::new(engine, Arc::new(SeededShuffler::new(7)))
    };

    let first = build();
    let second = build();
    for _ in 0..5 {
        assert_eq!(first.resolve(&["q*"]).await, second.resolve(&["q*"]).await);
    }
}

#[tokio::test]
async fn test_static_resolution_is_idempotent() {
    let engine = InMemoryQueueEngine::new()
        .with_known_queues(["unrelated"])
        .with_priorities(vec![PriorityPattern::new(["beta"], false)]);
    let harness = Harness::new(engine, Arc::new(ThreadRngShuffler));

    let first = harness.resolve(&["alpha", "beta", "gamma"]).await;
    let second = harness.resolve(&["alpha", "beta", "gamma"]).await;
    assert_eq!(first, vec!["beta", "alpha", "gamma"]);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_group_members_take_group_priority() {
    let engine = InMemoryQueueEngine::new()
        .with_group("mail", ["mail-*", "!mail-bulk"])
        .with_known_queues(["mail-fast", "mail-bulk", "reports", "mail-digest"])
        .with_priorities(vec![
            PriorityPattern::new(["reports"], false),
            PriorityPattern::new(["mail-*"], true),
        ]);
    let harness = Harness::new(engine, Arc::new(ReverseShuffler));

    let result = harness.resolve(&["@mail", "reports", "mail-bulk"]).await;
    // expansion: mail-fast, mail-bulk (revived in its original slot), mail-digest, reports
    // priority: [reports] then [mail-fast, mail-bulk, mail-digest] reversed by the fair shuffler
    assert_eq!(
        result,
        vec!["reports", "mail-digest", "mail-bulk", "mail-fast"]
    );
}

#[tokio::test]
async fn test_wire_replies_feed_the_pipeline() {
    // Engine replies as stored: JSON strings, `{}` standing in for empty lists
    let mut fields = HashMap::new();
    fields.insert("hot".to_string(), json!(["hot-*"]).to_string());
    fields.insert("unused".to_string(), "{}".to_string());
    let groups = decode_identifier_groups(fields).unwrap();

    let priorities = decode_priority_patterns(vec![
        json!({"pattern": ["hot-*"], "fairly": false}).to_string(),
        json!({"pattern": ["default"]}).to_string(),
        json!({"pattern": {}, "fairly": true}).to_string(),
    ])
    .unwrap();

    let mut engine = InMemoryQueueEngine::new()
        .with_known_queues(["cold", "hot-2", "hot-1"])
        .with_priorities(priorities);
    for (name, members) in groups {
        engine = engine.with_group(&name, members);
    }
    let harness = Harness::new(engine, Arc::new(ReverseShuffler));

    assert_eq!(
        harness.resolve(&["cold", "@hot", "@unused"]).await,
        vec!["hot-2", "hot-1", "cold"]
    );
}
