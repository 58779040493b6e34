// Queue Engine Port (Interface)
// Read-only view of the remote engine consumed by the resolution pipeline

use crate::domain::{IdentifierGroupPatterns, PriorityPattern};
use crate::error::Result;
use async_trait::async_trait;

/// Remote engine read API
///
/// Each call is independently fallible and never retried by callers in this crate.
#[async_trait]
pub trait QueueEngine: Send + Sync {
    /// Group name -> ordered member patterns
    async fn get_identifier_group_patterns(&self) -> Result<IdentifierGroupPatterns>;

    /// Ordered priority entries, highest priority first
    async fn get_priority_patterns(&self) -> Result<Vec<PriorityPattern>>;

    /// Real queue names currently known to the engine
    async fn get_known_queue_names(&self) -> Result<Vec<String>>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// In-memory engine with call counters and failure injection
    #[derive(Default)]
    pub struct InMemoryQueueEngine {
        groups: Mutex<IdentifierGroupPatterns>,
        priorities: Mutex<Vec<PriorityPattern>>,
        known_queues: Mutex<Vec<String>>,
        failure: Mutex<Option<String>>,
        latency: Mutex<Option<Duration>>,
        group_calls: AtomicUsize,
        priority_calls: AtomicUsize,
        known_queue_calls: AtomicUsize,
    }

    impl InMemoryQueueEngine {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_known_queues<I, S>(self, names: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.set_known_queues(names);
            self
        }

        pub fn with_group<I, S>(self, name: &str, members: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.set_group(name, members);
            self
        }

        pub fn with_priorities(self, priorities: Vec<PriorityPattern>) -> Self {
            self.set_priorities(priorities);
            self
        }

        /// Delay every engine call (widens race windows in concurrency tests)
        pub fn with_latency(self, latency: Duration) -> Self {
            *self.latency.lock().unwrap() = Some(latency);
            self
        }

        pub fn set_known_queues<I, S>(&self, names: I)
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            *self.known_queues.lock().unwrap() = names.into_iter().map(Into::into).collect();
        }

        pub fn set_group<I, S>(&self, name: &str, members: I)
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.groups.lock().unwrap().insert(
                name.to_string(),
                members.into_iter().map(Into::into).collect(),
            );
        }

        pub fn set_priorities(&self, priorities: Vec<PriorityPattern>) {
            *self.priorities.lock().unwrap() = priorities;
        }

        /// Make every subsequent call fail with `AppError::Engine(message)`
        pub fn fail_with(&self, message: impl Into<String>) {
            *self.failure.lock().unwrap() = Some(message.into());
        }

        pub fn recover(&self) {
            *self.failure.lock().unwrap() = None;
        }

        pub fn group_calls(&self) -> usize {
            self.group_calls.load(Ordering::SeqCst)
        }

        pub fn priority_calls(&self) -> usize {
            self.priority_calls.load(Ordering::SeqCst)
        }

        pub fn known_queue_calls(&self) -> usize {
            self.known_queue_calls.load(Ordering::SeqCst)
        }

        async fn simulate_call(&self) -> Result<()> {
            let latency = *self.latency.lock().unwrap();
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            let failure = self.failure.lock().unwrap().clone();
            match failure {
                Some(message) => Err(AppError::Engine(message)),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl QueueEngine for InMemoryQueueEngine {
        async fn get_identifier_group_patterns(&self) -> Result<IdentifierGroupPatterns> {
            self.group_calls.fetch_add(1, Ordering::SeqCst);
            self.simulate_call().await?;
            Ok(self.groups.lock().unwrap().clone())
        }

        async fn get_priority_patterns(&self) -> Result<Vec<PriorityPattern>> {
            self.priority_calls.fetch_add(1, Ordering::SeqCst);
            self.simulate_call().await?;
            Ok(self.priorities.lock().unwrap().clone())
        }

        async fn get_known_queue_names(&self) -> Result<Vec<String>> {
            self.known_queue_calls.fetch_add(1, Ordering::SeqCst);
            self.simulate_call().await?;
            Ok(self.known_queues.lock().unwrap().clone())
        }
    }
}
