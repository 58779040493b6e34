// Port Layer - Interfaces for external dependencies

pub mod queue_engine;
pub mod shuffler; // For deterministic testing
pub mod time_provider;

// Re-exports
pub use queue_engine::QueueEngine;
pub use shuffler::{SeededShuffler, Shuffler, ThreadRngShuffler};
pub use time_provider::{SystemTimeProvider, TimeProvider};
