// Application Layer - Resolution pipeline and its stages

pub mod group_expansion;
pub mod pattern_cache;
pub mod priority_ordering;
pub mod resolver;
pub mod transformer;

// Re-exports
pub use group_expansion::IdentifierGroupTransformer;
pub use pattern_cache::PatternCache;
pub use priority_ordering::PriorityTransformer;
pub use resolver::QueueResolver;
pub use transformer::QueueTransformer;
