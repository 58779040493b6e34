// Domain Layer - Identifiers, patterns and their compiled forms

pub mod glob;
pub mod group;
pub mod identifier;
pub mod priority;

// Re-exports
pub use glob::GlobPattern;
pub use group::{IdentifierGroupPatterns, IdentifierGroups};
pub use identifier::{IdentifierKind, QueueIdentifier};
pub use priority::{BucketRule, BucketSpec, DefaultPlacement, PriorityPattern, PriorityPlan};
