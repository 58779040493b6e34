// Queue Transformer Port (pipeline stage)

use crate::domain::QueueIdentifier;
use crate::error::Result;
use async_trait::async_trait;

/// One stage of the resolution pipeline
///
/// Each stage owns its own list hygiene (dedup, ordering); the pipeline
/// passes outputs through untouched.
#[async_trait]
pub trait QueueTransformer: Send + Sync {
    /// Short stage name for logs
    fn name(&self) -> &'static str;

    /// Transform the accumulated identifier list
    async fn transform(&self, identifiers: Vec<QueueIdentifier>) -> Result<Vec<QueueIdentifier>>;

    /// Drop any cached remote state so the next call refetches
    fn invalidate(&self) {}
}
