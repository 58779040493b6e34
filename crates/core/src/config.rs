// Resolver configuration

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Default TTL for cached pattern definitions (60s)
pub const DEFAULT_PATTERN_CACHE_TTL_MS: i64 = 60_000;

/// Tuning for the standard resolution pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// How long identifier-group definitions are reused before refetching
    pub group_cache_ttl_ms: i64,
    /// How long priority patterns are reused before refetching
    pub priority_cache_ttl_ms: i64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            group_cache_ttl_ms: DEFAULT_PATTERN_CACHE_TTL_MS,
            priority_cache_ttl_ms: DEFAULT_PATTERN_CACHE_TTL_MS,
        }
    }
}

impl ResolverConfig {
    /// Reject negative TTLs before anything touches the engine
    pub fn validate(&self) -> Result<()> {
        if self.group_cache_ttl_ms < 0 {
            return Err(AppError::Config(format!(
                "group_cache_ttl_ms must be >= 0 (got {})",
                self.group_cache_ttl_ms
            )));
        }
        if self.priority_cache_ttl_ms < 0 {
            return Err(AppError::Config(format!(
                "priority_cache_ttl_ms must be >= 0 (got {})",
                self.priority_cache_ttl_ms
            )));
        }
        Ok(())
    }
}
