// Redis engine configuration

use serde::{Deserialize, Serialize};

const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_KEY_PREFIX: &str = "ql";

/// Where the engine keeps its state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisEngineConfig {
    /// Redis connection URL
    pub url: String,
    /// Key namespace shared with the engine's scripts
    pub key_prefix: String,
}

impl Default for RedisEngineConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REDIS_URL.to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

impl RedisEngineConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Hash: group name -> JSON array of member patterns
    pub fn identifier_groups_key(&self) -> String {
        format!("{}:qmore:dynamic", self.key_prefix)
    }

    /// List: one JSON priority entry per element
    pub fn priority_patterns_key(&self) -> String {
        format!("{}:qmore:priority", self.key_prefix)
    }

    /// Sorted set of known queue names
    pub fn known_queues_key(&self) -> String {
        format!("{}:queues", self.key_prefix)
    }
}
