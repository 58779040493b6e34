// Redis QueueEngine Implementation

use crate::config::RedisEngineConfig;
use crate::connection::{connect, map_redis_error};
use crate::decode;
use async_trait::async_trait;
use qmore_core::domain::{IdentifierGroupPatterns, PriorityPattern};
use qmore_core::error::Result;
use qmore_core::port::QueueEngine;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::collections::HashMap;
use tracing::{debug, info};

/// Reads (and administers) pattern definitions stored by the engine
pub struct RedisQueueEngine {
    connection: ConnectionManager,
    config: RedisEngineConfig,
}

impl RedisQueueEngine {
    /// Connect using `config.url`
    pub async fn connect(config: RedisEngineConfig) -> Result<Self> {
        let connection = connect(&config.url).await?;
        Ok(Self::from_connection(connection, config))
    }

    /// Share an existing managed connection
    pub fn from_connection(connection: ConnectionManager, config: RedisEngineConfig) -> Self {
        Self { connection, config }
    }

    pub fn config(&self) -> &RedisEngineConfig {
        &self.config
    }

    /// Replace one group's members; an empty list deletes the group
    pub async fn set_identifier_group(&self, name: &str, members: &[String]) -> Result<()> {
        let key = self.config.identifier_groups_key();
        let mut conn = self.connection.clone();

        if members.is_empty() {
            conn.hdel::<_, _, ()>(&key, name)
                .await
                .map_err(map_redis_error)?;
            info!(group = name, "Deleted identifier group");
        } else {
            let encoded = decode::encode_member_list(members)?;
            conn.hset::<_, _, _, ()>(&key, name, encoded)
                .await
                .map_err(map_redis_error)?;
            info!(group = name, members = members.len(), "Stored identifier group");
        }
        Ok(())
    }

    /// Atomically replace the whole priority list
    pub async fn set_priority_patterns(&self, patterns: &[PriorityPattern]) -> Result<()> {
        let key = self.config.priority_patterns_key();
        let encoded = patterns
            .iter()
            .map(decode::encode_priority_pattern)
            .collect::<Result<Vec<_>>>()?;

        let mut pipe = redis::pipe();
        pipe.atomic().del(&key).ignore();
        if !encoded.is_empty() {
            pipe.rpush(&key, encoded).ignore();
        }

        let mut conn = self.connection.clone();
        pipe.query_async::<_, ()>(&mut conn)
            .await
            .map_err(map_redis_error)?;

        info!(entries = patterns.len(), "Stored priority patterns");
        Ok(())
    }
}

#[async_trait]
impl QueueEngine for RedisQueueEngine {
    async fn get_identifier_group_patterns(&self) -> Result<IdentifierGroupPatterns> {
        let mut conn = self.connection.clone();
        let fields: HashMap<String, String> = conn
            .hgetall(self.config.identifier_groups_key())
            .await
            .map_err(map_redis_error)?;

        debug!(groups = fields.len(), "Fetched identifier groups");
        decode::decode_identifier_groups(fields)
    }

    async fn get_priority_patterns(&self) -> Result<Vec<PriorityPattern>> {
        let mut conn = self.connection.clone();
        let elements: Vec<String> = conn
            .lrange(self.config.priority_patterns_key(), 0, -1)
            .await
            .map_err(map_redis_error)?;

        debug!(entries = elements.len(), "Fetched priority patterns");
        decode::decode_priority_patterns(elements)
    }

    async fn get_known_queue_names(&self) -> Result<Vec<String>> {
        let mut conn = self.connection.clone();
        let names: Vec<String> = conn
            .zrange(self.config.known_queues_key(), 0, -1)
            .await
            .map_err(map_redis_error)?;

        debug!(queues = names.len(), "Fetched known queue names");
        Ok(names)
    }
}
