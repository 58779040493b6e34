// Qmore Infrastructure - Redis Adapter
// Implements: QueueEngine (read API) plus pattern administration writes

mod config;
mod connection;
pub mod decode;
mod engine;

pub use config::RedisEngineConfig;
pub use connection::connect;
pub use engine::RedisQueueEngine;

// Note: redis::RedisError conversion lives in connection.rs (map_redis_error)
// because of orphan rules (cannot implement From<redis::RedisError> for AppError here)
