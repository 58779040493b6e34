// Redis Connection Setup

use qmore_core::error::{AppError, Result};
use redis::aio::ConnectionManager;
use redis::ErrorKind;
use tracing::info;

/// Open a managed connection (reconnects on its own after drops)
pub async fn connect(url: &str) -> Result<ConnectionManager> {
    let client = redis::Client::open(url)
        .map_err(|e| AppError::Config(format!("Invalid Redis URL {}: {}", url, e)))?;

    let manager = ConnectionManager::new(client)
        .await
        .map_err(map_redis_error)?;

    info!(url = %url, "Connected to queue engine store");
    Ok(manager)
}

// Helper to convert redis::RedisError to AppError with structured information
pub(crate) fn map_redis_error(err: redis::RedisError) -> AppError {
    if err.is_timeout() {
        return AppError::Engine(format!("Redis timeout: {}", err));
    }
    if err.is_connection_dropped() || err.is_connection_refusal() {
        return AppError::Engine(format!("Redis connection lost: {}", err));
    }

    match err.kind() {
        ErrorKind::TypeError => AppError::Engine(format!("Unexpected Redis reply: {}", err)),
        ErrorKind::AuthenticationFailed => {
            AppError::Engine(format!("Redis authentication failed: {}", err))
        }
        ErrorKind::ResponseError | ErrorKind::ExtensionError => {
            AppError::Engine(format!("Redis command failed: {}", err))
        }
        _ => AppError::Engine(format!("Redis error: {}", err)),
    }
}
