//! Pattern Cache - TTL-bounded, single-flight memo of one remote value
//!
//! Readers never wait on a refresh while the held value is fresh. When it
//! expires, exactly one caller performs the fetch; concurrent callers queue on
//! the refresh lock and then observe the value it stored.

use crate::error::{AppError, Result};
use crate::port::TimeProvider;
use std::future::Future;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;
use tracing::debug;

struct CacheState<T> {
    value: Option<Arc<T>>,
    expires_at: i64,
}

/// Single remotely-sourced value with TTL expiry
pub struct PatternCache<T> {
    name: &'static str,
    ttl_ms: i64,
    time_provider: Arc<dyn TimeProvider>,
    state: RwLock<CacheState<T>>,
    refresh_lock: Mutex<()>,
}

impl<T> PatternCache<T> {
    /// Create an empty (already expired) cache
    ///
    /// # Errors
    /// `AppError::Config` if `ttl_ms` is negative
    pub fn new(
        name: &'static str,
        ttl_ms: i64,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Result<Self> {
        if ttl_ms < 0 {
            return Err(AppError::Config(format!(
                "{} cache TTL must be >= 0 (got {})",
                name, ttl_ms
            )));
        }
        Ok(Self {
            name,
            ttl_ms,
            time_provider,
            state: RwLock::new(CacheState {
                value: None,
                expires_at: 0,
            }),
            refresh_lock: Mutex::new(()),
        })
    }

    /// Return the held value, refreshing it with `fetch` once it has expired
    ///
    /// A failed fetch leaves the previous value and expiry untouched, so the
    /// next caller retries.
    pub async fn get_or_refresh<F, Fut>(&self, fetch: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.fresh_value() {
            return Ok(value);
        }

        let _guard = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited
        if let Some(value) = self.fresh_value() {
            debug!(cache = self.name, "Pattern cache refreshed by concurrent caller");
            return Ok(value);
        }

        let now = self.time_provider.now_millis();
        debug!(cache = self.name, ttl_ms = self.ttl_ms, "Refreshing pattern cache");
        let value = Arc::new(fetch().await?);

        let mut state = self.state.write().unwrap_or_else(|p| p.into_inner());
        state.value = Some(Arc::clone(&value));
        state.expires_at = now.saturating_add(self.ttl_ms);

        Ok(value)
    }

    /// Force the next access to refetch
    pub fn invalidate(&self) {
        let mut state = self.state.write().unwrap_or_else(|p| p.into_inner());
        state.expires_at = 0;
    }

    /// Epoch millis at which the held value goes stale (0 = never populated)
    pub fn expires_at(&self) -> i64 {
        self.state.read().unwrap_or_else(|p| p.into_inner()).expires_at
    }

    pub fn ttl_ms(&self) -> i64 {
        self.ttl_ms
    }

    fn fresh_value(&self) -> Option<Arc<T>> {
        let now = self.time_provider.now_millis();
        let state = self.state.read().unwrap_or_else(|p| p.into_inner());
        if now < state.expires_at {
            state.value.clone()
        } else {
            None
        }
    }
}
