use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// In-process cache of ranked match responses
///
/// Entries are stored as serialized JSON and expire after the configured
/// TTL. Keys carry the catalog generation they were computed from, so a
/// ranking stored after a write is never looked up again. Catalog writes
/// also clear the cache to release memory early.
pub struct CacheManager {
    cache: moka::future::Cache<String, Vec<u8>>,
}

impl CacheManager {
    /// Create a new cache manager
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// Get a value from cache
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        match self.cache.get(key).await {
            Some(bytes) => {
                tracing::trace!("Cache hit: {}", key);
                Ok(serde_json::from_slice(&bytes)?)
            }
            None => {
                tracing::trace!("Cache miss: {}", key);
                Err(CacheError::CacheMiss(key.to_string()))
            }
        }
    }

    /// Set a value in cache
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let bytes = serde_json::to_vec(value)?;
        self.cache.insert(key.to_string(), bytes).await;

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Drop every cached ranking
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
        tracing::debug!("Invalidated match cache");
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Ranked properties for a stored customer
    pub fn customer_matches(customer_id: &Uuid, limit: usize, generation: u64) -> String {
        format!("customer_matches:{}:{}:{}", customer_id, limit, generation)
    }

    /// Ranked customers for a stored property
    pub fn property_matches(property_id: &Uuid, limit: usize, generation: u64) -> String {
        format!("property_matches:{}:{}:{}", property_id, limit, generation)
    }
}
