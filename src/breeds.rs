//! Cat breed registry.
//!
//! Cat creation is gated on the breed being listed in an external catalog.
//! [`CatApiRegistry`] consults TheCatAPI (or any endpoint serving the same
//! shape) with a bounded timeout and a TTL cache; [`StaticBreedRegistry`] is a
//! fixed in-process list.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::config::BreedRegistryConfig;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to fetch breeds: {0}")]
    Request(#[from] reqwest::Error),

    #[error("breed registry returned HTTP {0}")]
    Status(reqwest::StatusCode),
}

/// Source of truth for valid breed names.
#[async_trait]
pub trait BreedRegistry: Send + Sync {
    /// Whether `breed` is a recognised breed name (exact match).
    async fn breed_exists(&self, breed: &str) -> Result<bool, RegistryError>;
}

#[derive(Debug, Deserialize)]
struct BreedEntry {
    name: String,
}

#[derive(Debug, Default)]
struct BreedCache {
    fetched_at: Option<Instant>,
    names: Arc<HashSet<String>>,
}

/// HTTP client for a breed catalog returning `[{"name": ...}, ...]`.
pub struct CatApiRegistry {
    client: reqwest::Client,
    url: String,
    cache_ttl: Duration,
    cache: Mutex<BreedCache>,
}

impl CatApiRegistry {
    pub fn new(config: &BreedRegistryConfig) -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
            cache_ttl: config.cache_ttl,
            cache: Mutex::new(BreedCache::default()),
        })
    }

    async fn fetch_names(&self) -> Result<HashSet<String>, RegistryError> {
        let resp = self.client.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(RegistryError::Status(status));
        }
        let entries: Vec<BreedEntry> = resp.json().await?;
        Ok(entries.into_iter().map(|entry| entry.name).collect())
    }

    async fn names(&self) -> Result<Arc<HashSet<String>>, RegistryError> {
        let caching = !self.cache_ttl.is_zero();

        if caching {
            let cache = self.cache.lock().await;
            if let Some(fetched_at) = cache.fetched_at {
                if fetched_at.elapsed() < self.cache_ttl {
                    return Ok(Arc::clone(&cache.names));
                }
            }
        }

        let names = Arc::new(self.fetch_names().await?);
        tracing::debug!("Fetched {} breeds from {}", names.len(), self.url);

        if caching {
            let mut cache = self.cache.lock().await;
            cache.fetched_at = Some(Instant::now());
            cache.names = Arc::clone(&names);
        }

        Ok(names)
    }
}

#[async_trait]
impl BreedRegistry for CatApiRegistry {
    async fn breed_exists(&self, breed: &str) -> Result<bool, RegistryError> {
        Ok(self.names().await?.contains(breed))
    }
}

/// Registry backed by a fixed list of names.
#[derive(Debug, Clone, Default)]
pub struct StaticBreedRegistry {
    breeds: HashSet<String>,
}

impl StaticBreedRegistry {
    pub fn new<I, S>(breeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            breeds: breeds.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl BreedRegistry for StaticBreedRegistry {
    async fn breed_exists(&self, breed: &str) -> Result<bool, RegistryError> {
        Ok(self.breeds.contains(breed))
    }
}
