//! In-memory cache generations.
//!
//! [`MemoryCacheStorage`] implements [`CacheStorage`] on top of moka. Each
//! generation is its own `moka::future::Cache`, keyed on
//! [`RequestKey`] (method + URL, fragment excluded). Generations are kept
//! in creation order so [`keys`](CacheStorage::keys) enumerates them the way
//! a browser's cache storage does.
//!
//! Lookups and inserts clone the generation handle out of the registry lock
//! before awaiting, so a slow insert never blocks enumeration or deletion.
//!
//! # Capacity
//!
//! Generations are unbounded by default: nothing is evicted until the whole
//! generation is deleted. [`MemoryCacheStorage::with_max_entries`] caps each
//! generation. A capped generation refuses a [`put_all`](CacheStorage::put_all)
//! batch that does not fit, so provisioning stays all-or-nothing, but single
//! [`put`](CacheStorage::put) calls may evict any entry once the cap is
//! reached, seed resources and the offline document included.

use std::collections::HashSet;

use async_trait::async_trait;
use moka::future::Cache;
use tokio::sync::RwLock;

use crate::traits::CacheStorage;
use crate::types::{Request, RequestKey, Response};
use crate::{Result, StowawayError};

type Generation = Cache<RequestKey, Response>;

/// Thread-safe in-memory cache storage.
pub struct MemoryCacheStorage {
    generations: RwLock<Vec<(String, Generation)>>,
    max_entries: Option<u64>,
}

impl MemoryCacheStorage {
    /// Create an empty store with unbounded generations.
    pub fn new() -> Self {
        Self {
            generations: RwLock::new(Vec::new()),
            max_entries: None,
        }
    }

    /// Create a store holding at most `max` entries per generation.
    ///
    /// See the [module docs](self) for what a cap means for seed resources.
    pub fn with_max_entries(max: u64) -> Self {
        Self {
            generations: RwLock::new(Vec::new()),
            max_entries: Some(max),
        }
    }

    /// Number of entries in a generation, or `None` if it does not exist.
    pub async fn entry_count(&self, generation: &str) -> Option<u64> {
        let cache = self.get(generation).await?;
        cache.run_pending_tasks().await;
        Some(cache.entry_count())
    }

    async fn get(&self, generation: &str) -> Option<Generation> {
        self.generations
            .read()
            .await
            .iter()
            .find(|(name, _)| name == generation)
            .map(|(_, cache)| cache.clone())
    }

    async fn get_or_create(&self, generation: &str) -> Generation {
        if let Some(cache) = self.get(generation).await {
            return cache;
        }
        let mut generations = self.generations.write().await;
        // Another task may have created it between the two locks.
        if let Some((_, cache)) = generations.iter().find(|(name, _)| name == generation) {
            return cache.clone();
        }
        let mut builder = Cache::builder();
        if let Some(max) = self.max_entries {
            builder = builder.max_capacity(max);
        }
        let cache = builder.build();
        generations.push((generation.to_string(), cache.clone()));
        cache
    }
}

impl Default for MemoryCacheStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self
            .generations
            .read()
            .await
            .iter()
            .map(|(name, _)| name.clone())
            .collect())
    }

    async fn open(&self, generation: &str) -> Result<()> {
        self.get_or_create(generation).await;
        Ok(())
    }

    async fn delete(&self, generation: &str) -> Result<bool> {
        let mut generations = self.generations.write().await;
        let before = generations.len();
        generations.retain(|(name, _)| name != generation);
        Ok(generations.len() != before)
    }

    async fn put(&self, generation: &str, request: &Request, response: Response) -> Result<()> {
        let cache = self.get_or_create(generation).await;
        cache.insert(request.key(), response).await;
        Ok(())
    }

    async fn put_all(&self, generation: &str, entries: Vec<(Request, Response)>) -> Result<()> {
        let cache = self.get_or_create(generation).await;
        if let Some(max) = self.max_entries {
            cache.run_pending_tasks().await;
            let fresh: HashSet<RequestKey> = entries
                .iter()
                .map(|(request, _)| request.key())
                .filter(|key| !cache.contains_key(key))
                .collect();
            let needed = cache.entry_count() + fresh.len() as u64;
            if needed > max {
                return Err(StowawayError::Cache(format!(
                    "generation {generation} holds at most {max} entries, {needed} required"
                )));
            }
        }
        for (request, response) in entries {
            cache.insert(request.key(), response).await;
        }
        Ok(())
    }

    async fn match_request(
        &self,
        generation: &str,
        request: &Request,
    ) -> Result<Option<Response>> {
        match self.get(generation).await {
            Some(cache) => Ok(cache.get(&request.key()).await),
            None => Ok(None),
        }
    }

    async fn has(&self, generation: &str) -> Result<bool> {
        Ok(self.get(generation).await.is_some())
    }
}
