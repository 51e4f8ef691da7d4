//! Builder for configuring controller instances

use std::sync::Arc;

use url::Url;

use super::OfflineCacheController;
use super::controller::Settings;
use crate::Result;
use crate::cache::MemoryCacheStorage;
use crate::config::{CacheWriteMode, NotificationConfig, WorkerConfig};
use crate::fetch::ReqwestFetcher;
use crate::traits::{CacheStorage, Clients, Detached, Fetcher, Notifier};

/// Main entry point for creating controller instances.
pub struct Stowaway;

impl Stowaway {
    /// Create a new builder for configuring the controller.
    pub fn builder() -> StowawayBuilder {
        StowawayBuilder::new()
    }
}

/// Builder for configuring controller instances.
///
/// Unset capabilities default to a [`MemoryCacheStorage`], a
/// [`ReqwestFetcher`] scoped to the configured scope, and [`Detached`]
/// clients and notifications.
pub struct StowawayBuilder {
    config: WorkerConfig,
    caches: Option<Arc<dyn CacheStorage>>,
    fetcher: Option<Arc<dyn Fetcher>>,
    clients: Option<Arc<dyn Clients>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl StowawayBuilder {
    pub fn new() -> Self {
        Self {
            config: WorkerConfig::default(),
            caches: None,
            fetcher: None,
            clients: None,
            notifier: None,
        }
    }

    /// Replace the whole configuration (e.g. one loaded from TOML).
    pub fn config(mut self, config: WorkerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the cache generation name.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.config.version = version.into();
        self
    }

    /// Set the application scope URL.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.config.scope = scope.into();
        self
    }

    /// Replace the seed resource list.
    pub fn seed_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.seed_urls = urls.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the set of hosts served network-first.
    pub fn api_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.api_hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    /// Set the document served to offline navigations.
    pub fn offline_document(mut self, path: impl Into<String>) -> Self {
        self.config.offline_document = path.into();
        self
    }

    /// Set the background-sync tag that triggers the reconnect broadcast.
    pub fn sync_tag(mut self, tag: impl Into<String>) -> Self {
        self.config.sync_tag = tag.into();
        self
    }

    pub fn cache_write_mode(mut self, mode: CacheWriteMode) -> Self {
        self.config.cache_write_mode = mode;
        self
    }

    /// Cap each generation of the default in-memory store at `n` entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.config.max_entries = Some(n);
        self
    }

    pub fn notification(mut self, notification: NotificationConfig) -> Self {
        self.config.notification = notification;
        self
    }

    pub fn cache_storage(mut self, caches: Arc<dyn CacheStorage>) -> Self {
        self.caches = Some(caches);
        self
    }

    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn clients(mut self, clients: Arc<dyn Clients>) -> Self {
        self.clients = Some(clients);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Build the controller.
    ///
    /// Fails with `Configuration` for an empty version and `InvalidUrl`
    /// for a scope, seed or offline document that does not resolve.
    pub fn build(self) -> Result<OfflineCacheController> {
        let settings = Settings::resolve(&self.config)?;

        let caches: Arc<dyn CacheStorage> = match self.caches {
            Some(caches) => caches,
            None => match self.config.max_entries {
                Some(max) => Arc::new(MemoryCacheStorage::with_max_entries(max)),
                None => Arc::new(MemoryCacheStorage::new()),
            },
        };
        let fetcher: Arc<dyn Fetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(ReqwestFetcher::new(&Url::parse(&self.config.scope)?)),
        };
        let clients: Arc<dyn Clients> = match self.clients {
            Some(clients) => clients,
            None => Arc::new(Detached),
        };
        let notifier: Arc<dyn Notifier> = match self.notifier {
            Some(notifier) => notifier,
            None => Arc::new(Detached),
        };

        Ok(OfflineCacheController::new(
            settings, caches, fetcher, clients, notifier,
        ))
    }
}

impl Default for StowawayBuilder {
    fn default() -> Self {
        Self::new()
    }
}
