//! OfflineCacheController - lifecycle handling and event dispatch

use std::sync::Arc;

use futures_util::future::{join_all, try_join_all};
use tracing::{debug, error, info, warn};
use url::Url;

use super::pending::PendingWrites;
use super::state::{EventOutcome, StateCell, WorkerEvent, WorkerState};
use crate::config::{CacheWriteMode, NotificationConfig, WorkerConfig};
use crate::telemetry;
use crate::traits::{CacheStorage, Clients, Fetcher, Notifier};
use crate::types::Request;
use crate::{Result, StowawayError};

/// Configuration with every URL resolved against the scope.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) version: String,
    pub(crate) seed_urls: Vec<Url>,
    pub(crate) api_hosts: Vec<String>,
    pub(crate) offline_document: Url,
    pub(crate) root: Url,
    pub(crate) sync_tag: String,
    pub(crate) write_mode: CacheWriteMode,
    pub(crate) notification: NotificationConfig,
}

impl Settings {
    pub(crate) fn resolve(config: &WorkerConfig) -> Result<Self> {
        if config.version.trim().is_empty() {
            return Err(StowawayError::Configuration(
                "cache version must not be empty".to_string(),
            ));
        }
        let scope = Url::parse(&config.scope)?;
        let seed_urls = config
            .seed_urls
            .iter()
            .map(|u| scope.join(u))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            version: config.version.clone(),
            seed_urls,
            api_hosts: config.api_hosts.clone(),
            offline_document: scope.join(&config.offline_document)?,
            root: scope.join("/")?,
            sync_tag: config.sync_tag.clone(),
            write_mode: config.cache_write_mode,
            notification: config.notification.clone(),
        })
    }
}

/// Offline cache controller.
///
/// Owns one cache generation (named by the configured version) and reacts
/// to the host's lifecycle events. Share it as `Arc<OfflineCacheController>`
/// across concurrently running handlers.
///
/// Handlers that spawn background cache writes must run inside a tokio
/// runtime.
pub struct OfflineCacheController {
    pub(crate) settings: Settings,
    pub(crate) caches: Arc<dyn CacheStorage>,
    pub(crate) fetcher: Arc<dyn Fetcher>,
    pub(crate) clients: Arc<dyn Clients>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) pending: PendingWrites,
    state: StateCell,
}

impl OfflineCacheController {
    pub(crate) fn new(
        settings: Settings,
        caches: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
        clients: Arc<dyn Clients>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            settings,
            caches,
            fetcher,
            clients,
            notifier,
            pending: PendingWrites::new(),
            state: StateCell::new(),
        }
    }

    /// Name of the current cache generation.
    pub fn version(&self) -> &str {
        &self.settings.version
    }

    /// Seed resources, resolved against the scope.
    pub fn seed_urls(&self) -> &[Url] {
        &self.settings.seed_urls
    }

    pub fn state(&self) -> WorkerState {
        self.state.get()
    }

    /// Route a lifecycle event to its handler.
    pub async fn dispatch(&self, event: WorkerEvent) -> Result<EventOutcome> {
        debug!(event = event.name(), "dispatching event");
        match event {
            WorkerEvent::Install => {
                self.install().await?;
                Ok(EventOutcome::Installed)
            }
            WorkerEvent::Activate => {
                let deleted = self.activate().await?;
                Ok(EventOutcome::Activated { deleted })
            }
            WorkerEvent::Fetch(request) => Ok(EventOutcome::Fetch(
                self.handle_fetch(&request).await?,
            )),
            WorkerEvent::Sync { tag } => Ok(EventOutcome::Synced {
                notified: self.handle_sync(&tag).await?,
            }),
            WorkerEvent::Push { data } => Ok(EventOutcome::Pushed {
                shown: self.handle_push(data.as_deref()).await?,
            }),
            WorkerEvent::NotificationClick {
                notification,
                action,
            } => Ok(EventOutcome::NotificationClicked(
                self.handle_notification_click(&notification, action.as_deref())
                    .await?,
            )),
        }
    }

    /// Install: fetch every seed resource and store them all in the current
    /// generation.
    ///
    /// All-or-nothing: if any seed fails (network error or non-2xx status),
    /// nothing is stored, the worker becomes [`WorkerState::Redundant`] and
    /// the first failure is returned so the host can retry installation.
    pub async fn install(&self) -> Result<()> {
        self.state.set(WorkerState::Installing);
        match self.provision().await {
            Ok(()) => {
                self.state.set(WorkerState::Installed);
                Ok(())
            }
            Err(e) => {
                self.state.set(WorkerState::Redundant);
                Err(e)
            }
        }
    }

    async fn provision(&self) -> Result<()> {
        let generation = &self.settings.version;
        info!(
            %generation,
            count = self.settings.seed_urls.len(),
            "caching seed resources"
        );

        let requests: Vec<Request> = self
            .settings
            .seed_urls
            .iter()
            .cloned()
            .map(Request::get_url)
            .collect();
        let results = join_all(requests.iter().map(|r| self.fetcher.fetch(r))).await;

        let mut entries = Vec::with_capacity(requests.len());
        let mut first_failure = None;
        for (request, result) in requests.into_iter().zip(results) {
            let url = request.url().to_string();
            match result {
                Ok(response) if response.is_ok() => entries.push((request, response)),
                Ok(response) => {
                    error!(%url, status = response.status, "seed resource returned failure status");
                    if first_failure.is_none() {
                        first_failure = Some(StowawayError::Provisioning {
                            url,
                            reason: format!("status {}", response.status),
                        });
                    }
                }
                Err(e) => {
                    error!(%url, error = %e, "error caching seed resource");
                    if first_failure.is_none() {
                        first_failure = Some(StowawayError::Provisioning {
                            url,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        if let Some(err) = first_failure {
            return Err(err);
        }

        let existed = self.caches.has(generation).await?;
        self.caches.open(generation).await?;
        if let Err(e) = self.caches.put_all(generation, entries).await {
            error!(%generation, error = %e, "error storing seed resources");
            if !existed {
                self.caches.delete(generation).await?;
            }
            return Err(e);
        }
        Ok(())
    }

    /// Activate: delete every generation other than the current one, then
    /// start intercepting requests. Returns the number of generations deleted.
    ///
    /// Only an installed worker can activate. In any other state (including
    /// after a failed install) this returns [`StowawayError::Lifecycle`] and
    /// leaves every generation in place.
    pub async fn activate(&self) -> Result<usize> {
        let state = self.state();
        if state != WorkerState::Installed {
            warn!(%state, "activation refused");
            return Err(StowawayError::Lifecycle {
                event: "activate",
                state,
            });
        }
        self.state.set(WorkerState::Activating);
        let current = &self.settings.version;

        let names = self.caches.keys().await?;
        let stale: Vec<&String> = names.iter().filter(|name| *name != current).collect();
        try_join_all(stale.iter().map(|name| async move {
            info!(generation = %name, "deleting old cache");
            self.caches.delete(name).await
        }))
        .await?;

        metrics::counter!(telemetry::GENERATIONS_DELETED_TOTAL).increment(stale.len() as u64);
        self.state.set(WorkerState::Activated);
        info!(generation = %current, deleted = stale.len(), "activated");
        Ok(stale.len())
    }

    /// Wait for all background cache writes started so far.
    ///
    /// Returns how many writes were awaited. Writes started after this call
    /// begins are not covered. Writes are never aborted: dropping the
    /// controller, or cancelling this future, leaves them running on the
    /// runtime.
    pub async fn flush(&self) -> usize {
        self.pending.flush().await
    }
}
