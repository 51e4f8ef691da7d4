//! In-memory fakes for the host capabilities.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use url::Url;

use stowaway::{
    CacheWriteMode, ClientInfo, ClientMessage, Clients, Fetcher, MemoryCacheStorage, Notifier,
    NotificationOptions, OfflineCacheController, Request, Response, Result, Stowaway,
    StowawayError,
};

pub const SCOPE: &str = "https://chat.example.com/";

// ============================================================================
// Fetcher
// ============================================================================

/// Serves canned responses by URL; unknown URLs get a 404. Can be switched
/// offline, in which case every fetch fails with a network error.
#[derive(Default)]
pub struct FakeFetcher {
    routes: Mutex<HashMap<String, Response>>,
    offline: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self, url: &str, response: Response) {
        self.routes.lock().unwrap().insert(url.to_string(), response);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == url).count()
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response> {
        let url = request.url().to_string();
        self.calls.lock().unwrap().push(url.clone());
        if self.offline.load(Ordering::SeqCst) {
            return Err(StowawayError::Network("offline".to_string()));
        }
        Ok(self
            .routes
            .lock()
            .unwrap()
            .get(&url)
            .cloned()
            .unwrap_or_else(|| Response::new(404, "")))
    }
}

// ============================================================================
// Clients
// ============================================================================

#[derive(Default)]
pub struct FakeClients {
    pub clients: Mutex<Vec<ClientInfo>>,
    pub messages: Mutex<Vec<(String, ClientMessage)>>,
    pub focused: Mutex<Vec<String>>,
    pub opened: Mutex<Vec<Url>>,
}

impl FakeClients {
    pub fn with_clients(clients: Vec<ClientInfo>) -> Self {
        Self {
            clients: Mutex::new(clients),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Clients for FakeClients {
    async fn match_all(&self) -> Result<Vec<ClientInfo>> {
        Ok(self.clients.lock().unwrap().clone())
    }

    async fn post_message(&self, client: &ClientInfo, message: &ClientMessage) -> Result<()> {
        self.messages
            .lock()
            .unwrap()
            .push((client.id.clone(), message.clone()));
        Ok(())
    }

    async fn focus(&self, client: &ClientInfo) -> Result<()> {
        self.focused.lock().unwrap().push(client.id.clone());
        Ok(())
    }

    async fn open_window(&self, url: &Url) -> Result<()> {
        self.opened.lock().unwrap().push(url.clone());
        Ok(())
    }
}

// ============================================================================
// Notifier
// ============================================================================

#[derive(Default)]
pub struct FakeNotifier {
    pub shown: Mutex<Vec<(String, NotificationOptions)>>,
    pub closed: Mutex<Vec<String>>,
    /// When set, `close` fails as if the notification were already gone.
    pub fail_close: AtomicBool,
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn show_notification(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<String> {
        let mut shown = self.shown.lock().unwrap();
        shown.push((title.to_string(), options.clone()));
        Ok(format!("n{}", shown.len()))
    }

    async fn close(&self, id: &str) -> Result<()> {
        if self.fail_close.load(Ordering::SeqCst) {
            return Err(StowawayError::Notification(format!("no notification {id}")));
        }
        self.closed.lock().unwrap().push(id.to_string());
        Ok(())
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub controller: OfflineCacheController,
    pub caches: Arc<MemoryCacheStorage>,
    pub fetcher: Arc<FakeFetcher>,
    pub clients: Arc<FakeClients>,
    pub notifier: Arc<FakeNotifier>,
}

/// Controller over fresh fakes, with cache writes awaited inline.
pub fn harness(version: &str, seeds: &[&str]) -> Harness {
    harness_with(
        version,
        seeds,
        Arc::new(MemoryCacheStorage::new()),
        Arc::new(FakeFetcher::new()),
        CacheWriteMode::Await,
    )
}

pub fn harness_with(
    version: &str,
    seeds: &[&str],
    caches: Arc<MemoryCacheStorage>,
    fetcher: Arc<FakeFetcher>,
    write_mode: CacheWriteMode,
) -> Harness {
    let clients = Arc::new(FakeClients::default());
    let notifier = Arc::new(FakeNotifier::default());
    let controller = Stowaway::builder()
        .version(version)
        .scope(SCOPE)
        .seed_urls(seeds.iter().copied())
        .cache_write_mode(write_mode)
        .cache_storage(caches.clone())
        .fetcher(fetcher.clone())
        .clients(clients.clone())
        .notifier(notifier.clone())
        .build()
        .expect("valid test configuration");
    Harness {
        controller,
        caches,
        fetcher,
        clients,
        notifier,
    }
}

/// Absolute URL under the test scope.
pub fn url(path: &str) -> String {
    Url::parse(SCOPE).unwrap().join(path).unwrap().to_string()
}
