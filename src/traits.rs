//! Host capability traits.
//!
//! The controller never talks to a browser, a network stack or a
//! notification daemon directly. Each capability it needs is a trait, so
//! production code plugs in real backends ([`MemoryCacheStorage`](crate::cache::MemoryCacheStorage),
//! [`ReqwestFetcher`](crate::fetch::ReqwestFetcher)) and tests plug in fakes.
//!
//! # Failure semantics
//!
//! - [`Fetcher::fetch`] returns `Err` only when no response was obtained
//!   (offline, DNS failure, connection reset). A server answering 404 or
//!   500 is `Ok` with that status.
//! - [`CacheStorage`] implementations must be safe for concurrent use; the
//!   controller adds no locking of its own.

use async_trait::async_trait;
use url::Url;

use crate::types::{ClientInfo, ClientMessage, NotificationOptions, Request, Response};
use crate::{Result, StowawayError};

/// Named, versioned buckets of request/response pairs.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Names of all existing generations, in creation order.
    async fn keys(&self) -> Result<Vec<String>>;

    /// Open a generation, creating it if missing.
    async fn open(&self, generation: &str) -> Result<()>;

    /// Delete a generation and everything in it. Returns whether it existed.
    async fn delete(&self, generation: &str) -> Result<bool>;

    /// Store (or overwrite) the response for `request`, creating the
    /// generation if needed.
    async fn put(&self, generation: &str, request: &Request, response: Response) -> Result<()>;

    /// Look up the response stored for `request` in one generation.
    async fn match_request(&self, generation: &str, request: &Request)
    -> Result<Option<Response>>;

    /// Whether a generation exists.
    async fn has(&self, generation: &str) -> Result<bool> {
        Ok(self.keys().await?.iter().any(|name| name == generation))
    }

    /// Store several entries.
    ///
    /// Default implementation calls `put` sequentially.
    async fn put_all(&self, generation: &str, entries: Vec<(Request, Response)>) -> Result<()> {
        for (request, response) in entries {
            self.put(generation, &request, response).await?;
        }
        Ok(())
    }
}

/// Network access.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response>;
}

/// Connected application instances.
#[async_trait]
pub trait Clients: Send + Sync {
    /// All clients currently controlled by the worker.
    async fn match_all(&self) -> Result<Vec<ClientInfo>>;

    /// Post a message to one client. No acknowledgement is expected.
    async fn post_message(&self, client: &ClientInfo, message: &ClientMessage) -> Result<()>;

    /// Bring an existing client window to the foreground.
    async fn focus(&self, client: &ClientInfo) -> Result<()>;

    /// Open a new window at `url`.
    async fn open_window(&self, url: &Url) -> Result<()>;
}

/// System notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Display a notification, returning an identifier for later [`close`](Self::close).
    async fn show_notification(&self, title: &str, options: &NotificationOptions)
    -> Result<String>;

    async fn close(&self, id: &str) -> Result<()>;
}

/// Stand-in for hosts without windows or a notification surface.
///
/// Reports no connected clients; opening windows and showing
/// notifications fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

#[async_trait]
impl Clients for Detached {
    async fn match_all(&self) -> Result<Vec<ClientInfo>> {
        Ok(Vec::new())
    }

    async fn post_message(&self, client: &ClientInfo, _message: &ClientMessage) -> Result<()> {
        Err(StowawayError::Client(format!("no such client: {}", client.id)))
    }

    async fn focus(&self, client: &ClientInfo) -> Result<()> {
        Err(StowawayError::Client(format!("no such client: {}", client.id)))
    }

    async fn open_window(&self, _url: &Url) -> Result<()> {
        Err(StowawayError::Client("host has no windows".to_string()))
    }
}

#[async_trait]
impl Notifier for Detached {
    async fn show_notification(
        &self,
        _title: &str,
        _options: &NotificationOptions,
    ) -> Result<String> {
        Err(StowawayError::Notification(
            "host has no notification surface".to_string(),
        ))
    }

    async fn close(&self, _id: &str) -> Result<()> {
        Ok(())
    }
}
