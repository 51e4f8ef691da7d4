//! Stowaway - offline cache controller for web-worker lifecycles
//!
//! This crate provides an [`OfflineCacheController`] that reacts to the
//! lifecycle events a worker host dispatches: it warms a versioned cache
//! generation on install, sweeps stale generations on activate, serves
//! requests network-first (API hosts) or cache-first (everything else), and
//! relays reconnect and push signals to connected clients. Every host
//! capability sits behind a trait in [`traits`], so the same controller
//! runs against real backends or in-memory fakes.
//!
//! # Example
//!
//! ```rust,no_run
//! use stowaway::{FetchOutcome, Request, Stowaway};
//!
//! #[tokio::main]
//! async fn main() -> stowaway::Result<()> {
//!     let controller = Stowaway::builder()
//!         .version("github-chat-v1.0.1")
//!         .scope("https://chat.example.com/")
//!         .seed_urls(["/", "/index.html"])
//!         .build()?;
//!
//!     controller.install().await?;
//!     controller.activate().await?;
//!
//!     let request = Request::get("https://api.github.com/repos/o/r/issues")?;
//!     if let FetchOutcome::Respond(response) = controller.handle_fetch(&request).await? {
//!         println!("{} {}", response.status, response.text());
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod telemetry;
pub mod traits;
pub mod types;
pub mod worker;

// Re-export main types at crate root
pub use cache::MemoryCacheStorage;
pub use config::{CacheWriteMode, NotificationConfig, WorkerConfig};
pub use error::{Result, StowawayError};
pub use fetch::ReqwestFetcher;
pub use traits::{CacheStorage, Clients, Detached, Fetcher, Notifier};
pub use worker::{
    ClickOutcome, EventOutcome, FetchOutcome, OfflineCacheController, Stowaway, StowawayBuilder,
    Strategy, WorkerEvent, WorkerState,
};

// Re-export all types
pub use types::{
    ClientInfo, ClientMessage, NotificationAction, NotificationOptions, OfflinePayload,
    PushPayload, Request, RequestKey, RequestMode, Response, ResponseType,
};
