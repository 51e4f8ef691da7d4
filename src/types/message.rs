//! Messages posted to connected application instances

use serde::{Deserialize, Serialize};
use url::Url;

/// Text carried by [`ClientMessage::SyncAvailable`].
pub const SYNC_MESSAGE: &str = "Connection restored - refreshing data";

/// A connected application instance (window or tab) controlled by the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub id: String,
    pub url: Url,
}

impl ClientInfo {
    pub fn new(id: impl Into<String>, url: Url) -> Self {
        Self { id: id.into(), url }
    }
}

/// Message posted to clients. Serializes with a `type` discriminator,
/// e.g. `{"type":"SYNC_AVAILABLE","message":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    /// Connectivity is back; clients should refresh their data.
    SyncAvailable { message: String },
}

impl ClientMessage {
    pub fn sync_available() -> Self {
        ClientMessage::SyncAvailable {
            message: SYNC_MESSAGE.to_string(),
        }
    }
}
