//! Stowaway error types

use crate::worker::WorkerState;

/// Stowaway error types
#[derive(Debug, thiserror::Error)]
pub enum StowawayError {
    // Network errors
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP error ({status}) fetching {url}")]
    Http { status: u16, url: String },

    // Lifecycle errors
    /// A seed resource could not be fetched; nothing was stored.
    #[error("provisioning failed for {url}: {reason}")]
    Provisioning { url: String, reason: String },

    /// A lifecycle event arrived in a state that cannot accept it.
    #[error("cannot {event} while {state}")]
    Lifecycle {
        event: &'static str,
        state: WorkerState,
    },

    #[error("cache error: {0}")]
    Cache(String),

    /// Neither the network nor the cache produced a response.
    #[error("no response available for {0}")]
    NoResponse(String),

    // Host capability errors
    #[error("client messaging error: {0}")]
    Client(String),

    #[error("notification error: {0}")]
    Notification(String),

    // Data errors
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for StowawayError {
    fn from(err: reqwest::Error) -> Self {
        match (err.status(), err.url()) {
            (Some(status), Some(url)) => StowawayError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            },
            _ => StowawayError::Network(err.to_string()),
        }
    }
}

impl StowawayError {
    /// Whether this error means the network could not be reached at all,
    /// as opposed to a server answering with a failure status.
    pub fn is_offline(&self) -> bool {
        matches!(self, StowawayError::Network(_))
    }
}

/// Result type alias for Stowaway operations
pub type Result<T> = std::result::Result<T, StowawayError>;
