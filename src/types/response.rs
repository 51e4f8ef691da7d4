//! Response snapshots served to the host and stored in cache generations.

use bytes::Bytes;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Body message of the synthesized offline response.
pub const OFFLINE_MESSAGE: &str = "No internet connection and no cached data available";

/// Provenance of a response, mirroring the fetch standard's response types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Same-origin response with no cross-origin restrictions.
    #[default]
    Basic,
    Cors,
    Opaque,
    Error,
}

/// An immutable response snapshot.
///
/// The body is reference-counted [`Bytes`]: cloning a response yields a
/// second, independently readable copy without duplicating the payload,
/// so one copy can go to the cache while the other is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
    pub response_type: ResponseType,
}

impl Response {
    /// Create a basic response with the canonical reason phrase for `status`.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        let status_text = StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default()
            .to_string();
        Self {
            status,
            status_text,
            headers: Vec::new(),
            body: body.into(),
            response_type: ResponseType::Basic,
        }
    }

    /// Create a `200 OK` basic response.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::new(200, body)
    }

    /// The `503 Service Unavailable` JSON response served for API requests
    /// when neither the network nor the cache can answer.
    pub fn offline() -> Self {
        let payload = OfflinePayload {
            error: "offline".to_string(),
            message: OFFLINE_MESSAGE.to_string(),
        };
        // Serializing two string fields cannot fail.
        let body = serde_json::to_vec(&payload).unwrap_or_default();
        Self::new(503, body).with_header("Content-Type", "application/json")
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    pub fn with_status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = text.into();
        self
    }

    /// Case-insensitive header lookup (first match).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the status is in the 2xx range.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as UTF-8 text, lossily.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> crate::Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// JSON body of [`Response::offline`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfflinePayload {
    pub error: String,
    pub message: String,
}
