//! Push payloads and system notification options

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::NotificationConfig;

/// Decoded push message.
///
/// Requires string `title` and `body`; every other field is kept in
/// [`raw`](Self::raw) and echoed into the notification's `data`.
#[derive(Debug, Clone, PartialEq)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    pub raw: Value,
}

#[derive(Deserialize)]
struct PushFields {
    title: String,
    body: String,
}

impl PushPayload {
    /// Parse a push message body. Returns `None` for anything that is not a
    /// JSON object carrying string `title` and `body` fields.
    pub fn parse(data: &[u8]) -> Option<Self> {
        let raw: Value = serde_json::from_slice(data).ok()?;
        if !raw.is_object() {
            return None;
        }
        let fields: PushFields = serde_json::from_value(raw.clone()).ok()?;
        Some(Self {
            title: fields.title,
            body: fields.body,
            raw,
        })
    }
}

/// An actionable button on a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Display options handed to the host notification capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationOptions {
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    pub data: Value,
    pub actions: Vec<NotificationAction>,
}

impl NotificationOptions {
    /// Build the options for a push payload using the configured icons,
    /// vibration pattern and action button.
    pub fn from_push(payload: &PushPayload, config: &NotificationConfig) -> Self {
        Self {
            body: payload.body.clone(),
            icon: config.icon.clone(),
            badge: config.badge.clone(),
            vibrate: config.vibrate.clone(),
            data: payload.raw.clone(),
            actions: vec![NotificationAction {
                action: config.action.clone(),
                title: config.action_title.clone(),
                icon: config.action_icon.clone(),
            }],
        }
    }
}
