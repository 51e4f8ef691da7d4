//! Notification relay: reconnect broadcasts, push notifications and
//! notification clicks.

use tracing::{debug, info, warn};

use super::controller::OfflineCacheController;
use super::state::ClickOutcome;
use crate::Result;
use crate::types::{ClientMessage, NotificationOptions, PushPayload};

impl OfflineCacheController {
    /// Handle a background-sync event.
    ///
    /// For the configured tag, posts `SYNC_AVAILABLE` to every connected
    /// client and returns how many were reached. Other tags are ignored.
    /// Delivery is fire-and-forget: a client that cannot be reached is
    /// logged and skipped.
    pub async fn handle_sync(&self, tag: &str) -> Result<usize> {
        if tag != self.settings.sync_tag {
            debug!(tag, "ignoring sync event");
            return Ok(0);
        }

        let clients = self.clients.match_all().await?;
        let message = ClientMessage::sync_available();
        let mut notified = 0;
        for client in &clients {
            match self.clients.post_message(client, &message).await {
                Ok(()) => notified += 1,
                Err(e) => warn!(client = %client.id, error = %e, "failed to post sync message"),
            }
        }
        info!(notified, "connection restored, clients notified");
        Ok(notified)
    }

    /// Handle a push message. Returns whether a notification was shown.
    ///
    /// Missing or malformed payloads are ignored.
    pub async fn handle_push(&self, data: Option<&[u8]>) -> Result<bool> {
        let Some(data) = data else {
            debug!("push without payload");
            return Ok(false);
        };
        let Some(payload) = PushPayload::parse(data) else {
            debug!(len = data.len(), "ignoring malformed push payload");
            return Ok(false);
        };

        let options = NotificationOptions::from_push(&payload, &self.settings.notification);
        self.notifier
            .show_notification(&payload.title, &options)
            .await?;
        Ok(true)
    }

    /// Handle a click on a notification.
    ///
    /// The notification is always closed first; a failed close is logged
    /// and does not stop the action. For the configured action the
    /// application root is focused if a client already shows it, otherwise
    /// opened in a new window.
    pub async fn handle_notification_click(
        &self,
        notification: &str,
        action: Option<&str>,
    ) -> Result<ClickOutcome> {
        if let Err(e) = self.notifier.close(notification).await {
            warn!(notification, error = %e, "failed to close notification");
        }

        if action != Some(self.settings.notification.action.as_str()) {
            return Ok(ClickOutcome::Closed);
        }

        let root = &self.settings.root;
        let clients = self.clients.match_all().await?;
        if let Some(client) = clients.iter().find(|c| &c.url == root) {
            self.clients.focus(client).await?;
            return Ok(ClickOutcome::Focused);
        }

        self.clients.open_window(root).await?;
        Ok(ClickOutcome::Opened)
    }
}
