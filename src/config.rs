//! Controller configuration.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. Explicit path passed to [`WorkerConfig::load`]
//! 2. `~/.stowaway/config.toml` (user)
//! 3. `/etc/stowaway/config.toml` (system)
//!
//! Every field has a default, so an empty file (or [`WorkerConfig::default`])
//! yields a working configuration:
//!
//! ```toml
//! version = "github-chat-v1.0.1"
//! scope = "https://chat.example.com/"
//! seed_urls = ["/", "/index.html"]
//! api_hosts = ["api.github.com"]
//!
//! [notification]
//! action_title = "Open"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{Result, StowawayError};

const CHAT_ICON: &str = "data:image/svg+xml,<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 100 100\"><text y=\".9em\" font-size=\"90\">💬</text></svg>";
const VIEW_ICON: &str = "data:image/svg+xml,<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 100 100\"><text y=\".9em\" font-size=\"90\">👁️</text></svg>";

/// When a response copy is written to the cache relative to returning it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheWriteMode {
    /// Spawn the write and return immediately. Outstanding writes can be
    /// awaited with [`OfflineCacheController::flush`](crate::OfflineCacheController::flush).
    #[default]
    Background,
    /// Complete the write before the response is returned.
    Await,
}

/// Controller configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerConfig {
    /// Name of the current cache generation (default: `github-chat-v1.0.0`).
    #[serde(default = "default_version")]
    pub version: String,
    /// Application scope; relative URLs resolve against it (default: `http://localhost/`).
    #[serde(default = "default_scope")]
    pub scope: String,
    /// Resources cached at install time, in order.
    #[serde(default = "default_seed_urls")]
    pub seed_urls: Vec<String>,
    /// Hosts served network-first (default: `api.github.com`).
    #[serde(default = "default_api_hosts")]
    pub api_hosts: Vec<String>,
    /// Document served to navigations when offline (default: `/index.html`).
    #[serde(default = "default_offline_document")]
    pub offline_document: String,
    /// Background-sync tag that triggers the reconnect broadcast.
    #[serde(default = "default_sync_tag")]
    pub sync_tag: String,
    #[serde(default)]
    pub cache_write_mode: CacheWriteMode,
    /// Cap on entries per generation in the in-memory store (default: none).
    ///
    /// A capped generation may evict seed resources, including the offline
    /// document, once runtime traffic fills it.
    #[serde(default)]
    pub max_entries: Option<u64>,
    #[serde(default)]
    pub notification: NotificationConfig,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            scope: default_scope(),
            seed_urls: default_seed_urls(),
            api_hosts: default_api_hosts(),
            offline_document: default_offline_document(),
            sync_tag: default_sync_tag(),
            cache_write_mode: CacheWriteMode::default(),
            max_entries: None,
            notification: NotificationConfig::default(),
        }
    }
}

fn default_version() -> String {
    "github-chat-v1.0.0".to_string()
}

fn default_scope() -> String {
    "http://localhost/".to_string()
}

fn default_seed_urls() -> Vec<String> {
    vec![
        "/".to_string(),
        "/index.html".to_string(),
        "https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600;700&display=swap"
            .to_string(),
    ]
}

fn default_api_hosts() -> Vec<String> {
    vec!["api.github.com".to_string()]
}

fn default_offline_document() -> String {
    "/index.html".to_string()
}

fn default_sync_tag() -> String {
    "github-chat-sync".to_string()
}

/// Appearance of notifications raised from push messages.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_chat_icon")]
    pub icon: String,
    #[serde(default = "default_chat_icon")]
    pub badge: String,
    /// Vibration pattern in milliseconds (default: `[200, 100, 200]`).
    #[serde(default = "default_vibrate")]
    pub vibrate: Vec<u32>,
    /// Identifier of the single action button (default: `view`).
    #[serde(default = "default_action")]
    pub action: String,
    #[serde(default = "default_action_title")]
    pub action_title: String,
    #[serde(default = "default_action_icon")]
    pub action_icon: Option<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            icon: default_chat_icon(),
            badge: default_chat_icon(),
            vibrate: default_vibrate(),
            action: default_action(),
            action_title: default_action_title(),
            action_icon: default_action_icon(),
        }
    }
}

fn default_chat_icon() -> String {
    CHAT_ICON.to_string()
}

fn default_vibrate() -> Vec<u32> {
    vec![200, 100, 200]
}

fn default_action() -> String {
    "view".to_string()
}

fn default_action_title() -> String {
    "View Chat".to_string()
}

fn default_action_icon() -> Option<String> {
    Some(VIEW_ICON.to_string())
}

impl WorkerConfig {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.stowaway/config.toml`
    /// 3. `/etc/stowaway/config.toml`
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_config_path(explicit_path)?;
        let content = fs::read_to_string(&path).map_err(|e| {
            StowawayError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            StowawayError::Configuration(msg) => {
                StowawayError::Configuration(format!("{msg} (in {path:?})"))
            }
            other => other,
        })
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| StowawayError::Configuration(format!("Failed to parse config: {e}")))
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(path.to_path_buf());
            }
            return Err(StowawayError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".stowaway").join("config.toml");
            if user_config.exists() {
                return Ok(user_config);
            }
        }

        let system_config = PathBuf::from("/etc/stowaway/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }

        Err(StowawayError::Configuration(
            "No config file found. Create ~/.stowaway/config.toml or /etc/stowaway/config.toml"
                .to_string(),
        ))
    }
}
