//! Worker lifecycle states and the events that drive them.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use bytes::Bytes;

use crate::types::{Request, Response};

/// Worker lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WorkerState {
    /// Constructed; no lifecycle event seen yet.
    Parsed = 0,
    /// Seed resources are being provisioned.
    Installing = 1,
    /// Provisioning finished; waiting for activation.
    Installed = 2,
    /// Stale generations are being swept.
    Activating = 3,
    /// Intercepting requests.
    Activated = 4,
    /// Installation failed; the host should discard this worker.
    Redundant = 5,
}

impl WorkerState {
    /// Only an activated worker controls requests.
    pub fn can_intercept_fetch(&self) -> bool {
        matches!(self, WorkerState::Activated)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerState::Parsed => "parsed",
            WorkerState::Installing => "installing",
            WorkerState::Installed => "installed",
            WorkerState::Activating => "activating",
            WorkerState::Activated => "activated",
            WorkerState::Redundant => "redundant",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => WorkerState::Installing,
            2 => WorkerState::Installed,
            3 => WorkerState::Activating,
            4 => WorkerState::Activated,
            5 => WorkerState::Redundant,
            _ => WorkerState::Parsed,
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lock-free holder for the current [`WorkerState`].
#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(WorkerState::Parsed as u8))
    }

    pub(crate) fn get(&self) -> WorkerState {
        WorkerState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn set(&self, state: WorkerState) {
        self.0.store(state as u8, Ordering::Release);
    }
}

/// A lifecycle signal dispatched by the host.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    Install,
    Activate,
    Fetch(Request),
    /// Background sync fired with `tag`.
    Sync { tag: String },
    /// Push message, with its payload if one was sent.
    Push { data: Option<Bytes> },
    NotificationClick {
        notification: String,
        action: Option<String>,
    },
}

impl WorkerEvent {
    /// Event name as the host reports it.
    pub fn name(&self) -> &'static str {
        match self {
            WorkerEvent::Install => "install",
            WorkerEvent::Activate => "activate",
            WorkerEvent::Fetch(_) => "fetch",
            WorkerEvent::Sync { .. } => "sync",
            WorkerEvent::Push { .. } => "push",
            WorkerEvent::NotificationClick { .. } => "notificationclick",
        }
    }
}

/// What the controller did with a fetch event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Not intercepted; the host performs the request itself.
    Passthrough,
    /// Answer the request with this response.
    Respond(Response),
}

impl FetchOutcome {
    /// The response, if the request was intercepted.
    pub fn response(&self) -> Option<&Response> {
        match self {
            FetchOutcome::Respond(response) => Some(response),
            FetchOutcome::Passthrough => None,
        }
    }

    pub fn into_response(self) -> Option<Response> {
        match self {
            FetchOutcome::Respond(response) => Some(response),
            FetchOutcome::Passthrough => None,
        }
    }
}

/// What the controller did after a notification click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Notification closed; no window action.
    Closed,
    /// An existing root window was focused.
    Focused,
    /// A new root window was opened.
    Opened,
}

/// Result of dispatching a [`WorkerEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Installed,
    Activated { deleted: usize },
    Fetch(FetchOutcome),
    Synced { notified: usize },
    Pushed { shown: bool },
    NotificationClicked(ClickOutcome),
}
