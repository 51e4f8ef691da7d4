//! Controller implementation

mod builder;
mod controller;
mod intercept;
mod pending;
mod relay;
mod state;
pub mod strategy;

pub use builder::{Stowaway, StowawayBuilder};
pub use controller::OfflineCacheController;
pub use state::{ClickOutcome, EventOutcome, FetchOutcome, WorkerEvent, WorkerState};
pub use strategy::Strategy;
