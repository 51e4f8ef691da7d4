//! Public types for the Stowaway API.

mod message;
mod notification;
mod request;
mod response;

pub use message::{ClientInfo, ClientMessage, SYNC_MESSAGE};
pub use notification::{NotificationAction, NotificationOptions, PushPayload};
pub use request::{Request, RequestKey, RequestMode};
pub use response::{OFFLINE_MESSAGE, OfflinePayload, Response, ResponseType};
