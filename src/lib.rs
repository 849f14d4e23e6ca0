#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod model;
pub mod monitor;
pub mod outbound;
pub mod reply;
pub mod roster;
pub mod router;
pub mod session;
pub mod telegram;

pub use model::{ChatId, DriverRecord, Lang, Roster, SessionState};
pub use roster::RosterHandle;
pub use session::SessionStore;
