//! Session turn scheduling.
//!
//! A [`Session`] runs one match: it collects order batches from registered
//! players under a deadline and drives the resolver turn by turn. The
//! [`SessionManager`] is the registry the transport layer talks to.

pub mod config;
pub mod error;
pub mod history;
pub mod manager;
#[allow(clippy::module_inception)]
pub mod session;

pub use config::{
    SessionConfig, FINISHED_SESSION_RETENTION, GAME_START_TIMEOUT, MIN_TURN_DURATION, TURN_TIMEOUT,
};
pub use error::SessionError;
pub use history::{persist, HistoryError};
pub use manager::{generate_tokens, SessionManager};
pub use session::{Phase, Player, Session};
