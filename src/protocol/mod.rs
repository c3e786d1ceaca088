//! Text notation and wire types.
//!
//! `notation` parses and formats coordinates, directions and orders;
//! `messages` holds the serde types handed to the transport layer and the
//! persisted game document.

pub mod messages;
pub mod notation;

pub use messages::{
    PersistedGame, Registration, SessionStatus, SessionTicket, TurnNotification, TurnRecord,
};
pub use notation::{format_order, format_orders, parse_order, parse_orders, NotationError};
