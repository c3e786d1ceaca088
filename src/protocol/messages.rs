//! Messages and documents exchanged with the transport layer.
//!
//! Field names are camelCase on the wire to match what existing clients and
//! history viewers read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::{Order, WorldState};

/// Pushed to observers once per turn transition and once at game end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnNotification {
    pub turn: u32,
    pub game_over: bool,
}

/// Returned when a session is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTicket {
    pub id: String,
    pub admin_token: String,
    pub player_tokens: Vec<String>,
}

/// Returned when a player joins a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub player_id: usize,
    pub token: String,
}

/// Summary of one session for status listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub id: String,
    pub created_date: DateTime<Utc>,
    pub map: String,
    pub num_players: usize,
    pub players: Vec<String>,
    pub game_over: bool,
}

/// One history entry: the orders applied in a turn and the state they led to.
/// The first entry of every history has no orders and holds the initial state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub orders: Vec<Order>,
    pub state: WorldState,
}

/// The document written once a game finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedGame {
    pub id: String,
    pub map: String,
    pub created_date: DateTime<Utc>,
    pub players: Vec<String>,
    pub history: Vec<TurnRecord>,
}
