//! Per-player projection of the world state.
//!
//! A view keeps only the hexes within sight of the player's own units and
//! exposes only that player's own resource total.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::coords::Coords;
use super::hex::Hex;
use super::state::WorldState;

/// Sight radius of every unit, in hex steps.
pub const FIELD_OF_VIEW: u32 = 4;

/// What one player is allowed to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub player: usize,
    pub num_players: usize,
    pub turn: u32,
    pub hexes: HashMap<Coords, Hex>,
    /// Single-element list holding the viewer's own total.
    pub player_resources: Vec<u32>,
    pub last_influence_change: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub winners: Vec<usize>,
    pub game_over: bool,
}

impl PlayerView {
    /// The viewer's own resource total.
    pub fn resources(&self) -> u32 {
        self.player_resources.first().copied().unwrap_or(0)
    }

    /// Returns true if `coords` is visible in this view.
    pub fn sees(&self, coords: Coords) -> bool {
        self.hexes.contains_key(&coords)
    }
}

impl WorldState {
    /// Returns true if any unit owned by `player` is within sight of `coords`.
    pub fn is_visible_by(&self, coords: Coords, player: usize) -> bool {
        self.units_of(player)
            .any(|(c, _)| c.distance(coords) <= FIELD_OF_VIEW)
    }

    /// Computes the view of `player`. Walls count as sight sources.
    pub fn player_view(&self, player: usize) -> PlayerView {
        let eyes: Vec<Coords> = self.units_of(player).map(|(c, _)| c).collect();
        let hexes = self
            .hexes
            .iter()
            .filter(|(coords, _)| eyes.iter().any(|e| e.distance(**coords) <= FIELD_OF_VIEW))
            .map(|(c, h)| (*c, h.clone()))
            .collect();

        PlayerView {
            player,
            num_players: self.num_players,
            turn: self.turn,
            hexes,
            player_resources: vec![self.resources_of(player)],
            last_influence_change: self.last_influence_change,
            winners: self.winners.clone(),
            game_over: self.game_over,
        }
    }
}
