//! Map data consumed by world construction.
//!
//! A map is a terrain layout plus a list of spawn points. Each spawn point
//! names one of six slots; the number of players in a game decides which
//! slots are used and which player each used slot belongs to.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::coords::Coords;
use super::hex::{EntityKind, Terrain};

/// The number of spawn slots a map can define.
pub const SPAWN_SLOT_COUNT: usize = 6;

/// The largest supported player count.
pub const MAX_PLAYERS: usize = 6;

/// Slot-to-player assignment indexed by player count. `None` marks a slot
/// that stays empty for that player count.
const PLAYER_SLOTS: [[Option<usize>; SPAWN_SLOT_COUNT]; MAX_PLAYERS + 1] = [
    [None, None, None, None, None, None],
    [Some(0), None, None, None, None, None],
    [Some(0), None, None, Some(1), None, None],
    [Some(0), None, Some(1), None, Some(2), None],
    [None, Some(0), Some(1), None, Some(2), Some(3)],
    [Some(0), Some(1), Some(2), Some(3), Some(4), None],
    [Some(0), Some(1), Some(2), Some(3), Some(4), Some(5)],
];

/// Returns true if a game can be played with this many players.
pub const fn is_valid_player_count(players: usize) -> bool {
    players >= 1 && players <= MAX_PLAYERS
}

/// Returns the player that owns `slot` in a game of `players`, if any.
pub fn slot_owner(players: usize, slot: usize) -> Option<usize> {
    PLAYER_SLOTS
        .get(players)
        .and_then(|row| row.get(slot))
        .copied()
        .flatten()
}

/// A starting unit placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawn {
    pub kind: EntityKind,
    pub coords: Coords,
    pub slot: usize,
}

/// Terrain layout and spawn points of a map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapData {
    pub terrain: HashMap<Coords, Terrain>,
    pub spawns: Vec<Spawn>,
}

impl MapData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the terrain of a cell, adding it to the map.
    pub fn set_terrain(&mut self, coords: Coords, terrain: Terrain) -> &mut Self {
        self.terrain.insert(coords, terrain);
        self
    }

    /// Adds a spawn point for `slot`.
    pub fn add_spawn(&mut self, slot: usize, kind: EntityKind, coords: Coords) -> &mut Self {
        self.spawns.push(Spawn { kind, coords, slot });
        self
    }

    /// The number of cells on the map.
    pub fn len(&self) -> usize {
        self.terrain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terrain.is_empty()
    }
}
