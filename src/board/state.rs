//! World state representation.
//!
//! Holds the authoritative snapshot of a game: every hex of the grid, the
//! resource total of each player, the turn counter, and the end-of-game
//! flags. The resolver and the evaluator are the only code that mutates it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::coords::Coords;
use super::hex::{Entity, EntityKind, Hex, Terrain};
use super::map::{is_valid_player_count, slot_owner, MapData};
use crate::eval;

/// Flowers placed on every field when a game starts.
pub const INIT_FIELD_FLOWERS: u32 = 60;
pub const INIT_HIVE_HP: i32 = 12;
pub const INIT_BEE_HP: i32 = 2;
pub const INIT_WALL_HP: i32 = 6;

pub const BEE_COST: u32 = 12;
pub const HIVE_COST: u32 = 24;
pub const WALL_COST: u32 = 6;

/// Errors raised by world construction and order processing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("unsupported number of players: {0}")]
    InvalidPlayerCount(usize),

    #[error("spawn at {0} is not on a walkable hex")]
    InvalidSpawn(Coords),

    #[error("cannot process orders in a finished game")]
    GameOver,
}

/// The initial hit points of a freshly created entity.
pub const fn initial_hp(kind: EntityKind) -> i32 {
    match kind {
        EntityKind::Wall => INIT_WALL_HP,
        EntityKind::Hive => INIT_HIVE_HP,
        EntityKind::Bee => INIT_BEE_HP,
    }
}

/// Complete game state at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldState {
    pub num_players: usize,
    pub turn: u32,
    pub hexes: HashMap<Coords, Hex>,
    pub player_resources: Vec<u32>,
    pub last_influence_change: u32,
    /// Winning players in ascending order; empty on a stalemate.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub winners: Vec<usize>,
    pub game_over: bool,
}

impl WorldState {
    /// Builds the starting state for a map and player count.
    ///
    /// Spawns whose slot is unused for this player count are skipped. The
    /// returned state has influence and end-of-game flags already evaluated.
    pub fn new(map: &MapData, num_players: usize) -> Result<Self, GameError> {
        if !is_valid_player_count(num_players) {
            return Err(GameError::InvalidPlayerCount(num_players));
        }

        let mut hexes: HashMap<Coords, Hex> = map
            .terrain
            .iter()
            .filter(|(_, terrain)| **terrain != Terrain::Invalid)
            .map(|(coords, terrain)| (*coords, Hex::new(*terrain)))
            .collect();

        for spawn in &map.spawns {
            let Some(player) = slot_owner(num_players, spawn.slot) else {
                continue;
            };
            let hex = hexes
                .get_mut(&spawn.coords)
                .filter(|h| h.terrain.is_walkable())
                .ok_or(GameError::InvalidSpawn(spawn.coords))?;
            hex.entity = Some(Entity::new(spawn.kind, initial_hp(spawn.kind), player));
        }

        for hex in hexes.values_mut() {
            if hex.terrain == Terrain::Field {
                hex.resources = INIT_FIELD_FLOWERS;
            }
        }

        let mut state = WorldState {
            num_players,
            turn: 0,
            hexes,
            player_resources: vec![0; num_players],
            last_influence_change: 0,
            winners: Vec::new(),
            game_over: false,
        };
        eval::evaluate(&mut state);
        Ok(state)
    }

    /// Returns the hex at `coords`, if it is on the map.
    pub fn hex(&self, coords: Coords) -> Option<&Hex> {
        self.hexes.get(&coords)
    }

    /// Returns the entity at `coords`, or `None` when empty or off the map.
    pub fn entity_at(&self, coords: Coords) -> Option<&Entity> {
        self.hexes.get(&coords).and_then(|h| h.entity.as_ref())
    }

    /// Returns the terrain at `coords`, or `Terrain::Invalid` off the map.
    pub fn terrain_at(&self, coords: Coords) -> Terrain {
        self.hexes
            .get(&coords)
            .map_or(Terrain::Invalid, |h| h.terrain)
    }

    /// Returns true if a unit could step onto `coords` right now.
    pub fn is_free(&self, coords: Coords) -> bool {
        self.hexes.get(&coords).is_some_and(Hex::is_free)
    }

    /// Iterates over every entity on the board with its position.
    pub fn entities(&self) -> impl Iterator<Item = (Coords, &Entity)> + '_ {
        self.hexes
            .iter()
            .filter_map(|(c, h)| h.entity.as_ref().map(|e| (*c, e)))
    }

    /// Iterates over every hive on the board.
    pub fn hives(&self) -> impl Iterator<Item = (Coords, &Entity)> + '_ {
        self.entities().filter(|(_, e)| e.kind == EntityKind::Hive)
    }

    /// Iterates over the hives owned by `player`.
    pub fn hives_of(&self, player: usize) -> impl Iterator<Item = (Coords, &Entity)> + '_ {
        self.hives().filter(move |(_, e)| e.player == player)
    }

    /// Iterates over every entity owned by `player`.
    pub fn units_of(&self, player: usize) -> impl Iterator<Item = (Coords, &Entity)> + '_ {
        self.entities().filter(move |(_, e)| e.player == player)
    }

    /// The resource total of `player`, or 0 for an unknown player.
    pub fn resources_of(&self, player: usize) -> u32 {
        self.player_resources.get(player).copied().unwrap_or(0)
    }

    /// The number of hexes on the map.
    pub fn hex_count(&self) -> usize {
        self.hexes.len()
    }

    /// Returns the first coordinate holding an entity on non-walkable
    /// terrain, or `None` if the grid is consistent.
    pub fn misplaced_entity(&self) -> Option<Coords> {
        self.hexes
            .iter()
            .find(|(_, h)| h.entity.is_some() && !h.terrain.is_walkable())
            .map(|(c, _)| *c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_map() -> MapData {
        let mut map = MapData::new();
        for col in 0..8 {
            map.set_terrain(Coords::new(0, col * 2), Terrain::Empty);
        }
        map.set_terrain(Coords::new(0, 4), Terrain::Field);
        map.set_terrain(Coords::new(0, 6), Terrain::Rock);
        map.add_spawn(0, EntityKind::Hive, Coords::new(0, 0));
        map.add_spawn(0, EntityKind::Bee, Coords::new(0, 2));
        map.add_spawn(3, EntityKind::Hive, Coords::new(0, 14));
        map.add_spawn(3, EntityKind::Bee, Coords::new(0, 12));
        map
    }

    #[test]
    fn construction_places_spawns_and_seeds_fields() {
        let state = WorldState::new(&strip_map(), 2).unwrap();
        assert_eq!(state.turn, 0);
        assert_eq!(state.player_resources, vec![0, 0]);
        assert_eq!(
            state.entity_at(Coords::new(0, 0)),
            Some(&Entity::new(EntityKind::Hive, INIT_HIVE_HP, 0))
        );
        assert_eq!(
            state.entity_at(Coords::new(0, 12)),
            Some(&Entity::new(EntityKind::Bee, INIT_BEE_HP, 1))
        );
        assert_eq!(state.hex(Coords::new(0, 4)).unwrap().resources, INIT_FIELD_FLOWERS);
        assert_eq!(state.hex(Coords::new(0, 2)).unwrap().resources, 0);
    }

    #[test]
    fn construction_evaluates_influence() {
        let state = WorldState::new(&strip_map(), 2).unwrap();
        assert_eq!(state.hex(Coords::new(0, 2)).unwrap().influence, Some(0));
        assert_eq!(state.hex(Coords::new(0, 12)).unwrap().influence, Some(1));
        assert!(!state.game_over);
    }

    #[test]
    fn unused_slots_are_skipped() {
        // A single player only uses slot 0, so slot 3 stays empty and the
        // lone hive wins immediately.
        let state = WorldState::new(&strip_map(), 1).unwrap();
        assert!(state.entity_at(Coords::new(0, 14)).is_none());
        assert!(state.game_over);
        assert_eq!(state.winners, vec![0]);
    }

    #[test]
    fn rejects_unsupported_player_counts() {
        assert_eq!(
            WorldState::new(&strip_map(), 0),
            Err(GameError::InvalidPlayerCount(0))
        );
        assert_eq!(
            WorldState::new(&strip_map(), 7),
            Err(GameError::InvalidPlayerCount(7))
        );
    }

    #[test]
    fn rejects_spawn_on_rock() {
        let mut map = strip_map();
        map.add_spawn(0, EntityKind::Bee, Coords::new(0, 6));
        assert_eq!(
            WorldState::new(&map, 2),
            Err(GameError::InvalidSpawn(Coords::new(0, 6)))
        );
    }

    #[test]
    fn lookups_outside_the_map() {
        let state = WorldState::new(&strip_map(), 2).unwrap();
        let outside = Coords::new(5, 5);
        assert_eq!(state.terrain_at(outside), Terrain::Invalid);
        assert!(state.entity_at(outside).is_none());
        assert!(!state.is_free(outside));
        assert_eq!(state.resources_of(9), 0);
    }

    #[test]
    fn enumerates_hives_per_player() {
        let state = WorldState::new(&strip_map(), 2).unwrap();
        assert_eq!(state.hives().count(), 2);
        assert_eq!(state.hives_of(1).next().map(|(c, _)| c), Some(Coords::new(0, 14)));
        assert_eq!(state.units_of(0).count(), 2);
        assert!(state.misplaced_entity().is_none());
    }

    #[test]
    fn state_json_roundtrip() {
        let state = WorldState::new(&strip_map(), 2).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"numPlayers\":2"));
        assert!(json.contains("\"0,0\""));
        let back: WorldState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
