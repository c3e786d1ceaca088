//! Terrain, entities, and the per-cell hex record.

use serde::{Deserialize, Serialize};

/// Terrain of a hex cell.
///
/// `Invalid` is the sentinel returned for coordinates outside the map and is
/// never stored in a live grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Terrain {
    Invalid,
    Empty,
    Rock,
    Field,
}

impl Terrain {
    /// Returns true if units may stand on this terrain.
    pub const fn is_walkable(self) -> bool {
        matches!(self, Terrain::Empty | Terrain::Field)
    }
}

/// The kind of unit occupying a hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Wall,
    Hive,
    Bee,
}

/// A unit on the board: a wall, a hive, or a bee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub hp: i32,
    pub player: usize,
}

impl Entity {
    pub const fn new(kind: EntityKind, hp: i32, player: usize) -> Self {
        Entity { kind, hp, player }
    }
}

/// One cell of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hex {
    pub terrain: Terrain,
    /// Flowers left to forage; only meaningful on `Field` terrain.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub resources: u32,
    /// The controlling player, if any.
    pub influence: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<Entity>,
}

fn is_zero(v: &u32) -> bool {
    *v == 0
}

impl Hex {
    /// Creates an unoccupied, uninfluenced hex with no resources.
    pub const fn new(terrain: Terrain) -> Self {
        Hex {
            terrain,
            resources: 0,
            influence: None,
            entity: None,
        }
    }

    /// Returns true if a unit could step onto this hex right now.
    pub fn is_free(&self) -> bool {
        self.terrain.is_walkable() && self.entity.is_none()
    }
}
