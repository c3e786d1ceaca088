//! Board representation and game-state types.
//!
//! Contains the hex coordinate system, terrain and entities, orders, map
//! data, the authoritative world state, and per-player views.

pub mod coords;
pub mod hex;
pub mod map;
pub mod order;
pub mod state;
pub mod view;

pub use coords::{Coords, Direction, ALL_DIRECTIONS, DIRECTION_COUNT};
pub use hex::{Entity, EntityKind, Hex, Terrain};
pub use map::{is_valid_player_count, slot_owner, MapData, Spawn, MAX_PLAYERS, SPAWN_SLOT_COUNT};
pub use order::{Order, OrderStatus, OrderType, ALL_ORDER_TYPES};
pub use state::{
    initial_hp, GameError, WorldState, BEE_COST, HIVE_COST, INIT_BEE_HP, INIT_FIELD_FLOWERS,
    INIT_HIVE_HP, INIT_WALL_HP, WALL_COST,
};
pub use view::{PlayerView, FIELD_OF_VIEW};
