//! Order types.
//!
//! An order is one player's intent for one unit in one turn. Directional
//! orders address the neighbour of the acting cell in `direction`; FORAGE and
//! BUILD_HIVE act on the acting cell itself and ignore the direction.

use serde::{Deserialize, Serialize};

use super::coords::{Coords, Direction};
use super::hex::EntityKind;

/// What an order asks the acting unit to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Move,
    Attack,
    BuildWall,
    BuildHive,
    Forage,
    Spawn,
}

/// All order types in declaration order.
pub const ALL_ORDER_TYPES: [OrderType; 6] = [
    OrderType::Move,
    OrderType::Attack,
    OrderType::BuildWall,
    OrderType::BuildHive,
    OrderType::Forage,
    OrderType::Spawn,
];

impl OrderType {
    /// The unit kind that must be standing on the order's cell.
    pub const fn actor_kind(self) -> EntityKind {
        match self {
            OrderType::Spawn => EntityKind::Hive,
            _ => EntityKind::Bee,
        }
    }

    /// Returns the notation label (`MOVE`, `BUILD_WALL`, ...).
    pub const fn label(self) -> &'static str {
        match self {
            OrderType::Move => "MOVE",
            OrderType::Attack => "ATTACK",
            OrderType::BuildWall => "BUILD_WALL",
            OrderType::BuildHive => "BUILD_HIVE",
            OrderType::Forage => "FORAGE",
            OrderType::Spawn => "SPAWN",
        }
    }

    /// Parses an order type from its notation label.
    pub fn from_label(s: &str) -> Option<OrderType> {
        ALL_ORDER_TYPES.iter().copied().find(|t| t.label() == s)
    }
}

/// The outcome of an order. Every order starts `Pending` and ends in exactly
/// one of the other states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Ok,
    InvalidUnit,
    Blocked,
    InvalidTarget,
    CannotForage,
    NotEnoughResources,
    UnitAlreadyActed,
}

impl OrderStatus {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

/// A single order.
///
/// `player` and `status` are filled in by the resolver; clients only need to
/// send `type`, `coords` and `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub coords: Coords,
    #[serde(default = "default_direction")]
    pub direction: Direction,
    #[serde(default)]
    pub player: usize,
    #[serde(default)]
    pub status: OrderStatus,
}

fn default_direction() -> Direction {
    Direction::E
}

impl Order {
    /// Creates a pending order. The player is stamped at resolution time.
    pub const fn new(order_type: OrderType, coords: Coords, direction: Direction) -> Self {
        Order {
            order_type,
            coords,
            direction,
            player: 0,
            status: OrderStatus::Pending,
        }
    }

    /// Creates an order that has no meaningful direction (FORAGE, BUILD_HIVE).
    pub const fn in_place(order_type: OrderType, coords: Coords) -> Self {
        Order::new(order_type, coords, Direction::E)
    }

    /// The cell a directional order addresses.
    pub const fn target(&self) -> Coords {
        self.coords.neighbour(self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_is_issued_by_hives() {
        assert_eq!(OrderType::Spawn.actor_kind(), EntityKind::Hive);
        for t in ALL_ORDER_TYPES.into_iter().filter(|t| *t != OrderType::Spawn) {
            assert_eq!(t.actor_kind(), EntityKind::Bee);
        }
    }

    #[test]
    fn target_follows_direction() {
        let order = Order::new(OrderType::Move, Coords::new(2, 2), Direction::NE);
        assert_eq!(order.target(), Coords::new(1, 3));
    }

    #[test]
    fn new_orders_are_pending() {
        let order = Order::in_place(OrderType::Forage, Coords::new(0, 0));
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(!order.status.is_terminal());
        assert!(OrderStatus::UnitAlreadyActed.is_terminal());
    }

    #[test]
    fn client_order_json_defaults() {
        let order: Order =
            serde_json::from_str(r#"{"type":"SPAWN","coords":"3,5","direction":"SW"}"#).unwrap();
        assert_eq!(order.order_type, OrderType::Spawn);
        assert_eq!(order.coords, Coords::new(3, 5));
        assert_eq!(order.direction, Direction::SW);
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn order_type_labels_roundtrip() {
        for t in ALL_ORDER_TYPES {
            assert_eq!(OrderType::from_label(t.label()), Some(t));
        }
        assert_eq!(OrderType::from_label("HOLD"), None);
    }
}
