//! Legal order generation for a single unit.

use crate::board::{
    Coords, Entity, EntityKind, Hex, Order, OrderType, PlayerView, Terrain, WorldState,
    ALL_DIRECTIONS, BEE_COST, HIVE_COST, WALL_COST,
};

/// Read access to a board, full or fogged. Cells the board does not show are
/// treated as unknown and never targeted.
pub trait Board {
    fn hex(&self, coords: Coords) -> Option<&Hex>;

    /// The units owned by `player`, sorted by position.
    fn own_units(&self, player: usize) -> Vec<(Coords, Entity)>;

    /// Resources `player` can spend.
    fn budget(&self, player: usize) -> u32;

    fn is_free(&self, coords: Coords) -> bool {
        self.hex(coords).is_some_and(Hex::is_free)
    }
}

impl Board for WorldState {
    fn hex(&self, coords: Coords) -> Option<&Hex> {
        self.hexes.get(&coords)
    }

    fn own_units(&self, player: usize) -> Vec<(Coords, Entity)> {
        let mut units: Vec<(Coords, Entity)> =
            self.units_of(player).map(|(c, e)| (c, *e)).collect();
        units.sort_unstable_by_key(|(c, _)| *c);
        units
    }

    fn budget(&self, player: usize) -> u32 {
        self.resources_of(player)
    }
}

impl Board for PlayerView {
    fn hex(&self, coords: Coords) -> Option<&Hex> {
        self.hexes.get(&coords)
    }

    fn own_units(&self, player: usize) -> Vec<(Coords, Entity)> {
        let mut units: Vec<(Coords, Entity)> = self
            .hexes
            .iter()
            .filter_map(|(c, h)| h.entity.filter(|e| e.player == player).map(|e| (*c, e)))
            .collect();
        units.sort_unstable_by_key(|(c, _)| *c);
        units
    }

    fn budget(&self, player: usize) -> u32 {
        if player == self.player {
            self.resources()
        } else {
            0
        }
    }
}

/// Every order the unit at `coords` could issue this turn with `budget`
/// resources that would not fail on the board as shown.
pub fn legal_orders<B: Board + ?Sized>(
    board: &B,
    coords: Coords,
    unit: &Entity,
    budget: u32,
) -> Vec<Order> {
    let mut orders = Vec::new();
    match unit.kind {
        EntityKind::Wall => {}
        EntityKind::Hive => {
            if budget >= BEE_COST {
                for dir in ALL_DIRECTIONS {
                    if board.is_free(coords.neighbour(dir)) {
                        orders.push(Order::new(OrderType::Spawn, coords, dir));
                    }
                }
            }
        }
        EntityKind::Bee => {
            for dir in ALL_DIRECTIONS {
                let target = coords.neighbour(dir);
                if board.is_free(target) {
                    orders.push(Order::new(OrderType::Move, coords, dir));
                    if budget >= WALL_COST {
                        orders.push(Order::new(OrderType::BuildWall, coords, dir));
                    }
                } else if board
                    .hex(target)
                    .and_then(|h| h.entity.as_ref())
                    .is_some_and(|e| e.player != unit.player)
                {
                    orders.push(Order::new(OrderType::Attack, coords, dir));
                }
            }
            if board
                .hex(coords)
                .is_some_and(|h| h.terrain == Terrain::Field && h.resources > 0)
            {
                orders.push(Order::in_place(OrderType::Forage, coords));
            }
            if budget >= HIVE_COST {
                orders.push(Order::in_place(OrderType::BuildHive, coords));
            }
        }
    }
    orders
}

/// The resources an order spends if it succeeds.
pub const fn order_cost(order_type: OrderType) -> u32 {
    match order_type {
        OrderType::BuildWall => WALL_COST,
        OrderType::BuildHive => HIVE_COST,
        OrderType::Spawn => BEE_COST,
        OrderType::Move | OrderType::Attack | OrderType::Forage => 0,
    }
}
