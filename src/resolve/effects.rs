//! Order effects.
//!
//! Each function applies one order type to the world, assuming the acting
//! unit has already been validated, and returns the resulting status. Every
//! grid mutation is mirrored into the turn's [`Ledger`].

use crate::board::{
    initial_hp, Entity, EntityKind, Order, OrderStatus, OrderType, Terrain, WorldState, BEE_COST,
    HIVE_COST, WALL_COST,
};

use super::ledger::Ledger;

/// Dispatches `order` to its effect.
pub fn apply(state: &mut WorldState, ledger: &mut Ledger, order: &Order) -> OrderStatus {
    match order.order_type {
        OrderType::Move => apply_move(state, ledger, order),
        OrderType::Attack => apply_attack(state, ledger, order),
        OrderType::BuildWall => apply_build(state, ledger, order, EntityKind::Wall, WALL_COST),
        OrderType::Spawn => apply_build(state, ledger, order, EntityKind::Bee, BEE_COST),
        OrderType::BuildHive => apply_build_hive(state, ledger, order),
        OrderType::Forage => apply_forage(state, order),
    }
}

/// Deducts `cost` from the player's resources if they can afford it.
fn pay(state: &mut WorldState, player: usize, cost: u32) -> bool {
    match state.player_resources.get_mut(player) {
        Some(balance) if *balance >= cost => {
            *balance -= cost;
            true
        }
        _ => false,
    }
}

fn apply_move(state: &mut WorldState, ledger: &mut Ledger, order: &Order) -> OrderStatus {
    let target = order.target();
    if !state.is_free(target) {
        return OrderStatus::Blocked;
    }
    let Some(unit) = state
        .hexes
        .get_mut(&order.coords)
        .and_then(|h| h.entity.take())
    else {
        return OrderStatus::InvalidUnit;
    };
    if let Some(hex) = state.hexes.get_mut(&target) {
        hex.entity = Some(unit);
    }
    ledger.relocate(order.coords, target);
    OrderStatus::Ok
}

fn apply_attack(state: &mut WorldState, ledger: &mut Ledger, order: &Order) -> OrderStatus {
    let target = order.target();
    let Some(hex) = state.hexes.get_mut(&target) else {
        return OrderStatus::InvalidTarget;
    };
    let Some(victim) = hex.entity.as_mut() else {
        return OrderStatus::InvalidTarget;
    };
    victim.hp -= 1;
    if victim.hp <= 0 {
        hex.entity = None;
        ledger.remove(target);
    }
    OrderStatus::Ok
}

/// Places a new `kind` entity on the order's target cell (BUILD_WALL, SPAWN).
fn apply_build(
    state: &mut WorldState,
    ledger: &mut Ledger,
    order: &Order,
    kind: EntityKind,
    cost: u32,
) -> OrderStatus {
    let target = order.target();
    if !state.is_free(target) {
        return OrderStatus::Blocked;
    }
    if !pay(state, order.player, cost) {
        return OrderStatus::NotEnoughResources;
    }
    if let Some(hex) = state.hexes.get_mut(&target) {
        hex.entity = Some(Entity::new(kind, initial_hp(kind), order.player));
    }
    ledger.register(target);
    OrderStatus::Ok
}

/// Turns the acting bee into a hive on its own cell.
fn apply_build_hive(state: &mut WorldState, ledger: &mut Ledger, order: &Order) -> OrderStatus {
    if !pay(state, order.player, HIVE_COST) {
        return OrderStatus::NotEnoughResources;
    }
    if let Some(hex) = state.hexes.get_mut(&order.coords) {
        hex.entity = Some(Entity::new(
            EntityKind::Hive,
            initial_hp(EntityKind::Hive),
            order.player,
        ));
    }
    ledger.register(order.coords);
    OrderStatus::Ok
}

fn apply_forage(state: &mut WorldState, order: &Order) -> OrderStatus {
    let Some(hex) = state.hexes.get_mut(&order.coords) else {
        return OrderStatus::CannotForage;
    };
    if hex.terrain != Terrain::Field || hex.resources == 0 {
        return OrderStatus::CannotForage;
    }
    hex.resources -= 1;
    if let Some(balance) = state.player_resources.get_mut(order.player) {
        *balance += 1;
    }
    OrderStatus::Ok
}
