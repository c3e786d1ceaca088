//! Order generation.
//!
//! Produces legal orders for a player's units. Used by the self-play runner
//! and by the bots of the arena binary.

pub mod legal;

use rand::Rng;

use crate::board::{Order, OrderType};

pub use legal::{legal_orders, order_cost, Board};

/// Picks one random legal order for each of the player's units.
///
/// Bees standing on flowers forage half of the time. The running budget is
/// reduced by every order that spends resources, so the batch never plans
/// more than the player can afford.
pub fn random_orders<B, R>(board: &B, player: usize, rng: &mut R) -> Vec<Order>
where
    B: Board + ?Sized,
    R: Rng + ?Sized,
{
    let mut budget = board.budget(player);
    let mut orders = Vec::new();

    for (coords, unit) in board.own_units(player) {
        let legal = legal_orders(board, coords, &unit, budget);
        if legal.is_empty() {
            continue;
        }
        let forage = legal.iter().find(|o| o.order_type == OrderType::Forage);
        let order = match forage {
            Some(order) if rng.gen_bool(0.5) => *order,
            _ => legal[rng.gen_range(0..legal.len())],
        };
        budget -= order_cost(order.order_type);
        orders.push(order);
    }

    orders
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::WorldState;
    use crate::mapgen::{generate_map, MapGenConfig};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn one_order_per_able_unit() {
        let map = generate_map(&MapGenConfig::default(), 3);
        let state = WorldState::new(&map, 2).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        // Without resources the hive has nothing to do, the bee always can move.
        let orders = random_orders(&state, 0, &mut rng);
        assert_eq!(orders.len(), 1);
        assert_ne!(orders[0].order_type, OrderType::Spawn);
    }

    #[test]
    fn spending_stays_within_budget() {
        let map = generate_map(&MapGenConfig::default(), 3);
        let mut state = WorldState::new(&map, 2).unwrap();
        state.player_resources[1] = 30;
        for seed in 0..50 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let orders = random_orders(&state, 1, &mut rng);
            let spent: u32 = orders.iter().map(|o| order_cost(o.order_type)).sum();
            assert!(spent <= 30);
        }
    }

    #[test]
    fn random_orders_from_a_view_resolve_cleanly() {
        let map = generate_map(&MapGenConfig::default(), 5);
        let mut state = WorldState::new(&map, 3).unwrap();
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..20 {
            if state.game_over {
                break;
            }
            let batches: Vec<Vec<Order>> = (0..3)
                .map(|p| random_orders(&state.player_view(p), p, &mut rng))
                .collect();
            let submitted: usize = batches.iter().map(Vec::len).sum();
            let res = state.process_orders(batches, &mut rng).unwrap();
            assert_eq!(res.orders().count(), submitted);
            assert!(res.orders().all(|o| o.status.is_terminal()));
            assert!(state.misplaced_entity().is_none());
        }
    }
}
