//! Turn resolution.
//!
//! Orders from all players are interleaved into rounds by position: round
//! `i` holds the `i`-th order of every player that sent at least `i + 1`
//! orders. Each round is shuffled with the caller's RNG, then its orders are
//! applied one at a time against the live world. After the last round the turn counter is
//! advanced and influence and end-of-game are re-evaluated.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::board::{GameError, Order, OrderStatus, WorldState};
use crate::eval::{self, Outcome};

use super::effects;
use super::ledger::{Ledger, UnitHandle};

/// Orders of one resolved turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Orders whose acting unit was valid, in application order. Their
    /// status is `Ok` or the reason the effect failed.
    pub processed: Vec<Order>,
    /// Orders rejected before any effect was attempted
    /// (`InvalidUnit`, `UnitAlreadyActed`).
    pub discarded: Vec<Order>,
    /// Set when this turn ended the game.
    pub outcome: Option<Outcome>,
}

impl Resolution {
    /// All orders with their final status, processed first.
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.processed.iter().chain(self.discarded.iter())
    }
}

/// Reusable resolver that keeps its round buffers and ledger between turns.
#[derive(Debug, Default)]
pub struct Resolver {
    rounds: Vec<Vec<Order>>,
    ledger: Ledger,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves one turn. `orders[p]` is the batch of player `p`; batches
    /// beyond `state.num_players` are ignored.
    pub fn resolve<R: Rng + ?Sized>(
        &mut self,
        state: &mut WorldState,
        orders: Vec<Vec<Order>>,
        rng: &mut R,
    ) -> Result<Resolution, GameError> {
        if state.game_over {
            return Err(GameError::GameOver);
        }

        self.build_rounds(state.num_players, orders);
        self.ledger.reset(state);

        let mut resolution = Resolution::default();
        for round in self.rounds.iter_mut() {
            round.shuffle(rng);
            for mut order in round.drain(..) {
                match check_actor(state, &self.ledger, &order) {
                    Err(status) => {
                        order.status = status;
                        resolution.discarded.push(order);
                    }
                    Ok(handle) => {
                        self.ledger.mark_acted(handle);
                        order.status = effects::apply(state, &mut self.ledger, &order);
                        resolution.processed.push(order);
                    }
                }
            }
        }

        state.turn += 1;
        resolution.outcome = eval::evaluate(state);
        debug!(
            turn = state.turn,
            processed = resolution.processed.len(),
            discarded = resolution.discarded.len(),
            game_over = state.game_over,
            "turn resolved"
        );
        Ok(resolution)
    }

    /// Stamps each order with its player and regroups them by index.
    fn build_rounds(&mut self, num_players: usize, orders: Vec<Vec<Order>>) {
        let depth = orders
            .iter()
            .take(num_players)
            .map(Vec::len)
            .max()
            .unwrap_or(0);
        for round in self.rounds.iter_mut() {
            round.clear();
        }
        if self.rounds.len() < depth {
            self.rounds.resize_with(depth, Vec::new);
        }
        for (player, batch) in orders.into_iter().take(num_players).enumerate() {
            for (i, mut order) in batch.into_iter().enumerate() {
                order.player = player;
                order.status = OrderStatus::Pending;
                self.rounds[i].push(order);
            }
        }
    }
}

/// Validates the acting unit and returns its handle for this turn.
fn check_actor(
    state: &WorldState,
    ledger: &Ledger,
    order: &Order,
) -> Result<UnitHandle, OrderStatus> {
    let owns_actor = state.entity_at(order.coords).is_some_and(|unit| {
        unit.kind == order.order_type.actor_kind() && unit.player == order.player
    });
    if !owns_actor {
        return Err(OrderStatus::InvalidUnit);
    }
    match ledger.handle_at(order.coords) {
        Some(handle) if !ledger.has_acted(handle) => Ok(handle),
        Some(_) => Err(OrderStatus::UnitAlreadyActed),
        None => Err(OrderStatus::InvalidUnit),
    }
}

impl WorldState {
    /// Resolves one turn of orders against this world.
    ///
    /// Every returned order ends in a terminal status. Fails only when the
    /// game is already over.
    pub fn process_orders<R: Rng + ?Sized>(
        &mut self,
        orders: Vec<Vec<Order>>,
        rng: &mut R,
    ) -> Result<Resolution, GameError> {
        Resolver::new().resolve(self, orders, rng)
    }
}
