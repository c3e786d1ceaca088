//! Influence and win evaluation.
//!
//! Runs once per turn after orders are applied (and once when a world is
//! built): recomputes territorial control, then checks the end-of-game
//! conditions.

pub mod endgame;
pub mod influence;

pub use endgame::{check_end_game, detect_outcome, Outcome, INFLUENCE_TIMEOUT};
pub use influence::{influence_at, influence_counts, update_influence, HIVE_FIELD_OF_VIEW};

use crate::board::WorldState;

/// Recomputes influence and end-of-game flags for the current turn.
pub fn evaluate(state: &mut WorldState) -> Option<Outcome> {
    update_influence(state);
    check_end_game(state)
}
