//! End-of-game detection.
//!
//! Conditions are checked in a fixed priority order:
//! 1. Stalemate: influence has not changed for more than `INFLUENCE_TIMEOUT`
//!    turns. The game ends with no winner.
//! 2. Elimination: exactly one player still owns a hive. That player wins.
//! 3. Majority: the largest influenced-hex count exceeds half the map. Every
//!    player tied at that count wins.

use crate::board::{EntityKind, WorldState};

use super::influence::influence_counts;

/// Turns without any influence change before the game is called off.
pub const INFLUENCE_TIMEOUT: u32 = 50;

/// How a game ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Stalemate,
    LastHiveStanding(usize),
    Majority(Vec<usize>),
}

impl Outcome {
    /// The winners this outcome declares, in ascending player order.
    pub fn winners(&self) -> Vec<usize> {
        match self {
            Outcome::Stalemate => Vec::new(),
            Outcome::LastHiveStanding(player) => vec![*player],
            Outcome::Majority(players) => players.clone(),
        }
    }
}

/// Evaluates the end-of-game conditions without mutating the state.
pub fn detect_outcome(state: &WorldState) -> Option<Outcome> {
    if state.turn.saturating_sub(state.last_influence_change) > INFLUENCE_TIMEOUT {
        return Some(Outcome::Stalemate);
    }

    let mut hive_counts = vec![0usize; state.num_players];
    for (_, entity) in state.entities() {
        if entity.kind == EntityKind::Hive {
            if let Some(count) = hive_counts.get_mut(entity.player) {
                *count += 1;
            }
        }
    }
    let mut with_hives = hive_counts
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(player, _)| player);
    if let (Some(player), None) = (with_hives.next(), with_hives.next()) {
        return Some(Outcome::LastHiveStanding(player));
    }

    let counts = influence_counts(state);
    let max = counts.iter().copied().max().unwrap_or(0);
    if max <= state.hex_count() / 2 {
        return None;
    }
    let leaders = counts
        .iter()
        .enumerate()
        .filter(|(_, count)| **count == max)
        .map(|(player, _)| player)
        .collect();
    Some(Outcome::Majority(leaders))
}

/// Sets `game_over` and `winners` if the game has ended.
pub fn check_end_game(state: &mut WorldState) -> Option<Outcome> {
    let outcome = detect_outcome(state)?;
    state.winners = outcome.winners();
    state.game_over = true;
    Some(outcome)
}
