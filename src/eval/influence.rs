//! Territorial influence.
//!
//! Every hex belongs to the player whose hive is strictly nearest, counting
//! only hives within `HIVE_FIELD_OF_VIEW`. Equal distances between different
//! players, or no hive in range, leave the hex uncontrolled.
//!
//! The per-hex nearest-hive search is independent across hexes, so it runs
//! as a rayon parallel pass over a snapshot of hive positions; the results
//! are applied serially so the change stamp stays deterministic.

use rayon::prelude::*;

use crate::board::{Coords, WorldState};

/// Influence radius of a hive, in hex steps.
pub const HIVE_FIELD_OF_VIEW: u32 = 4;

/// Computes the controlling player of `coords` given hive positions.
pub fn influence_at(coords: Coords, hives: &[(Coords, usize)]) -> Option<usize> {
    let mut best = u32::MAX;
    let mut owner: Option<usize> = None;
    let mut contested = false;

    for &(hive, player) in hives {
        let dist = coords.distance(hive);
        if dist > HIVE_FIELD_OF_VIEW {
            continue;
        }
        if dist < best {
            best = dist;
            owner = Some(player);
            contested = false;
        } else if dist == best && owner != Some(player) {
            contested = true;
        }
    }

    if contested {
        None
    } else {
        owner
    }
}

/// Recomputes the influence of every hex. Returns the number of hexes whose
/// owner changed; any change stamps `last_influence_change` with the turn.
pub fn update_influence(state: &mut WorldState) -> usize {
    let hives: Vec<(Coords, usize)> = state.hives().map(|(c, e)| (c, e.player)).collect();

    let computed: Vec<(Coords, Option<usize>)> = state
        .hexes
        .par_iter()
        .map(|(coords, _)| (*coords, influence_at(*coords, &hives)))
        .collect();

    let mut changed = 0;
    for (coords, influence) in computed {
        if let Some(hex) = state.hexes.get_mut(&coords) {
            if hex.influence != influence {
                hex.influence = influence;
                changed += 1;
            }
        }
    }

    if changed > 0 {
        state.last_influence_change = state.turn;
    }
    changed
}

/// Counts influenced hexes per player.
pub fn influence_counts(state: &WorldState) -> Vec<usize> {
    let mut counts = vec![0; state.num_players];
    for hex in state.hexes.values() {
        if let Some(slot) = hex.influence.and_then(|p| counts.get_mut(p)) {
            *slot += 1;
        }
    }
    counts
}
