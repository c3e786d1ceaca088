//! Per-turn unit identity.
//!
//! Entities are plain values with no identity of their own, but a turn must
//! know whether "this unit" already acted even after it moved. The ledger
//! hands every unit a handle for the duration of one turn and keeps the
//! coordinate-to-handle map in step with every grid mutation the resolver
//! makes.

use std::collections::{HashMap, HashSet};

use crate::board::{Coords, WorldState};

/// Identifies one live unit for the duration of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitHandle(u32);

/// Tracks unit handles by position and which of them already acted.
#[derive(Debug, Default)]
pub struct Ledger {
    positions: HashMap<Coords, UnitHandle>,
    acted: HashSet<UnitHandle>,
    next: u32,
}

impl Ledger {
    /// Assigns a handle to every entity currently on the board.
    pub fn from_state(state: &WorldState) -> Self {
        let mut ledger = Ledger::default();
        ledger.reset(state);
        ledger
    }

    /// Clears all bookkeeping and re-registers the entities of `state`.
    pub fn reset(&mut self, state: &WorldState) {
        self.positions.clear();
        self.acted.clear();
        self.next = 0;
        let mut occupied: Vec<Coords> = state.entities().map(|(c, _)| c).collect();
        occupied.sort_unstable();
        for coords in occupied {
            self.register(coords);
        }
    }

    /// Registers a newly created unit at `coords`, replacing any handle there.
    pub fn register(&mut self, coords: Coords) -> UnitHandle {
        let handle = UnitHandle(self.next);
        self.next += 1;
        self.positions.insert(coords, handle);
        handle
    }

    /// The handle of the unit standing at `coords`.
    pub fn handle_at(&self, coords: Coords) -> Option<UnitHandle> {
        self.positions.get(&coords).copied()
    }

    /// Carries the handle at `from` over to `to`.
    pub fn relocate(&mut self, from: Coords, to: Coords) {
        if let Some(handle) = self.positions.remove(&from) {
            self.positions.insert(to, handle);
        }
    }

    /// Forgets the unit at `coords`.
    pub fn remove(&mut self, coords: Coords) {
        self.positions.remove(&coords);
    }

    /// Records that `handle` acted. Returns false if it had already acted.
    pub fn mark_acted(&mut self, handle: UnitHandle) -> bool {
        self.acted.insert(handle)
    }

    pub fn has_acted(&self, handle: UnitHandle) -> bool {
        self.acted.contains(&handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_follows_relocation() {
        let mut ledger = Ledger::default();
        let a = Coords::new(0, 0);
        let b = Coords::new(0, 2);
        let handle = ledger.register(a);
        assert!(ledger.mark_acted(handle));

        ledger.relocate(a, b);
        assert_eq!(ledger.handle_at(a), None);
        assert_eq!(ledger.handle_at(b), Some(handle));
        assert!(!ledger.mark_acted(handle));
    }

    #[test]
    fn replacement_gets_a_fresh_handle() {
        let mut ledger = Ledger::default();
        let c = Coords::new(1, 1);
        let bee = ledger.register(c);
        ledger.mark_acted(bee);

        let hive = ledger.register(c);
        assert_ne!(bee, hive);
        assert!(!ledger.has_acted(hive));
    }

    #[test]
    fn removed_units_have_no_handle() {
        let mut ledger = Ledger::default();
        let c = Coords::new(2, 0);
        ledger.register(c);
        ledger.remove(c);
        assert_eq!(ledger.handle_at(c), None);
    }
}
