//! Hex coordinates and directions.
//!
//! Cells are addressed in doubled-width coordinates: a cell's column has the
//! same parity as its row, and horizontal neighbours are two columns apart.
//! The six directions and the distance metric below are consistent with each
//! other: every neighbour offset has distance 1.

use std::fmt;

/// The number of neighbour directions around a hex.
pub const DIRECTION_COUNT: usize = 6;

/// A direction from a hex to one of its six neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Direction {
    E = 0,
    SE = 1,
    SW = 2,
    W = 3,
    NW = 4,
    NE = 5,
}

/// All directions in index order.
pub const ALL_DIRECTIONS: [Direction; DIRECTION_COUNT] = [
    Direction::E,
    Direction::SE,
    Direction::SW,
    Direction::W,
    Direction::NW,
    Direction::NE,
];

/// Row/column offsets indexed by `Direction as usize`.
const OFFSETS: [(i32, i32); DIRECTION_COUNT] = [
    (0, 2),   // E
    (1, 1),   // SE
    (1, -1),  // SW
    (0, -2),  // W
    (-1, -1), // NW
    (-1, 1),  // NE
];

impl Direction {
    /// Returns the (row, col) offset for this direction.
    pub const fn offset(self) -> (i32, i32) {
        OFFSETS[self as usize]
    }

    /// Returns the opposite direction.
    pub const fn opposite(self) -> Direction {
        ALL_DIRECTIONS[(self as usize + 3) % DIRECTION_COUNT]
    }

    /// Returns the notation label (`E`, `SE`, ...).
    pub const fn label(self) -> &'static str {
        match self {
            Direction::E => "E",
            Direction::SE => "SE",
            Direction::SW => "SW",
            Direction::W => "W",
            Direction::NW => "NW",
            Direction::NE => "NE",
        }
    }

    /// Parses a direction from its notation label.
    pub fn from_label(s: &str) -> Option<Direction> {
        ALL_DIRECTIONS.iter().copied().find(|d| d.label() == s)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A hex cell address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Coords {
    pub row: i32,
    pub col: i32,
}

impl Coords {
    pub const fn new(row: i32, col: i32) -> Self {
        Coords { row, col }
    }

    /// Returns the neighbouring cell in the given direction.
    pub const fn neighbour(self, direction: Direction) -> Coords {
        let (dr, dc) = direction.offset();
        Coords {
            row: self.row + dr,
            col: self.col + dc,
        }
    }

    /// Iterates over all six neighbours in direction order.
    pub fn neighbours(self) -> impl Iterator<Item = Coords> {
        ALL_DIRECTIONS.into_iter().map(move |d| self.neighbour(d))
    }

    /// Hex distance in steps between two cells.
    pub fn distance(self, other: Coords) -> u32 {
        let dr = self.row.abs_diff(other.row);
        let dc = other.col.abs_diff(self.col);
        dr + dc.saturating_sub(dr) / 2
    }

    /// Returns true if the column parity matches the row parity.
    pub const fn is_aligned(self) -> bool {
        (self.row - self.col) % 2 == 0
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_neighbour_is_one_step_away() {
        let origin = Coords::new(4, 6);
        for n in origin.neighbours() {
            assert_eq!(origin.distance(n), 1, "neighbour {} should be adjacent", n);
            assert!(n.is_aligned());
        }
    }

    #[test]
    fn opposite_directions_cancel() {
        let origin = Coords::new(-3, 5);
        for d in ALL_DIRECTIONS {
            assert_eq!(origin.neighbour(d).neighbour(d.opposite()), origin);
        }
    }

    #[test]
    fn distance_along_a_row() {
        assert_eq!(Coords::new(0, 0).distance(Coords::new(0, 8)), 4);
        assert_eq!(Coords::new(0, 8).distance(Coords::new(0, 0)), 4);
    }

    #[test]
    fn distance_along_a_diagonal() {
        // Three steps SE.
        assert_eq!(Coords::new(0, 0).distance(Coords::new(3, 3)), 3);
        // Two steps SE and one step E.
        assert_eq!(Coords::new(0, 0).distance(Coords::new(2, 4)), 3);
        // Straight down in doubled coords zig-zags SE/SW.
        assert_eq!(Coords::new(0, 0).distance(Coords::new(4, 0)), 4);
    }

    #[test]
    fn distance_matches_breadth_first_steps() {
        use std::collections::{HashMap, VecDeque};

        let origin = Coords::new(0, 0);
        let mut steps: HashMap<Coords, u32> = HashMap::new();
        let mut queue = VecDeque::from([origin]);
        steps.insert(origin, 0);
        while let Some(c) = queue.pop_front() {
            let d = steps[&c];
            if d == 5 {
                continue;
            }
            for n in c.neighbours() {
                if !steps.contains_key(&n) {
                    steps.insert(n, d + 1);
                    queue.push_back(n);
                }
            }
        }
        for (c, d) in steps {
            assert_eq!(origin.distance(c), d, "mismatch at {}", c);
        }
    }

    #[test]
    fn direction_labels_roundtrip() {
        for d in ALL_DIRECTIONS {
            assert_eq!(Direction::from_label(d.label()), Some(d));
        }
        assert_eq!(Direction::from_label("N"), None);
    }
}
