//! Procedural map generation.
//!
//! Builds a hexagonal board centred on `0,0`. Terrain is drawn from a seeded
//! RNG and copied to all six rotations of each cell, so every spawn slot sees
//! the same surroundings. Slot `i` sits one step inside the corner in
//! direction `i`, with a bee on the next cell towards the centre.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::{Coords, EntityKind, MapData, Terrain, ALL_DIRECTIONS, SPAWN_SLOT_COUNT};

/// Smallest radius that fits six separated spawn slots.
pub const MIN_RADIUS: u32 = 3;
/// Largest radius generated; bigger requests are clamped.
pub const MAX_RADIUS: u32 = 64;

/// Configuration for map generation.
#[derive(Clone, Debug, PartialEq)]
pub struct MapGenConfig {
    /// Steps from the centre to the board edge, clamped to
    /// `MIN_RADIUS..=MAX_RADIUS`.
    pub radius: u32,
    /// Fraction of cells that become rock (0.0-1.0)
    pub rock_ratio: f32,
    /// Fraction of cells that become flower fields (0.0-1.0)
    pub field_ratio: f32,
}

impl Default for MapGenConfig {
    fn default() -> Self {
        Self {
            radius: 8,
            rock_ratio: 0.12,
            field_ratio: 0.08,
        }
    }
}

/// Rotates a cell by 60 degrees clockwise around `0,0`.
fn rotate(c: Coords) -> Coords {
    // doubled -> cube: x = (col - row) / 2, z = row, y = -x - z
    let x = (c.col - c.row) / 2;
    let z = c.row;
    let y = -x - z;
    // (x, y, z) -> (-z, -x, -y)
    let (nx, nz) = (-z, -y);
    Coords::new(nz, 2 * nx + nz)
}

/// The six rotations of `c`, starting with `c` itself.
fn orbit(c: Coords) -> [Coords; 6] {
    let mut out = [c; 6];
    for i in 1..6 {
        out[i] = rotate(out[i - 1]);
    }
    out
}

/// Generates a map with the given configuration and seed.
pub fn generate_map(config: &MapGenConfig, seed: u64) -> MapData {
    let mut rng = SmallRng::seed_from_u64(seed);
    let radius = config.radius.clamp(MIN_RADIUS, MAX_RADIUS) as i32;
    let origin = Coords::default();

    let mut cells: Vec<Coords> = Vec::new();
    for row in -radius..=radius {
        for col in (-2 * radius..=2 * radius).filter(|c| (c - row) % 2 == 0) {
            let c = Coords::new(row, col);
            if c.distance(origin) <= radius as u32 {
                cells.push(c);
            }
        }
    }

    let mut map = MapData::new();
    for &cell in &cells {
        if map.terrain.contains_key(&cell) {
            continue;
        }
        let roll: f32 = rng.gen();
        let terrain = if roll < config.rock_ratio {
            Terrain::Rock
        } else if roll < config.rock_ratio + config.field_ratio {
            Terrain::Field
        } else {
            Terrain::Empty
        };
        for rotated in orbit(cell) {
            map.set_terrain(rotated, terrain);
        }
    }

    for (slot, dir) in ALL_DIRECTIONS.into_iter().enumerate().take(SPAWN_SLOT_COUNT) {
        let (dr, dc) = dir.offset();
        let hive = Coords::new(dr * (radius - 1), dc * (radius - 1));
        let bee = Coords::new(dr * (radius - 2), dc * (radius - 2));
        for cell in [hive, bee] {
            map.set_terrain(cell, Terrain::Empty);
            for n in cell.neighbours() {
                if map.terrain.contains_key(&n) {
                    map.set_terrain(n, Terrain::Empty);
                }
            }
        }
        map.add_spawn(slot, EntityKind::Hive, hive)
            .add_spawn(slot, EntityKind::Bee, bee);
    }
    map
}
