//! Grid coordinates, facing, and the ordered edge tables used to find a
//! block's neighbors.
//!
//! A block of footprint size `s` placed at a position `p` covers the cells
//! `p + (dx, dy)` for `dx, dy` in `[-floor((s-1)/2), floor(s/2)]`. Its
//! neighbors are the ring of cells just outside that square, excluding the
//! corners, ordered counter-clockwise starting from due east. Each edge cell
//! is paired with the cell inside the footprint that touches it.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::fixed::Fixed64;

/// World units per grid cell.
pub const TILE_SIZE: i32 = 8;

/// Largest footprint the edge table is built for.
pub const MAX_BLOCK_SIZE: u8 = 16;

/// A cell on the grid, or an offset between cells. y grows northward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell at `self` shifted by `offset`.
    pub fn offset(self, offset: GridPosition) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y)
    }

    /// Manhattan distance to another position.
    pub fn manhattan_distance(&self, other: &GridPosition) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }
}

/// Facing of a tile, in quarter turns counter-clockwise from east.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    East,
    North,
    West,
    South,
}

impl Rotation {
    pub fn all() -> [Rotation; 4] {
        [Rotation::East, Rotation::North, Rotation::West, Rotation::South]
    }

    /// Build from a quarter-turn index; wraps modulo 4.
    pub fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Rotation::East,
            1 => Rotation::North,
            2 => Rotation::West,
            _ => Rotation::South,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Rotation::East => 0,
            Rotation::North => 1,
            Rotation::West => 2,
            Rotation::South => 3,
        }
    }

    /// Unit step in this direction.
    pub fn step(self) -> GridPosition {
        match self {
            Rotation::East => GridPosition::new(1, 0),
            Rotation::North => GridPosition::new(0, 1),
            Rotation::West => GridPosition::new(-1, 0),
            Rotation::South => GridPosition::new(0, -1),
        }
    }

    pub fn opposite(self) -> Self {
        Rotation::from_index(self.index() + 2)
    }
}

/// Lowest footprint offset (inclusive) on each axis: `-floor((s-1)/2)`.
pub fn footprint_low(size: u8) -> i32 {
    -((size.max(1) as i32 - 1) / 2)
}

/// Highest footprint offset (inclusive) on each axis: `floor(s/2)`.
pub fn footprint_high(size: u8) -> i32 {
    size.max(1) as i32 / 2
}

/// Every cell covered by a block of `size` placed at `position`.
pub fn footprint_cells(position: GridPosition, size: u8) -> impl Iterator<Item = GridPosition> {
    let lo = footprint_low(size);
    let hi = footprint_high(size);
    (lo..=hi).flat_map(move |dy| (lo..=hi).map(move |dx| GridPosition::new(position.x + dx, position.y + dy)))
}

/// First cell outside the footprint when stepping from `position` in `rotation`.
pub fn facing_cell(position: GridPosition, size: u8, rotation: Rotation) -> GridPosition {
    let step = rotation.step();
    let reach = match rotation {
        Rotation::East | Rotation::North => footprint_high(size) + 1,
        Rotation::West | Rotation::South => -footprint_low(size) + 1,
    };
    GridPosition::new(position.x + step.x * reach, position.y + step.y * reach)
}

/// World-space centre of a block of `size` placed at `position`.
///
/// Even sizes have no centre cell, so the centre sits half a cell towards
/// the north-east of `position`.
pub fn world_center(position: GridPosition, size: u8) -> (Fixed64, Fixed64) {
    let offset = if size % 2 == 0 { Fixed64::from_num(TILE_SIZE) / Fixed64::from_num(2) } else { Fixed64::ZERO };
    (
        Fixed64::from_num(position.x * TILE_SIZE) + offset,
        Fixed64::from_num(position.y * TILE_SIZE) + offset,
    )
}

// ---------------------------------------------------------------------------
// Edge table
// ---------------------------------------------------------------------------

/// Precomputed neighbor ring and matching inside cells for every footprint
/// size up to a maximum.
///
/// `edges(s)[i]` and `inside_edges(s)[i]` are paired index-for-index; the
/// ordering is the round-robin order used by item dumping.
#[derive(Debug, Clone)]
pub struct EdgeTable {
    edges: Vec<Vec<GridPosition>>,
    inside: Vec<Vec<GridPosition>>,
}

impl Default for EdgeTable {
    fn default() -> Self {
        Self::new(MAX_BLOCK_SIZE)
    }
}

impl EdgeTable {
    pub fn new(max_size: u8) -> Self {
        let mut edges = Vec::with_capacity(max_size as usize);
        let mut inside = Vec::with_capacity(max_size as usize);

        for size in 1..=max_size.max(1) {
            let ring = ring_for(size);
            let (lo, hi) = (footprint_low(size), footprint_high(size));
            let inner = ring
                .iter()
                .map(|p| GridPosition::new(p.x.clamp(lo, hi), p.y.clamp(lo, hi)))
                .collect();
            edges.push(ring);
            inside.push(inner);
        }

        Self { edges, inside }
    }

    /// Largest size this table covers.
    pub fn max_size(&self) -> u8 {
        self.edges.len() as u8
    }

    /// Ordered neighbor offsets for a footprint size. Sizes beyond the table
    /// fall back to the largest entry.
    pub fn edges(&self, size: u8) -> &[GridPosition] {
        &self.edges[self.index(size)]
    }

    /// Inside offsets, paired with [`EdgeTable::edges`].
    pub fn inside_edges(&self, size: u8) -> &[GridPosition] {
        &self.inside[self.index(size)]
    }

    /// Number of neighbor directions for a footprint size (`4 * size`).
    pub fn neighbor_count(&self, size: u8) -> usize {
        self.edges(size).len()
    }

    fn index(&self, size: u8) -> usize {
        (size.max(1) as usize - 1).min(self.edges.len() - 1)
    }
}

fn ring_for(size: u8) -> Vec<GridPosition> {
    let bot = footprint_low(size) - 1;
    let top = footprint_high(size) + 1;

    let mut ring = Vec::with_capacity(size as usize * 4);
    for j in 0..size as i32 {
        ring.push(GridPosition::new(bot + 1 + j, bot));
        ring.push(GridPosition::new(bot + 1 + j, top));
        ring.push(GridPosition::new(bot, bot + 1 + j));
        ring.push(GridPosition::new(top, bot + 1 + j));
    }
    ring.sort_by(|a, b| {
        angle(a)
            .partial_cmp(&angle(b))
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(b))
    });
    ring
}

/// Counter-clockwise angle from +x, in `[0, 2π)`.
fn angle(p: &GridPosition) -> f64 {
    let a = (p.y as f64).atan2(p.x as f64);
    if a < 0.0 { a + std::f64::consts::TAU } else { a }
}
