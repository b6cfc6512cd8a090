//! Tile storage for a bounded grid.
//!
//! Every in-bounds cell is either open ground ([`Cell::Air`]) or part of a
//! placed building ([`Cell::Building`]). A building spanning several cells
//! is stored once, as its master [`Tile`]; every covered cell resolves to
//! that master's [`TileId`].

use slotmap::SlotMap;

use crate::block::Block;
use crate::content::Content;
use crate::entity::TileEntity;
use crate::fixed::Fixed64;
use crate::geometry::{self, GridPosition, Rotation};
use crate::id::{BlockId, TeamId, TileId};

/// A placed building: its descriptor, ownership, facing, and runtime state.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub block: BlockId,
    /// Placement cell; the centre of odd footprints.
    pub position: GridPosition,
    pub team: TeamId,
    pub rotation: Rotation,
    pub entity: TileEntity,
    size: u8,
}

impl Tile {
    pub fn new(block_id: BlockId, block: &Block, position: GridPosition, team: TeamId, rotation: Rotation) -> Self {
        Self {
            block: block_id,
            position,
            team,
            rotation,
            entity: TileEntity::new(block.health),
            size: block.size,
        }
    }

    /// Footprint edge length, copied from the descriptor at placement.
    pub fn size(&self) -> u8 {
        self.size
    }

    /// The cell directly in front of this tile.
    pub fn facing_cell(&self) -> GridPosition {
        geometry::facing_cell(self.position, self.size, self.rotation)
    }

    /// World-space centre.
    pub fn world_center(&self) -> (Fixed64, Fixed64) {
        geometry::world_center(self.position, self.size)
    }

    /// Every cell this tile covers.
    pub fn cells(&self) -> impl Iterator<Item = GridPosition> {
        geometry::footprint_cells(self.position, self.size)
    }
}

/// What occupies an in-bounds cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Open ground: passable, holds nothing.
    Air,
    /// Any cell of a placed building, resolved to its master.
    Building(TileId),
}

/// Errors from grid placement.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("cell {0:?} is out of bounds")]
    OutOfBounds(GridPosition),
    #[error("cell {0:?} is occupied")]
    Occupied(GridPosition),
    #[error("unknown block {0:?}")]
    UnknownBlock(BlockId),
    #[error("tile is not placed")]
    NotPlaced,
}

/// A bounded grid of cells and the buildings placed on it.
#[derive(Debug, Clone)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Option<TileId>>,
    tiles: SlotMap<TileId, Tile>,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
            tiles: SlotMap::with_key(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn in_bounds(&self, pos: GridPosition) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    fn index(&self, pos: GridPosition) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }

    // -- Placement --

    /// Place a building of `block` with its placement cell at `position`.
    pub fn place(
        &mut self,
        content: &Content,
        block: BlockId,
        position: GridPosition,
        team: TeamId,
        rotation: Rotation,
    ) -> Result<TileId, GridError> {
        let def = content.block(block).ok_or(GridError::UnknownBlock(block))?;

        for cell in geometry::footprint_cells(position, def.size) {
            match self.index(cell) {
                None => return Err(GridError::OutOfBounds(cell)),
                Some(idx) if self.cells[idx].is_some() => return Err(GridError::Occupied(cell)),
                Some(_) => {}
            }
        }

        let id = self.tiles.insert(Tile::new(block, def, position, team, rotation));
        for cell in geometry::footprint_cells(position, def.size) {
            if let Some(idx) = self.index(cell) {
                self.cells[idx] = Some(id);
            }
        }
        tracing::debug!(block = %def.name, ?position, ?team, "placed building");
        Ok(id)
    }

    /// Remove a building, freeing every cell it covered.
    pub fn remove(&mut self, id: TileId) -> Result<Tile, GridError> {
        let tile = self.tiles.remove(id).ok_or(GridError::NotPlaced)?;
        for cell in tile.cells() {
            if let Some(idx) = self.index(cell) {
                self.cells[idx] = None;
            }
        }
        tracing::debug!(position = ?tile.position, "removed building");
        Ok(tile)
    }

    // -- Queries --

    /// Contents of a cell; `None` outside the grid.
    pub fn cell(&self, pos: GridPosition) -> Option<Cell> {
        let idx = self.index(pos)?;
        Some(match self.cells[idx] {
            Some(id) => Cell::Building(id),
            None => Cell::Air,
        })
    }

    /// Master tile of whatever building covers `pos`.
    pub fn resolve_target(&self, pos: GridPosition) -> Option<TileId> {
        match self.cell(pos)? {
            Cell::Building(id) => Some(id),
            Cell::Air => None,
        }
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id)
    }

    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(id)
    }

    /// All placed buildings, in slot order.
    pub fn tiles(&self) -> impl Iterator<Item = (TileId, &Tile)> {
        self.tiles.iter()
    }

    pub fn tile_ids(&self) -> Vec<TileId> {
        self.tiles.keys().collect()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }
}
