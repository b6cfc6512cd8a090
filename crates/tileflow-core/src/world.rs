//! The simulation world: content, grid, edge geometry, and flow settings,
//! plus the per-tick driver that lets every building act once.
//!
//! The transfer engines themselves live in [`crate::item_flow`],
//! [`crate::liquid_flow`], and [`crate::power`] as further `impl World`
//! blocks. All of them run synchronously on one thread; a transfer reads
//! the acting tile, then writes the neighbor and the acting tile in turn.

use crate::block::{Block, BlockKind};
use crate::config::FlowConfig;
use crate::content::Content;
use crate::env::Environment;
use crate::geometry::{EdgeTable, GridPosition, Rotation};
use crate::grid::{Grid, GridError, Tile};
use crate::id::{BlockId, TeamId, TileId};

#[derive(Debug, Clone)]
pub struct World {
    pub(crate) content: Content,
    pub(crate) grid: Grid,
    pub(crate) edges: EdgeTable,
    pub(crate) config: FlowConfig,
}

impl World {
    /// An empty `width` x `height` world with default flow settings.
    pub fn new(content: Content, width: u32, height: u32) -> Self {
        Self::with_config(content, width, height, FlowConfig::default())
    }

    pub fn with_config(content: Content, width: u32, height: u32, config: FlowConfig) -> Self {
        Self {
            content,
            grid: Grid::new(width, height),
            edges: EdgeTable::default(),
            config,
        }
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn edges(&self) -> &EdgeTable {
        &self.edges
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    // -- Placement --

    pub fn place(
        &mut self,
        block: BlockId,
        position: GridPosition,
        team: TeamId,
        rotation: Rotation,
    ) -> Result<TileId, GridError> {
        self.grid.place(&self.content, block, position, team, rotation)
    }

    pub fn remove(&mut self, tile: TileId) -> Result<Tile, GridError> {
        self.grid.remove(tile)
    }

    // -- Tile access --

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.grid.tile(id)
    }

    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.grid.tile_mut(id)
    }

    /// Descriptor of the block placed at `id`.
    pub fn block_of(&self, id: TileId) -> Option<&Block> {
        self.content.block(self.grid.tile(id)?.block)
    }

    /// Number of neighbor directions of the building at `id`.
    pub fn neighbor_count(&self, id: TileId) -> usize {
        self.grid
            .tile(id)
            .map(|t| self.edges.neighbor_count(t.size()))
            .unwrap_or(0)
    }

    pub(crate) fn parts(&self, id: TileId) -> Option<(&Tile, &Block)> {
        let tile = self.grid.tile(id)?;
        let block = self.content.block(tile.block)?;
        Some((tile, block))
    }

    /// Absolute (edge, inside) cell pairs around a building, in dump order.
    pub(crate) fn ring(&self, tile: &Tile) -> Vec<(GridPosition, GridPosition)> {
        let size = tile.size();
        self.edges
            .edges(size)
            .iter()
            .zip(self.edges.inside_edges(size))
            .map(|(edge, inside)| (tile.position.offset(*edge), tile.position.offset(*inside)))
            .collect()
    }

    // -- Tick driver --

    /// Let every placed building act once, in slot order.
    pub fn update(&mut self, env: &mut impl Environment) {
        for id in self.grid.tile_ids() {
            self.update_tile(id, env);
        }
    }

    /// Let a single building act once.
    pub fn update_tile(&mut self, id: TileId, env: &mut impl Environment) {
        let Some((tile, block)) = self.parts(id) else {
            return;
        };
        let kind = block.kind;
        let below_capacity = tile.entity.items.total() < block.item_capacity;
        let first_item = tile.entity.items.first();
        let liquid = tile.entity.liquids.current();
        let front = tile.facing_cell();

        match kind {
            BlockKind::Router => {
                self.try_dump(id, None);
            }
            BlockKind::Sorter { item } => {
                self.try_dump(id, Some(item));
            }
            BlockKind::Conveyor => {
                if let Some(item) = first_item {
                    if self.offload_dir(id, item) {
                        self.remove_stack(id, item, 1);
                    }
                }
            }
            BlockKind::ItemSource { item } => {
                if below_capacity {
                    self.offload_near(id, item);
                }
                self.try_dump(id, Some(item));
            }
            BlockKind::Conduit => {
                if let Some(liquid) = liquid {
                    self.try_move_liquid(id, front, true, liquid, env);
                }
            }
            BlockKind::LiquidRouter => {
                if let Some(liquid) = liquid {
                    self.try_dump_liquid(id, liquid);
                }
            }
            BlockKind::Wall | BlockKind::Container | BlockKind::ItemVoid | BlockKind::Battery => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn place_and_look_up() {
        let (mut world, kit) = standard_world(8, 8);
        let id = world
            .place(kit.vault, GridPosition::new(3, 3), TeamId(0), Rotation::East)
            .unwrap();
        assert_eq!(world.block_of(id).unwrap().name, "vault");
        assert_eq!(world.neighbor_count(id), 4);
        assert_eq!(world.grid().tile_count(), 1);
    }

    #[test]
    fn ring_pairs_are_absolute() {
        let (mut world, kit) = standard_world(8, 8);
        let id = world
            .place(kit.big_vault, GridPosition::new(3, 3), TeamId(0), Rotation::East)
            .unwrap();
        let ring = world.ring(world.tile(id).unwrap());
        assert_eq!(ring.len(), 8);
        assert_eq!(ring[0], (GridPosition::new(5, 3), GridPosition::new(4, 3)));
    }

    #[test]
    fn conveyor_wakes_after_handing_off() {
        let (mut world, kit) = standard_world(8, 8);
        let belt = world
            .place(kit.conveyor, GridPosition::new(2, 2), TeamId(0), Rotation::East)
            .unwrap();
        let vault = world
            .place(kit.vault, GridPosition::new(3, 2), TeamId(0), Rotation::East)
            .unwrap();
        let tile = world.tile_mut(belt).unwrap();
        tile.entity.items.add(kit.copper, 1);
        tile.entity.sleep();

        world.update_tile(belt, &mut quiet_env());

        let tile = world.tile(belt).unwrap();
        assert!(!tile.entity.is_sleeping());
        assert_eq!(tile.entity.items.total(), 0);
        assert_eq!(world.tile(vault).unwrap().entity.items.get(kit.copper), 1);
    }

    #[test]
    fn update_skips_removed_tiles() {
        let (mut world, kit) = standard_world(8, 8);
        let id = world
            .place(kit.router, GridPosition::new(3, 3), TeamId(0), Rotation::East)
            .unwrap();
        world.remove(id).unwrap();
        let mut env = quiet_env();
        world.update_tile(id, &mut env);
        assert_eq!(world.grid().tile_count(), 0);
    }
}
