//! Block descriptors: shared, read-only configuration for every tile of a
//! given type, plus the per-kind hooks the transfer engines consult.
//!
//! Hooks are dispatched with a `match` on [`BlockKind`]. Kinds that do not
//! override a hook fall through to the default behavior: reject items,
//! allow dumping, accept power, and accept liquid while strictly below
//! capacity.

use serde::{Deserialize, Serialize};

use crate::entity::TileEntity;
use crate::fixed::Fixed64;
use crate::geometry::{GridPosition, TILE_SIZE};
use crate::grid::Tile;
use crate::id::{ItemId, LiquidId};

// ---------------------------------------------------------------------------
// Block kinds
// ---------------------------------------------------------------------------

/// Behavior family of a block. Selects hook overrides and per-tick update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// Inert solid block.
    Wall,
    /// Accepts any item until full. Never pushes items out on its own.
    Container,
    /// Accepts items from its own team and dumps them round-robin.
    Router,
    /// Accepts any item but only ever dumps `item`.
    Sorter { item: ItemId },
    /// Directional carrier: refuses items from the cell it faces and hands
    /// them forward.
    Conveyor,
    /// Produces `item` every tick and pushes it to neighbors.
    ItemSource { item: ItemId },
    /// Accepts and destroys everything.
    ItemVoid,
    /// Directional liquid pipe; leaks when it faces open ground.
    Conduit,
    /// Spreads its liquid evenly to every liquid-capable neighbor.
    LiquidRouter,
    /// Stores power.
    Battery,
}

/// Capability flags a kind starts with before any per-block override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub items: bool,
    pub liquids: bool,
    pub power: bool,
    pub solid: bool,
}

/// The tile a transfer comes from, together with the cell of that tile that
/// touches the receiver.
#[derive(Debug, Clone, Copy)]
pub struct Source<'a> {
    pub tile: &'a Tile,
    pub cell: GridPosition,
}

impl<'a> Source<'a> {
    /// A tile acting as its own source (unit deposits, local fallback).
    pub fn of(tile: &'a Tile) -> Self {
        Self { tile, cell: tile.position }
    }
}

impl BlockKind {
    pub fn capabilities(&self) -> Capabilities {
        let (items, liquids, power, solid) = match self {
            BlockKind::Wall => (false, false, false, true),
            BlockKind::Container
            | BlockKind::Router
            | BlockKind::Sorter { .. }
            | BlockKind::ItemSource { .. }
            | BlockKind::ItemVoid => (true, false, false, true),
            BlockKind::Conveyor => (true, false, false, false),
            BlockKind::Conduit => (false, true, false, false),
            BlockKind::LiquidRouter => (false, true, false, true),
            BlockKind::Battery => (false, false, true, true),
        };
        Capabilities { items, liquids, power, solid }
    }

    /// Item capacity a freshly described block of this kind gets.
    pub fn default_item_capacity(&self) -> u32 {
        match self {
            BlockKind::Router => 1,
            BlockKind::Conveyor => 4,
            _ => 10,
        }
    }

    /// The item this kind is parameterized on, if any.
    pub fn referenced_item(&self) -> Option<ItemId> {
        match *self {
            BlockKind::Sorter { item } | BlockKind::ItemSource { item } => Some(item),
            _ => None,
        }
    }

    /// Whether this kind takes `item` from `source` right now.
    pub fn accept_item(&self, block: &Block, tile: &Tile, _item: ItemId, source: Source<'_>) -> bool {
        let has_room = tile.entity.items.total() < block.item_capacity;
        match self {
            BlockKind::Container | BlockKind::Sorter { .. } => has_room,
            BlockKind::Router => source.tile.team == tile.team && has_room,
            BlockKind::Conveyor => has_room && source.cell != tile.facing_cell(),
            BlockKind::ItemVoid => true,
            _ => false,
        }
    }

    /// Whether this kind may push `item` into `to` while dumping.
    pub fn can_dump(&self, _tile: &Tile, _to: &Tile, item: ItemId) -> bool {
        match *self {
            BlockKind::Sorter { item: filter } => item == filter,
            _ => true,
        }
    }

    /// Store one delivered item.
    pub fn handle_item(&self, entity: &mut TileEntity, item: ItemId) {
        entity.wake_up();
        match self {
            BlockKind::ItemVoid => {}
            _ => entity.items.add(item, 1),
        }
    }

    /// Where a delivered stack should appear relative to the tile centre,
    /// in world units.
    pub fn stack_offset(&self, tile: &Tile, _item: ItemId) -> (Fixed64, Fixed64) {
        match self {
            BlockKind::Conveyor => {
                let back = tile.rotation.opposite().step();
                let half = Fixed64::from_num(TILE_SIZE) / Fixed64::from_num(2);
                (half * Fixed64::from_num(back.x), half * Fixed64::from_num(back.y))
            }
            _ => (Fixed64::ZERO, Fixed64::ZERO),
        }
    }

    /// Whether `amount` more of `liquid` fits. Strict so the tile never sits
    /// exactly at capacity.
    pub fn accept_liquid(&self, block: &Block, tile: &Tile, liquid: LiquidId, amount: Fixed64) -> bool {
        tile.entity.liquids.get(liquid) + amount < block.liquid_capacity
    }

    pub fn accept_power(&self, _tile: &Tile, _amount: Fixed64) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// Block descriptor
// ---------------------------------------------------------------------------

/// Immutable per-type configuration shared by every tile of that type.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub name: String,
    pub kind: BlockKind,
    /// Footprint edge length in cells.
    pub size: u8,
    pub has_items: bool,
    pub has_liquids: bool,
    pub has_power: bool,
    /// Solid blocks never receive leaked liquid.
    pub solid: bool,
    pub item_capacity: u32,
    pub liquid_capacity: Fixed64,
    /// Carried for content authors; the flow engines do not read it.
    pub liquid_flow_factor: Fixed64,
    pub power_capacity: Fixed64,
    pub health: Fixed64,
}

impl Block {
    /// A size-1 block with the kind's default capabilities and capacities.
    pub fn new(name: &str, kind: BlockKind) -> Self {
        let caps = kind.capabilities();
        Self {
            name: name.to_string(),
            kind,
            size: 1,
            has_items: caps.items,
            has_liquids: caps.liquids,
            has_power: caps.power,
            solid: caps.solid,
            item_capacity: kind.default_item_capacity(),
            liquid_capacity: Fixed64::from_num(10),
            liquid_flow_factor: Fixed64::from_num(4.9),
            power_capacity: Fixed64::from_num(10),
            health: Fixed64::from_num(40),
        }
    }

    pub fn with_size(mut self, size: u8) -> Self {
        self.size = size;
        self
    }

    pub fn with_item_capacity(mut self, capacity: u32) -> Self {
        self.item_capacity = capacity;
        self
    }

    pub fn with_liquid_capacity(mut self, capacity: Fixed64) -> Self {
        self.liquid_capacity = capacity;
        self
    }

    pub fn with_power_capacity(mut self, capacity: Fixed64) -> Self {
        self.power_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rotation;
    use crate::id::{BlockId, TeamId};

    fn tile_of(block: &Block, rotation: Rotation, team: TeamId) -> Tile {
        Tile::new(BlockId(0), block, GridPosition::new(0, 0), team, rotation)
    }

    #[test]
    fn new_block_takes_kind_defaults() {
        let conduit = Block::new("conduit", BlockKind::Conduit);
        assert!(conduit.has_liquids && !conduit.has_items && !conduit.solid);
        assert_eq!(conduit.liquid_capacity, Fixed64::from_num(10));

        let router = Block::new("router", BlockKind::Router);
        assert!(router.has_items);
        assert_eq!(router.item_capacity, 1);
    }

    #[test]
    fn wall_rejects_items() {
        let wall = Block::new("wall", BlockKind::Wall);
        let tile = tile_of(&wall, Rotation::East, TeamId(0));
        assert!(!wall.kind.accept_item(&wall, &tile, ItemId(0), Source::of(&tile)));
    }

    #[test]
    fn container_accepts_until_full() {
        let block = Block::new("vault", BlockKind::Container).with_item_capacity(2);
        let mut tile = tile_of(&block, Rotation::East, TeamId(0));
        let other = tile.clone();
        assert!(block.kind.accept_item(&block, &tile, ItemId(0), Source::of(&other)));
        tile.entity.items.add(ItemId(0), 2);
        assert!(!block.kind.accept_item(&block, &tile, ItemId(0), Source::of(&other)));
    }

    #[test]
    fn router_rejects_other_teams() {
        let block = Block::new("router", BlockKind::Router);
        let tile = tile_of(&block, Rotation::East, TeamId(0));
        let enemy = tile_of(&block, Rotation::East, TeamId(1));
        assert!(!block.kind.accept_item(&block, &tile, ItemId(0), Source::of(&enemy)));
        assert!(block.kind.accept_item(&block, &tile, ItemId(0), Source::of(&tile)));
    }

    #[test]
    fn conveyor_rejects_items_from_its_front() {
        let block = Block::new("conveyor", BlockKind::Conveyor);
        let tile = tile_of(&block, Rotation::East, TeamId(0));
        let feeder = tile.clone();
        let front = Source { tile: &feeder, cell: GridPosition::new(1, 0) };
        let back = Source { tile: &feeder, cell: GridPosition::new(-1, 0) };
        assert!(!block.kind.accept_item(&block, &tile, ItemId(0), front));
        assert!(block.kind.accept_item(&block, &tile, ItemId(0), back));
    }

    #[test]
    fn conveyor_stack_offset_points_backwards() {
        let block = Block::new("conveyor", BlockKind::Conveyor);
        let tile = tile_of(&block, Rotation::North, TeamId(0));
        assert_eq!(
            block.kind.stack_offset(&tile, ItemId(0)),
            (Fixed64::ZERO, Fixed64::from_num(-4))
        );
        let vault = Block::new("vault", BlockKind::Container);
        assert_eq!(vault.kind.stack_offset(&tile, ItemId(0)), (Fixed64::ZERO, Fixed64::ZERO));
    }

    #[test]
    fn sorter_only_dumps_its_item() {
        let block = Block::new("sorter", BlockKind::Sorter { item: ItemId(2) });
        let tile = tile_of(&block, Rotation::East, TeamId(0));
        assert!(block.kind.can_dump(&tile, &tile, ItemId(2)));
        assert!(!block.kind.can_dump(&tile, &tile, ItemId(1)));
    }

    #[test]
    fn void_swallows_items() {
        let block = Block::new("void", BlockKind::ItemVoid);
        let mut tile = tile_of(&block, Rotation::East, TeamId(0));
        tile.entity.sleep();
        block.kind.handle_item(&mut tile.entity, ItemId(0));
        assert_eq!(tile.entity.items.total(), 0);
        assert!(!tile.entity.is_sleeping());
    }

    #[test]
    fn liquid_acceptance_is_strict() {
        let block = Block::new("tank", BlockKind::LiquidRouter);
        let mut tile = tile_of(&block, Rotation::East, TeamId(0));
        let water = LiquidId(0);
        tile.entity.liquids.add(water, Fixed64::from_num(6));
        assert!(block.kind.accept_liquid(&block, &tile, water, Fixed64::from_num(3.5)));
        assert!(!block.kind.accept_liquid(&block, &tile, water, Fixed64::from_num(4)));
    }
}
