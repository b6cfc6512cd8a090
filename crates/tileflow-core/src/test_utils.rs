//! Shared fixtures for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::block::{Block, BlockKind};
use crate::content::{Content, ContentBuilder};
use crate::env::{EffectKind, Environment};
use crate::fixed::Fixed64;
use crate::geometry::GridPosition;
use crate::id::*;
use crate::world::World;

// ===========================================================================
// Fixed-point helpers
// ===========================================================================

pub fn fixed(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// `|a - b| <= tolerance`, for amounts that went through a division.
pub fn approx_eq(a: Fixed64, b: Fixed64, tolerance: f64) -> bool {
    (a - b).abs() <= fixed(tolerance)
}

// ===========================================================================
// Standard content
// ===========================================================================

/// Ids of everything registered by [`standard_content`].
#[derive(Debug, Clone, Copy)]
pub struct Kit {
    pub copper: ItemId,
    pub lead: ItemId,
    pub water: LiquidId,
    pub oil: LiquidId,
    pub slag: LiquidId,
    pub cryofluid: LiquidId,
    pub wall: BlockId,
    pub vault: BlockId,
    /// Size-2 container.
    pub big_vault: BlockId,
    /// Size-3 container.
    pub core: BlockId,
    pub router: BlockId,
    pub copper_sorter: BlockId,
    pub conveyor: BlockId,
    /// Size-2 conveyor: non-solid, no liquids.
    pub wide_conveyor: BlockId,
    pub item_source: BlockId,
    pub item_void: BlockId,
    pub conduit: BlockId,
    pub liquid_router: BlockId,
    /// Size-1 liquid store, capacity 10.
    pub tank: BlockId,
    /// Size-2 liquid store, capacity 40.
    pub big_tank: BlockId,
    pub battery: BlockId,
}

/// A small content set covering every block kind.
///
/// Liquids: water (cold, inert), oil (flammable), slag (hot), cryofluid
/// (very cold).
pub fn standard_content() -> (Content, Kit) {
    let mut b = ContentBuilder::new();
    let copper = b.register_item("copper");
    let lead = b.register_item("lead");
    let water = b.register_liquid("water", fixed(0.0), fixed(0.5));
    let oil = b.register_liquid("oil", fixed(1.2), fixed(0.5));
    let slag = b.register_liquid("slag", fixed(0.0), fixed(1.0));
    let cryofluid = b.register_liquid("cryofluid", fixed(0.0), fixed(0.25));

    let kit = Kit {
        copper,
        lead,
        water,
        oil,
        slag,
        cryofluid,
        wall: b.register_block(Block::new("wall", BlockKind::Wall)),
        vault: b.register_block(Block::new("vault", BlockKind::Container)),
        big_vault: b.register_block(Block::new("big-vault", BlockKind::Container).with_size(2).with_item_capacity(40)),
        core: b.register_block(Block::new("core", BlockKind::Container).with_size(3).with_item_capacity(90)),
        router: b.register_block(Block::new("router", BlockKind::Router)),
        copper_sorter: b.register_block(Block::new("copper-sorter", BlockKind::Sorter { item: copper })),
        conveyor: b.register_block(Block::new("conveyor", BlockKind::Conveyor)),
        wide_conveyor: b.register_block(Block::new("wide-conveyor", BlockKind::Conveyor).with_size(2)),
        item_source: b.register_block(Block::new("copper-source", BlockKind::ItemSource { item: copper })),
        item_void: b.register_block(Block::new("item-void", BlockKind::ItemVoid)),
        conduit: b.register_block(Block::new("conduit", BlockKind::Conduit)),
        liquid_router: b.register_block(Block::new("liquid-router", BlockKind::LiquidRouter)),
        tank: b.register_block(Block::new("liquid-tank", BlockKind::LiquidRouter)),
        big_tank: b.register_block(
            Block::new("big-liquid-tank", BlockKind::LiquidRouter)
                .with_size(2)
                .with_liquid_capacity(fixed(40.0)),
        ),
        battery: b.register_block(Block::new("battery", BlockKind::Battery)),
    };

    let content = b.build().expect("standard content is valid");
    (content, kit)
}

/// An empty `width` x `height` world over [`standard_content`].
pub fn standard_world(width: u32, height: u32) -> (World, Kit) {
    let (content, kit) = standard_content();
    (World::new(content, width, height), kit)
}

// ===========================================================================
// Inspection
// ===========================================================================

pub fn items_in(world: &World, tile: TileId, item: ItemId) -> u32 {
    world.tile(tile).map(|t| t.entity.items.get(item)).unwrap_or(0)
}

pub fn liquid_in(world: &World, tile: TileId, liquid: LiquidId) -> Fixed64 {
    world
        .tile(tile)
        .map(|t| t.entity.liquids.get(liquid))
        .unwrap_or(Fixed64::ZERO)
}

/// Sum of `liquid` held by every placed building.
pub fn total_liquid(world: &World, liquid: LiquidId) -> Fixed64 {
    world
        .grid()
        .tiles()
        .fold(Fixed64::ZERO, |acc, (_, t)| acc + t.entity.liquids.get(liquid))
}

// ===========================================================================
// Scripted environment
// ===========================================================================

/// Environment with a fixed delta and a fixed chance outcome that records
/// every effect and puddle in call order.
#[derive(Debug, Clone)]
pub struct ScriptedEnvironment {
    pub delta: Fixed64,
    /// Returned by every [`Environment::chance`] roll.
    pub outcome: bool,
    pub effects: Vec<(EffectKind, Fixed64, Fixed64)>,
    pub puddles: Vec<(GridPosition, LiquidId, Fixed64)>,
    /// Probabilities passed to `chance`, in order.
    pub rolls: Vec<Fixed64>,
}

impl ScriptedEnvironment {
    pub fn new(delta: Fixed64, outcome: bool) -> Self {
        Self {
            delta,
            outcome,
            effects: Vec::new(),
            puddles: Vec::new(),
            rolls: Vec::new(),
        }
    }
}

impl Environment for ScriptedEnvironment {
    fn delta(&self) -> Fixed64 {
        self.delta
    }

    fn chance(&mut self, p: Fixed64) -> bool {
        self.rolls.push(p);
        self.outcome
    }

    fn spawn_effect(&mut self, kind: EffectKind, x: Fixed64, y: Fixed64) {
        self.effects.push((kind, x, y));
    }

    fn deposit_puddle(&mut self, cell: GridPosition, liquid: LiquidId, amount: Fixed64) {
        self.puddles.push((cell, liquid, amount));
    }
}

/// Delta 1, every roll fails.
pub fn quiet_env() -> ScriptedEnvironment {
    ScriptedEnvironment::new(Fixed64::ONE, false)
}
