//! Item transfer engine: unit stack exchange, single-item delivery, and
//! round-robin dumping to neighbors.
//!
//! Dumping resumes at the tile's persisted dump cursor and walks the
//! neighbor ring in order, so over repeated calls every direction gets
//! served in turn.

use crate::block::Source;
use crate::fixed::Fixed64;
use crate::geometry::GridPosition;
use crate::id::{ItemId, TileId, Unit};
use crate::world::World;

impl World {
    /// How many of `amount` units `tile` would take from a unit right now.
    ///
    /// Zero unless the block holds items, takes `item` at all, and the unit
    /// belongs to the tile's team. Never mutates.
    pub fn accept_stack(&self, tile: TileId, item: ItemId, amount: u32, source: &impl Unit) -> u32 {
        let Some((t, block)) = self.parts(tile) else {
            return 0;
        };
        if block.kind.accept_item(block, t, item, Source::of(t)) && block.has_items && source.team() == t.team {
            self.maximum_accepted(tile, item).min(amount)
        } else {
            0
        }
    }

    /// Remaining item headroom of `tile`.
    pub fn maximum_accepted(&self, tile: TileId, _item: ItemId) -> u32 {
        self.parts(tile)
            .map(|(t, block)| block.item_capacity.saturating_sub(t.entity.items.total()))
            .unwrap_or(0)
    }

    /// Take `amount` of `item` out of `tile` and report it as taken.
    ///
    /// Callers must not ask for more than is held; the inventory saturates
    /// at zero but the requested amount is still returned.
    pub fn remove_stack(&mut self, tile: TileId, item: ItemId, amount: u32) -> u32 {
        if let Some(t) = self.grid.tile_mut(tile) {
            t.entity.wake_up();
            t.entity.items.remove(item, amount);
        }
        amount
    }

    /// Put a stack handed over by a unit into `tile`. Check with
    /// [`World::accept_stack`] first.
    pub fn handle_stack(&mut self, tile: TileId, item: ItemId, amount: u32, _source: &impl Unit) {
        if let Some(t) = self.grid.tile_mut(tile) {
            t.entity.wake_up();
            t.entity.items.add(item, amount);
        }
    }

    /// Placement offset of an incoming stack, relative to the tile centre.
    pub fn stack_offset(&self, tile: TileId, item: ItemId) -> (Fixed64, Fixed64) {
        self.parts(tile)
            .map(|(t, block)| block.kind.stack_offset(t, item))
            .unwrap_or((Fixed64::ZERO, Fixed64::ZERO))
    }

    /// Whether `tile` takes one `item` arriving from `source` through
    /// `source_cell`.
    pub fn accept_item(&self, tile: TileId, item: ItemId, source: TileId, source_cell: GridPosition) -> bool {
        let (Some((t, block)), Some((s, _))) = (self.parts(tile), self.parts(source)) else {
            return false;
        };
        block.kind.accept_item(block, t, item, Source { tile: s, cell: source_cell })
    }

    /// Deliver one `item` into `tile`. Check with [`World::accept_item`] first.
    pub fn handle_item(&mut self, tile: TileId, item: ItemId) {
        let Some(t) = self.grid.tile_mut(tile) else {
            return;
        };
        if let Some(block) = self.content.block(t.block) {
            block.kind.handle_item(&mut t.entity, item);
        }
    }

    /// Whether `tile` may push `item` into `to` while dumping.
    pub fn can_dump(&self, tile: TileId, to: TileId, item: ItemId) -> bool {
        let (Some((t, block)), Some(other)) = (self.parts(tile), self.grid.tile(to)) else {
            return false;
        };
        block.kind.can_dump(t, other, item)
    }

    /// Push one `item` (not yet in the inventory) into the first accepting
    /// neighbor, starting at the dump cursor. The cursor moves on by one
    /// every call. Keeps the item locally when nobody takes it.
    pub fn offload_near(&mut self, tile: TileId, item: ItemId) {
        let Some(t) = self.grid.tile(tile) else {
            return;
        };
        let ring = self.ring(t);
        let n = ring.len();
        let start = t.entity.dump() as usize % n;
        self.set_dump(tile, (start + 1) % n);

        for j in 0..n {
            let (edge, inside) = ring[(start + j) % n];
            let Some(other) = self.grid.resolve_target(edge) else {
                continue;
            };
            if self.accept_item(other, item, tile, inside) && self.can_dump(tile, other, item) {
                self.handle_item(other, item);
                tracing::trace!(?item, ?edge, "offloaded item");
                return;
            }
        }

        self.handle_item(tile, item);
    }

    /// Move one held item (any type, or only `item`) to the next neighbor in
    /// round-robin order that accepts it.
    ///
    /// Returns `false` without touching the cursor when the tile holds
    /// nothing. On success the cursor points just past the direction that
    /// took the item; after a full fruitless pass it is back where it began.
    pub fn try_dump(&mut self, tile: TileId, item: Option<ItemId>) -> bool {
        let Some((t, block)) = self.parts(tile) else {
            return false;
        };
        if !block.has_items || t.entity.items.total() == 0 {
            return false;
        }
        let ring = self.ring(t);
        let n = ring.len();
        let mut i = t.entity.dump() as usize % n;

        for _ in 0..n {
            let (edge, inside) = ring[i];
            let hit = self.grid.resolve_target(edge).and_then(|other| {
                self.content
                    .items()
                    .filter(|candidate| item.is_none_or(|wanted| wanted == *candidate))
                    .find(|&candidate| {
                        self.holds(tile, candidate)
                            && self.accept_item(other, candidate, tile, inside)
                            && self.can_dump(tile, other, candidate)
                    })
                    .map(|candidate| (other, candidate))
            });

            if let Some((other, dumped)) = hit {
                self.handle_item(other, dumped);
                if let Some(t) = self.grid.tile_mut(tile) {
                    t.entity.items.remove(dumped, 1);
                }
                i = (i + 1) % n;
                self.set_dump(tile, i);
                tracing::trace!(item = ?dumped, ?edge, "dumped item");
                return true;
            }

            i = (i + 1) % n;
            self.set_dump(tile, i);
        }

        false
    }

    /// Push one `item` into whatever sits in front of the tile. No cursor
    /// involvement and no dump filter.
    pub fn offload_dir(&mut self, tile: TileId, item: ItemId) -> bool {
        let Some(t) = self.grid.tile(tile) else {
            return false;
        };
        let front = t.facing_cell();
        let step = t.rotation.step();
        let inside = GridPosition::new(front.x - step.x, front.y - step.y);
        let Some(other) = self.grid.resolve_target(front) else {
            return false;
        };
        if self.accept_item(other, item, tile, inside) {
            self.handle_item(other, item);
            true
        } else {
            false
        }
    }

    fn holds(&self, tile: TileId, item: ItemId) -> bool {
        self.grid.tile(tile).is_some_and(|t| t.entity.items.has(item))
    }

    fn set_dump(&mut self, tile: TileId, dump: usize) {
        if let Some(t) = self.grid.tile_mut(tile) {
            t.entity.set_dump(dump as u8);
        }
    }
}
