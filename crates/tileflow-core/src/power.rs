//! Power buffer operations.

use crate::fixed::Fixed64;
use crate::id::TileId;
use crate::world::World;

impl World {
    /// Whether the building at `tile` will take `amount` of power. Callers
    /// check `has_power` themselves.
    pub fn accept_power(&self, tile: TileId, amount: Fixed64) -> bool {
        self.parts(tile)
            .is_some_and(|(t, block)| block.kind.accept_power(t, amount))
    }

    /// Store as much of `amount` as fits and return what was stored.
    /// Negative amounts store nothing.
    pub fn add_power(&mut self, tile: TileId, amount: Fixed64) -> Fixed64 {
        let Some((t, block)) = self.parts(tile) else {
            return Fixed64::ZERO;
        };
        let room = (block.power_capacity - t.entity.power).max(Fixed64::ZERO);
        let stored = amount.max(Fixed64::ZERO).min(room);
        if let Some(t) = self.grid.tile_mut(tile) {
            t.entity.power += stored;
        }
        stored
    }
}
