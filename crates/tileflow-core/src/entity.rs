use crate::fixed::Fixed64;
use crate::item::ItemInventory;
use crate::liquid::LiquidInventory;

/// Mutable runtime state of a placed building.
///
/// Created empty when the building is placed and dropped with it. The dump
/// cursor is only ever advanced by the item transfer engine.
#[derive(Debug, Clone, PartialEq)]
pub struct TileEntity {
    pub items: ItemInventory,
    pub liquids: LiquidInventory,
    /// Stored power, bounded by the block's power capacity.
    pub power: Fixed64,
    pub health: Fixed64,
    dump: u8,
    sleeping: bool,
}

impl TileEntity {
    pub fn new(health: Fixed64) -> Self {
        Self {
            items: ItemInventory::new(),
            liquids: LiquidInventory::new(),
            power: Fixed64::ZERO,
            health,
            dump: 0,
            sleeping: false,
        }
    }

    /// Round-robin cursor into the block's neighbor ring.
    pub fn dump(&self) -> u8 {
        self.dump
    }

    pub(crate) fn set_dump(&mut self, dump: u8) {
        self.dump = dump;
    }

    /// Mark the tile as active for the scheduler.
    pub fn wake_up(&mut self) {
        self.sleeping = false;
    }

    pub fn sleep(&mut self) {
        self.sleeping = true;
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Apply damage; health bottoms out at zero.
    pub fn damage(&mut self, amount: Fixed64) {
        self.health = (self.health - amount).max(Fixed64::ZERO);
    }

    pub fn is_dead(&self) -> bool {
        self.health <= Fixed64::ZERO
    }
}
