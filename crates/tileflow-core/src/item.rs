use crate::id::ItemId;
use serde::{Deserialize, Serialize};

/// A count of one item type held by a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: ItemId,
    pub amount: u32,
}

impl ItemStack {
    pub fn new(item: ItemId, amount: u32) -> Self {
        Self { item, amount }
    }
}

/// Item inventory of a tile.
///
/// Capacity lives on the block descriptor and is enforced by the accept
/// checks before anything is added; the inventory itself never refuses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInventory {
    stacks: Vec<ItemStack>,
}

impl ItemInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` of `item`.
    pub fn add(&mut self, item: ItemId, amount: u32) {
        if amount == 0 {
            return;
        }
        if let Some(stack) = self.stacks.iter_mut().find(|s| s.item == item) {
            stack.amount += amount;
        } else {
            self.stacks.push(ItemStack::new(item, amount));
        }
    }

    /// Remove up to `amount` of `item`. Returns the amount actually removed.
    pub fn remove(&mut self, item: ItemId, amount: u32) -> u32 {
        let Some(stack) = self.stacks.iter_mut().find(|s| s.item == item) else {
            return 0;
        };
        let removed = amount.min(stack.amount);
        stack.amount -= removed;
        if stack.amount == 0 {
            self.stacks.retain(|s| s.amount > 0);
        }
        removed
    }

    pub fn get(&self, item: ItemId) -> u32 {
        self.stacks
            .iter()
            .find(|s| s.item == item)
            .map(|s| s.amount)
            .unwrap_or(0)
    }

    pub fn has(&self, item: ItemId) -> bool {
        self.get(item) > 0
    }

    /// Total items across all types.
    pub fn total(&self) -> u32 {
        self.stacks.iter().map(|s| s.amount).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// First held item in insertion order.
    pub fn first(&self) -> Option<ItemId> {
        self.stacks.first().map(|s| s.item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemStack> {
        self.stacks.iter()
    }

    pub fn clear(&mut self) {
        self.stacks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove() {
        let mut inv = ItemInventory::new();
        let copper = ItemId(0);
        inv.add(copper, 5);
        assert_eq!(inv.get(copper), 5);
        assert_eq!(inv.remove(copper, 3), 3);
        assert_eq!(inv.get(copper), 2);
    }

    #[test]
    fn remove_saturates_and_drops_empty_stacks() {
        let mut inv = ItemInventory::new();
        inv.add(ItemId(0), 2);
        assert_eq!(inv.remove(ItemId(0), 10), 2);
        assert!(inv.is_empty());
        assert_eq!(inv.remove(ItemId(9), 1), 0);
    }

    #[test]
    fn total_spans_types() {
        let mut inv = ItemInventory::new();
        inv.add(ItemId(0), 3);
        inv.add(ItemId(1), 4);
        inv.add(ItemId(0), 1);
        assert_eq!(inv.total(), 8);
        assert_eq!(inv.iter().count(), 2);
        assert_eq!(inv.first(), Some(ItemId(0)));
    }

    #[test]
    fn adding_zero_creates_nothing() {
        let mut inv = ItemInventory::new();
        inv.add(ItemId(4), 0);
        assert!(inv.is_empty());
        assert!(!inv.has(ItemId(4)));
    }
}
