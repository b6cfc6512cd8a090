use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a placed building (the master tile of its footprint).
    pub struct TileId;
}

/// Identifies an item type in the content registry. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u16);

/// Identifies a liquid type in the content registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LiquidId(pub u16);

/// Identifies a block descriptor in the content registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockId(pub u32);

/// Team that owns a tile or a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct TeamId(pub u8);

/// Anything that can hand items to a tile directly (a unit, a player).
///
/// Only team ownership matters to the transfer engines.
pub trait Unit {
    fn team(&self) -> TeamId;
}

impl Unit for TeamId {
    fn team(&self) -> TeamId {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_order_by_index() {
        assert!(ItemId(0) < ItemId(1));
        assert!(LiquidId(3) > LiquidId(2));
    }

    #[test]
    fn ids_are_hashable() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ItemId(0), "copper");
        map.insert(ItemId(1), "lead");
        assert_eq!(map[&ItemId(1)], "lead");
    }

    #[test]
    fn team_is_a_unit() {
        let team = TeamId(2);
        assert_eq!(Unit::team(&team), TeamId(2));
    }
}
