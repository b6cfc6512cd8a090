//! Content registry: items, liquids, and block descriptors.
//!
//! Built once through [`ContentBuilder`] and frozen into [`Content`], which
//! the simulation only ever reads.

use std::collections::HashMap;

use crate::block::Block;
use crate::fixed::Fixed64;
use crate::geometry::MAX_BLOCK_SIZE;
use crate::id::{BlockId, ItemId, LiquidId};

/// An item type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDef {
    pub name: String,
}

/// A liquid type definition. Both properties are roughly in `[0, 1]` and
/// only matter to the liquid reaction rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidDef {
    pub name: String,
    pub flammability: Fixed64,
    pub temperature: Fixed64,
}

/// Builder for constructing an immutable [`Content`].
/// Three-phase lifecycle: registration -> mutation -> finalization.
#[derive(Debug, Default)]
pub struct ContentBuilder {
    items: Vec<ItemDef>,
    liquids: Vec<LiquidDef>,
    blocks: Vec<Block>,
}

impl ContentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase 1: Register an item type. Returns its ID.
    pub fn register_item(&mut self, name: &str) -> ItemId {
        let id = ItemId(self.items.len() as u16);
        self.items.push(ItemDef { name: name.to_string() });
        id
    }

    /// Phase 1: Register a liquid type. Returns its ID.
    pub fn register_liquid(&mut self, name: &str, flammability: Fixed64, temperature: Fixed64) -> LiquidId {
        let id = LiquidId(self.liquids.len() as u16);
        self.liquids.push(LiquidDef {
            name: name.to_string(),
            flammability,
            temperature,
        });
        id
    }

    /// Phase 1: Register a block descriptor. Returns its ID.
    pub fn register_block(&mut self, block: Block) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(block);
        id
    }

    /// Phase 2: Mutate an already registered block by name.
    pub fn mutate_block<F>(&mut self, name: &str, f: F) -> Result<(), ContentError>
    where
        F: FnOnce(&mut Block),
    {
        let block = self
            .blocks
            .iter_mut()
            .find(|b| b.name == name)
            .ok_or_else(|| ContentError::NotFound(name.to_string()))?;
        f(block);
        Ok(())
    }

    pub fn item_id(&self, name: &str) -> Option<ItemId> {
        self.items
            .iter()
            .position(|i| i.name == name)
            .map(|i| ItemId(i as u16))
    }

    pub fn liquid_id(&self, name: &str) -> Option<LiquidId> {
        self.liquids
            .iter()
            .position(|l| l.name == name)
            .map(|i| LiquidId(i as u16))
    }

    /// Phase 3: Validate and freeze.
    pub fn build(self) -> Result<Content, ContentError> {
        let item_names = unique_names(self.items.iter().map(|i| i.name.as_str()))?;
        let liquid_names = unique_names(self.liquids.iter().map(|l| l.name.as_str()))?;
        let block_names = unique_names(self.blocks.iter().map(|b| b.name.as_str()))?;

        for block in &self.blocks {
            if block.size == 0 || block.size > MAX_BLOCK_SIZE {
                return Err(ContentError::InvalidSize {
                    block: block.name.clone(),
                    size: block.size,
                });
            }
            if block.liquid_capacity <= Fixed64::ZERO {
                return Err(ContentError::InvalidCapacity {
                    block: block.name.clone(),
                    what: "liquid",
                });
            }
            if block.power_capacity < Fixed64::ZERO {
                return Err(ContentError::InvalidCapacity {
                    block: block.name.clone(),
                    what: "power",
                });
            }
            if let Some(item) = block.kind.referenced_item() {
                if item.0 as usize >= self.items.len() {
                    return Err(ContentError::InvalidItemRef {
                        block: block.name.clone(),
                        item,
                    });
                }
            }
        }

        Ok(Content {
            items: self.items,
            liquids: self.liquids,
            blocks: self.blocks,
            item_names,
            liquid_names,
            block_names,
        })
    }
}

fn unique_names<'a>(names: impl Iterator<Item = &'a str>) -> Result<HashMap<String, usize>, ContentError> {
    let mut map = HashMap::new();
    for (idx, name) in names.enumerate() {
        if map.insert(name.to_string(), idx).is_some() {
            return Err(ContentError::DuplicateName(name.to_string()));
        }
    }
    Ok(map)
}

/// Frozen content tables. Read-only at simulation time.
#[derive(Debug, Clone)]
pub struct Content {
    items: Vec<ItemDef>,
    liquids: Vec<LiquidDef>,
    blocks: Vec<Block>,
    item_names: HashMap<String, usize>,
    liquid_names: HashMap<String, usize>,
    block_names: HashMap<String, usize>,
}

impl Content {
    /// All item IDs in ascending order.
    pub fn items(&self) -> impl Iterator<Item = ItemId> + '_ {
        (0..self.items.len()).map(|i| ItemId(i as u16))
    }

    pub fn item(&self, id: ItemId) -> Option<&ItemDef> {
        self.items.get(id.0 as usize)
    }

    pub fn item_by_name(&self, name: &str) -> Option<ItemId> {
        self.item_names.get(name).map(|&i| ItemId(i as u16))
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn liquid(&self, id: LiquidId) -> Option<&LiquidDef> {
        self.liquids.get(id.0 as usize)
    }

    pub fn liquid_by_name(&self, name: &str) -> Option<LiquidId> {
        self.liquid_names.get(name).map(|&i| LiquidId(i as u16))
    }

    pub fn liquid_count(&self) -> usize {
        self.liquids.len()
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.0 as usize)
    }

    pub fn block_by_name(&self, name: &str) -> Option<BlockId> {
        self.block_names.get(name).map(|&i| BlockId(i as u32))
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("duplicate name: {0}")]
    DuplicateName(String),
    #[error("block {block} has invalid size {size}")]
    InvalidSize { block: String, size: u8 },
    #[error("block {block} has a non-positive {what} capacity")]
    InvalidCapacity { block: String, what: &'static str },
    #[error("block {block} references unknown item {item:?}")]
    InvalidItemRef { block: String, item: ItemId },
}
