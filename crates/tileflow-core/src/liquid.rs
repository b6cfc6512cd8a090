use crate::fixed::Fixed64;
use crate::id::LiquidId;
use serde::{Deserialize, Serialize};

/// Liquid storage of a tile.
///
/// Amounts are tracked per liquid, but a tile is treated as holding one
/// dominant liquid at a time: [`LiquidInventory::current`] is the liquid
/// most recently added. When that liquid runs dry the largest remaining
/// amount takes over (lowest id on ties).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidInventory {
    amounts: Vec<(LiquidId, Fixed64)>,
    current: Option<LiquidId>,
}

impl LiquidInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, liquid: LiquidId) -> Fixed64 {
        self.amounts
            .iter()
            .find(|(l, _)| *l == liquid)
            .map(|(_, a)| *a)
            .unwrap_or(Fixed64::ZERO)
    }

    /// The dominant liquid, if the tile holds any.
    pub fn current(&self) -> Option<LiquidId> {
        self.current
    }

    /// Amount of the dominant liquid.
    pub fn current_amount(&self) -> Fixed64 {
        self.current.map(|l| self.get(l)).unwrap_or(Fixed64::ZERO)
    }

    /// Add `amount` of `liquid` and make it the dominant liquid.
    pub fn add(&mut self, liquid: LiquidId, amount: Fixed64) {
        if amount <= Fixed64::ZERO {
            return;
        }
        match self.amounts.iter_mut().find(|(l, _)| *l == liquid) {
            Some((_, a)) => *a += amount,
            None => {
                self.amounts.push((liquid, amount));
                self.amounts.sort_by_key(|(l, _)| *l);
            }
        }
        self.current = Some(liquid);
    }

    /// Remove up to `amount` of `liquid`; never drops below zero. Returns the
    /// amount actually removed.
    pub fn remove(&mut self, liquid: LiquidId, amount: Fixed64) -> Fixed64 {
        let Some(idx) = self.amounts.iter().position(|(l, _)| *l == liquid) else {
            return Fixed64::ZERO;
        };
        let held = self.amounts[idx].1;
        let removed = amount.max(Fixed64::ZERO).min(held);
        self.amounts[idx].1 = held - removed;

        if self.amounts[idx].1 <= Fixed64::ZERO {
            self.amounts.remove(idx);
            if self.current == Some(liquid) {
                self.current = self.largest();
            }
        }
        removed
    }

    /// Sum over every liquid held.
    pub fn total(&self) -> Fixed64 {
        self.amounts.iter().fold(Fixed64::ZERO, |acc, (_, a)| acc + *a)
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LiquidId, Fixed64)> + '_ {
        self.amounts.iter().copied()
    }

    fn largest(&self) -> Option<LiquidId> {
        // max_by_key keeps the last maximum, so scan in reverse for lowest id.
        self.amounts
            .iter()
            .rev()
            .max_by_key(|(_, a)| *a)
            .map(|(l, _)| *l)
    }
}
