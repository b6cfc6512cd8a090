//! Collaborators the transfer engines call out to: elapsed time, random
//! rolls, visual effects, and ground puddles.
//!
//! None of these affect conservation of items or liquid between tiles, so
//! tests can swap in a scripted [`Environment`] without touching flow math.

use std::collections::BTreeMap;

use crate::fixed::Fixed64;
use crate::geometry::GridPosition;
use crate::id::LiquidId;
use crate::rng::SimRng;

/// Visual effects the liquid engine can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Fire,
    Steam,
}

/// Something the engines reported to the outside world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    Effect {
        kind: EffectKind,
        x: Fixed64,
        y: Fixed64,
    },
    Puddle {
        cell: GridPosition,
        liquid: LiquidId,
        amount: Fixed64,
    },
}

/// Time, randomness, and fire-and-forget side effects for one tick.
pub trait Environment {
    /// Elapsed time this tick, in ticks (1 at the nominal rate).
    fn delta(&self) -> Fixed64;

    /// Roll with probability `p`.
    fn chance(&mut self, p: Fixed64) -> bool;

    /// Spawn a visual effect at world coordinates.
    fn spawn_effect(&mut self, kind: EffectKind, x: Fixed64, y: Fixed64);

    /// Spill `amount` of `liquid` onto the ground at `cell`.
    fn deposit_puddle(&mut self, cell: GridPosition, liquid: LiquidId, amount: Fixed64);
}

/// Default environment: fixed delta, seeded RNG, recorded events, and an
/// accumulating puddle map.
#[derive(Debug, Clone)]
pub struct SimEnvironment {
    pub delta: Fixed64,
    rng: SimRng,
    events: Vec<FlowEvent>,
    puddles: BTreeMap<(GridPosition, LiquidId), Fixed64>,
}

impl SimEnvironment {
    pub fn new(seed: u64) -> Self {
        Self {
            delta: Fixed64::ONE,
            rng: SimRng::new(seed),
            events: Vec::new(),
            puddles: BTreeMap::new(),
        }
    }

    pub fn with_delta(mut self, delta: Fixed64) -> Self {
        self.delta = delta;
        self
    }

    pub fn events(&self) -> &[FlowEvent] {
        &self.events
    }

    /// Take every event recorded so far.
    pub fn drain_events(&mut self) -> Vec<FlowEvent> {
        std::mem::take(&mut self.events)
    }

    /// Liquid lying on the ground at `cell`.
    pub fn puddle(&self, cell: GridPosition, liquid: LiquidId) -> Fixed64 {
        self.puddles.get(&(cell, liquid)).copied().unwrap_or(Fixed64::ZERO)
    }

    /// Total of `liquid` lying on the ground anywhere.
    pub fn puddle_total(&self, liquid: LiquidId) -> Fixed64 {
        self.puddles
            .iter()
            .filter(|((_, l), _)| *l == liquid)
            .fold(Fixed64::ZERO, |acc, (_, a)| acc + *a)
    }
}

impl Environment for SimEnvironment {
    fn delta(&self) -> Fixed64 {
        self.delta
    }

    fn chance(&mut self, p: Fixed64) -> bool {
        self.rng.chance(p)
    }

    fn spawn_effect(&mut self, kind: EffectKind, x: Fixed64, y: Fixed64) {
        self.events.push(FlowEvent::Effect { kind, x, y });
    }

    fn deposit_puddle(&mut self, cell: GridPosition, liquid: LiquidId, amount: Fixed64) {
        *self.puddles.entry((cell, liquid)).or_insert(Fixed64::ZERO) += amount;
        self.events.push(FlowEvent::Puddle { cell, liquid, amount });
    }
}
