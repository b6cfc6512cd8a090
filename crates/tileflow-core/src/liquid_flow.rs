//! Liquid flow engine: gradient-driven diffusion between neighbors,
//! reactions between incompatible liquids in contact, and leaks onto open
//! ground.
//!
//! Moves between two liquid-capable tiles conserve the total. Leaks and
//! evaporation are the only ways liquid leaves the tiles.

use crate::env::{EffectKind, Environment};
use crate::fixed::{clamp01, Fixed64};
use crate::geometry::GridPosition;
use crate::grid::Cell;
use crate::id::{LiquidId, TileId};
use crate::world::World;

impl World {
    /// Whether `tile` has room for `amount` more of `liquid`. Strictly below
    /// capacity, so a full tile still has a sliver of headroom.
    pub fn accept_liquid(&self, tile: TileId, liquid: LiquidId, amount: Fixed64) -> bool {
        self.parts(tile)
            .is_some_and(|(t, block)| block.kind.accept_liquid(block, t, liquid, amount))
    }

    /// Add `amount` of `liquid` to `tile` unconditionally. Check with
    /// [`World::accept_liquid`] first.
    pub fn handle_liquid(&mut self, tile: TileId, liquid: LiquidId, amount: Fixed64) {
        if let Some(t) = self.grid.tile_mut(tile) {
            t.entity.liquids.add(liquid, amount);
        }
    }

    /// Move up to `amount` of `liquid` from `tile` into `next`, leaving
    /// `flow_epsilon` of headroom in `next`. Returns the amount moved.
    pub fn move_liquid(&mut self, tile: TileId, next: TileId, amount: Fixed64, liquid: LiquidId) -> Fixed64 {
        let (Some((t, _)), Some((n, next_block))) = (self.parts(tile), self.parts(next)) else {
            return Fixed64::ZERO;
        };
        let headroom = next_block.liquid_capacity - n.entity.liquids.get(liquid) - self.config.flow_epsilon;
        let flow = headroom.min(amount).min(t.entity.liquids.get(liquid));

        if flow > Fixed64::ZERO && next_block.kind.accept_liquid(next_block, n, liquid, flow) {
            self.transfer_liquid(tile, next, liquid, flow);
            flow
        } else {
            Fixed64::ZERO
        }
    }

    /// One diffusion step from `tile` towards the cell `next`.
    ///
    /// If `next` belongs to a liquid-capable building, liquid flows down the
    /// fill-fraction gradient and the moved amount is returned. When nothing
    /// can flow but both sides are in contact, the liquids may react. If
    /// `next` is open ground or a non-solid building without liquid storage
    /// and `leak` is set, part of the liquid spills there as a puddle.
    pub fn try_move_liquid(
        &mut self,
        tile: TileId,
        next: GridPosition,
        leak: bool,
        liquid: LiquidId,
        env: &mut impl Environment,
    ) -> Fixed64 {
        let Some((t, _)) = self.parts(tile) else {
            return Fixed64::ZERO;
        };
        let held = t.entity.liquids.get(liquid);

        let (target, holds_liquids, passable) = match self.grid.cell(next) {
            None => return Fixed64::ZERO,
            Some(Cell::Air) => (None, false, true),
            Some(Cell::Building(id)) if id == tile => return Fixed64::ZERO,
            Some(Cell::Building(id)) => match self.parts(id) {
                Some((_, b)) => (Some(id), b.has_liquids, !b.solid),
                None => return Fixed64::ZERO,
            },
        };

        match target {
            Some(id) if holds_liquids => {
                if held > Fixed64::ZERO {
                    self.diffuse(tile, id, liquid, env)
                } else {
                    Fixed64::ZERO
                }
            }
            _ if leak && passable => {
                // Puddles under a building collect at its placement cell.
                let cell = target
                    .and_then(|id| self.grid.tile(id))
                    .map_or(next, |t| t.position);
                self.spill(tile, cell, liquid, env);
                Fixed64::ZERO
            }
            _ => Fixed64::ZERO,
        }
    }

    /// Spread `liquid` to every liquid-capable neighbor that is emptier than
    /// `tile`, moving half the fraction gap each time. Walks the whole ring
    /// starting at the dump cursor without advancing it.
    pub fn try_dump_liquid(&mut self, tile: TileId, liquid: LiquidId) {
        let Some(t) = self.grid.tile(tile) else {
            return;
        };
        let ring = self.ring(t);
        let n = ring.len();
        let start = t.entity.dump() as usize % n;

        for j in 0..n {
            let (edge, _) = ring[(start + j) % n];
            let Some(other) = self.grid.resolve_target(edge) else {
                continue;
            };
            let (Some((t, block)), Some((o, other_block))) = (self.parts(tile), self.parts(other)) else {
                continue;
            };
            if other == tile || !other_block.has_liquids {
                continue;
            }
            let capacity = block.liquid_capacity;
            let fract = t.entity.liquids.get(liquid) / capacity;
            let ofract = o.entity.liquids.get(liquid) / other_block.liquid_capacity;
            if ofract < fract {
                self.move_liquid(tile, other, (fract - ofract) * capacity / Fixed64::from_num(2), liquid);
            }
        }
    }

    fn diffuse(&mut self, tile: TileId, next: TileId, liquid: LiquidId, env: &mut impl Environment) -> Fixed64 {
        let (Some((t, block)), Some((n, next_block))) = (self.parts(tile), self.parts(next)) else {
            return Fixed64::ZERO;
        };
        if !next_block.kind.accept_liquid(next_block, n, liquid, Fixed64::ZERO) {
            return Fixed64::ZERO;
        }

        let held = t.entity.liquids.get(liquid);
        let other_held = n.entity.liquids.get(liquid);
        let fract = held / block.liquid_capacity;
        let ofract = other_held / next_block.liquid_capacity;

        let flow = (clamp01(fract - ofract) * block.liquid_capacity)
            .min(held)
            .min(next_block.liquid_capacity - other_held - self.config.flow_epsilon);

        if flow > Fixed64::ZERO && ofract <= fract && next_block.kind.accept_liquid(next_block, n, liquid, flow) {
            self.transfer_liquid(tile, next, liquid, flow);
            return flow;
        }

        let contact = self.config.contact_threshold;
        if ofract > contact && fract > contact {
            self.react(tile, next, liquid, env);
        }
        Fixed64::ZERO
    }

    fn react(&mut self, tile: TileId, next: TileId, liquid: LiquidId, env: &mut impl Environment) {
        let (Some((t, _)), Some((n, _))) = (self.parts(tile), self.parts(next)) else {
            return;
        };
        let Some(other) = n.entity.liquids.current() else {
            return;
        };
        let (Some(ours), Some(theirs)) = (self.content.liquid(liquid), self.content.liquid(other)) else {
            return;
        };

        let c = &self.config;
        let ignites = (theirs.flammability > c.flammability_threshold && ours.temperature > c.hot_threshold)
            || (ours.flammability > c.flammability_threshold && theirs.temperature > c.hot_threshold);
        let boils = (ours.temperature > c.hot_threshold && theirs.temperature < c.cold_threshold)
            || (theirs.temperature > c.hot_threshold && ours.temperature < c.cold_threshold);

        let (tx, ty) = t.world_center();
        let (nx, ny) = n.world_center();
        let half = Fixed64::from_num(0.5);
        let (mx, my) = ((tx + nx) * half, (ty + ny) * half);
        let dt = env.delta();

        if ignites {
            let damage = c.fire_damage * dt;
            let chance = c.fire_chance * dt;
            for id in [tile, next] {
                if let Some(tile) = self.grid.tile_mut(id) {
                    tile.entity.damage(damage);
                }
            }
            if env.chance(chance) {
                env.spawn_effect(EffectKind::Fire, mx, my);
            }
            tracing::debug!(?liquid, ?other, %damage, "liquids ignited");
        } else if boils {
            let rate = c.evaporation_rate * dt;
            let chance = c.steam_chance * dt;
            if let Some(tile) = self.grid.tile_mut(tile) {
                let boiled = tile.entity.liquids.get(liquid).min(rate);
                tile.entity.liquids.remove(liquid, boiled);
            }
            if env.chance(chance) {
                env.spawn_effect(EffectKind::Steam, mx, my);
            }
            tracing::debug!(?liquid, ?other, "liquid boiled off");
        }
    }

    fn spill(&mut self, tile: TileId, cell: GridPosition, liquid: LiquidId, env: &mut impl Environment) {
        let Some(t) = self.grid.tile_mut(tile) else {
            return;
        };
        let wanted = t.entity.liquids.get(liquid) / self.config.leak_divisor;
        let amount = t.entity.liquids.remove(liquid, wanted);
        if amount > Fixed64::ZERO {
            env.deposit_puddle(cell, liquid, amount);
            tracing::debug!(?liquid, ?cell, %amount, "liquid leaked");
        }
    }

    fn transfer_liquid(&mut self, from: TileId, to: TileId, liquid: LiquidId, amount: Fixed64) {
        self.handle_liquid(to, liquid, amount);
        if let Some(t) = self.grid.tile_mut(from) {
            t.entity.liquids.remove(liquid, amount);
        }
        tracing::trace!(?liquid, %amount, "liquid moved");
    }
}
