//! Tileflow Core -- per-tick resource flow between buildings on a tile grid.
//!
//! Buildings occupy square footprints on a [`grid::Grid`]. Each tick they
//! exchange three kinds of resource with the buildings touching their
//! edges:
//!
//! - **Items** ([`item_flow`]) -- discrete counts, handed over one at a time
//!   through an accept/handle protocol and distributed fairly with a
//!   per-tile round-robin dump cursor.
//! - **Liquids** ([`liquid_flow`]) -- continuous amounts that diffuse down
//!   the fill-fraction gradient, react when incompatible liquids touch, and
//!   leak onto open ground.
//! - **Power** ([`power`]) -- a capacity-clamped buffer.
//!
//! # Key Types
//!
//! - [`world::World`] -- Owns content, grid, edge geometry, and flow
//!   settings. Every transfer operation is a method on it.
//! - [`content::Content`] -- Frozen item, liquid, and block tables built
//!   with [`content::ContentBuilder`].
//! - [`block::Block`] / [`block::BlockKind`] -- Per-type descriptor and the
//!   behavior hooks each kind overrides.
//! - [`geometry::EdgeTable`] -- Ordered neighbor offsets around every
//!   footprint size.
//! - [`env::Environment`] -- Time, randomness, effects, and puddles.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for deterministic math.
//!
//! ```rust,ignore
//! let mut world = World::new(content, 64, 64);
//! let router = world.place(router_block, GridPosition::new(4, 4), TeamId(0), Rotation::East)?;
//! world.offload_near(router, copper);
//! world.update(&mut SimEnvironment::new(42));
//! ```

pub mod block;
pub mod config;
pub mod content;
pub mod entity;
pub mod env;
pub mod fixed;
pub mod geometry;
pub mod grid;
pub mod id;
pub mod item;
pub mod item_flow;
pub mod liquid;
pub mod liquid_flow;
pub mod power;
pub mod rng;
pub mod world;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
