//! Criterion benchmarks for the per-tick driver.
//!
//! Two benchmark groups:
//! - `item_lanes`: rows of source -> conveyor x N -> router -> vault lanes
//! - `liquid_mesh`: a field of tanks with interleaved liquid routers

use criterion::{criterion_group, criterion_main, Criterion};
use tileflow_core::env::SimEnvironment;
use tileflow_core::geometry::{GridPosition, Rotation};
use tileflow_core::id::TeamId;
use tileflow_core::test_utils::*;
use tileflow_core::world::World;

const TEAM: TeamId = TeamId(0);

// ===========================================================================
// World builders
// ===========================================================================

/// `lanes` horizontal item lanes, each `length` conveyors long.
fn build_item_lanes(lanes: i32, length: i32) -> World {
    let (mut world, kit) = standard_world(length as u32 + 4, lanes as u32 * 2 + 1);
    for lane in 0..lanes {
        let y = lane * 2 + 1;
        world.place(kit.item_source, GridPosition::new(0, y), TEAM, Rotation::East).unwrap();
        for x in 1..=length {
            world.place(kit.conveyor, GridPosition::new(x, y), TEAM, Rotation::East).unwrap();
        }
        world.place(kit.router, GridPosition::new(length + 1, y), TEAM, Rotation::East).unwrap();
        world.place(kit.item_void, GridPosition::new(length + 2, y), TEAM, Rotation::East).unwrap();
    }
    world
}

/// A `side` x `side` field of tanks with a liquid router every third cell.
fn build_liquid_mesh(side: i32) -> World {
    let (mut world, kit) = standard_world(side as u32, side as u32);
    for y in 0..side {
        for x in 0..side {
            let block = if (x + y) % 3 == 0 { kit.liquid_router } else { kit.tank };
            let id = world.place(block, GridPosition::new(x, y), TEAM, Rotation::East).unwrap();
            if x == 0 {
                world.handle_liquid(id, kit.water, fixed(9.0));
            }
        }
    }
    world
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_item_lanes(c: &mut Criterion) {
    let mut world = build_item_lanes(50, 40);
    let mut env = SimEnvironment::new(42);
    // Fill the belts before measuring.
    for _ in 0..60 {
        world.update(&mut env);
    }
    c.bench_function("item_lanes_50x40", |b| b.iter(|| world.update(&mut env)));
}

fn bench_liquid_mesh(c: &mut Criterion) {
    let mut world = build_liquid_mesh(64);
    let mut env = SimEnvironment::new(42);
    c.bench_function("liquid_mesh_64", |b| b.iter(|| world.update(&mut env)));
}

criterion_group!(benches, bench_item_lanes, bench_liquid_mesh);
criterion_main!(benches);
