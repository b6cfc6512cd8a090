//! Property-based tests for the flow engines.
//!
//! Random fills and random operation sequences over a small row of tanks,
//! checking conservation, capacity bounds, gradient direction, and that
//! acceptance queries never mutate.

use proptest::prelude::*;
use tileflow_core::fixed::Fixed64;
use tileflow_core::geometry::{GridPosition, Rotation};
use tileflow_core::id::*;
use tileflow_core::test_utils::*;
use tileflow_core::world::World;

const TEAM: TeamId = TeamId(0);
const ROW: i32 = 5;

// ===========================================================================
// Generators
// ===========================================================================

/// A row of `ROW` size-1 tanks along y = 1, each filled with a random
/// amount of water below capacity.
fn tank_row(fills: &[f64]) -> (World, Kit, Vec<TileId>) {
    let (mut world, kit) = standard_world(ROW as u32 + 2, 3);
    let tanks = fills
        .iter()
        .enumerate()
        .map(|(i, &fill)| {
            let id = world
                .place(kit.tank, GridPosition::new(i as i32 + 1, 1), TEAM, Rotation::East)
                .unwrap();
            world.handle_liquid(id, kit.water, fixed(fill));
            id
        })
        .collect();
    (world, kit, tanks)
}

fn arb_fills() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(0.0..9.9f64, ROW as usize)
}

#[derive(Debug, Clone)]
enum LiquidOp {
    /// Diffuse from tank `from` toward the next tank east or west.
    Diffuse { from: usize, east: bool },
    /// Liquid-router style spread from tank `from`.
    Spread { from: usize },
    /// Explicit bounded move between adjacent tanks.
    Move { from: usize, east: bool, amount: f64 },
}

fn arb_op() -> impl Strategy<Value = LiquidOp> {
    prop_oneof![
        (0..ROW as usize, any::<bool>()).prop_map(|(from, east)| LiquidOp::Diffuse { from, east }),
        (0..ROW as usize).prop_map(|from| LiquidOp::Spread { from }),
        (0..ROW as usize, any::<bool>(), 0.0..12.0f64)
            .prop_map(|(from, east, amount)| LiquidOp::Move { from, east, amount }),
    ]
}

fn neighbor(from: usize, east: bool) -> Option<usize> {
    if east {
        (from + 1 < ROW as usize).then_some(from + 1)
    } else {
        from.checked_sub(1)
    }
}

fn apply(world: &mut World, kit: &Kit, tanks: &[TileId], op: &LiquidOp) {
    let mut env = quiet_env();
    match *op {
        LiquidOp::Diffuse { from, east } => {
            if let Some(to) = neighbor(from, east) {
                let cell = world.tile(tanks[to]).unwrap().position;
                world.try_move_liquid(tanks[from], cell, false, kit.water, &mut env);
            }
        }
        LiquidOp::Spread { from } => world.try_dump_liquid(tanks[from], kit.water),
        LiquidOp::Move { from, east, amount } => {
            if let Some(to) = neighbor(from, east) {
                world.move_liquid(tanks[from], tanks[to], fixed(amount), kit.water);
            }
        }
    }
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #[test]
    fn liquid_is_conserved_without_leaks(
        fills in arb_fills(),
        ops in proptest::collection::vec(arb_op(), 1..40),
    ) {
        let (mut world, kit, tanks) = tank_row(&fills);
        let before = total_liquid(&world, kit.water);
        for op in &ops {
            apply(&mut world, &kit, &tanks, op);
        }
        prop_assert_eq!(total_liquid(&world, kit.water), before);
    }

    #[test]
    fn liquid_stays_below_capacity(
        fills in arb_fills(),
        ops in proptest::collection::vec(arb_op(), 1..40),
    ) {
        let (mut world, kit, tanks) = tank_row(&fills);
        for op in &ops {
            apply(&mut world, &kit, &tanks, op);
            for &t in &tanks {
                let held = liquid_in(&world, t, kit.water);
                prop_assert!(held >= Fixed64::ZERO);
                prop_assert!(held < world.block_of(t).unwrap().liquid_capacity);
            }
        }
    }

    #[test]
    fn diffusion_never_flows_uphill(a in 0.0..9.9f64, b in 0.0..9.9f64) {
        let (mut world, kit, tanks) = tank_row(&[a, b]);
        let (lo_before, hi_before) = (liquid_in(&world, tanks[0], kit.water), liquid_in(&world, tanks[1], kit.water));
        let moved = world.try_move_liquid(tanks[0], GridPosition::new(2, 1), false, kit.water, &mut quiet_env());
        if lo_before < hi_before {
            prop_assert_eq!(moved, Fixed64::ZERO);
            prop_assert_eq!(liquid_in(&world, tanks[1], kit.water), hi_before);
        } else {
            prop_assert_eq!(liquid_in(&world, tanks[1], kit.water), hi_before + moved);
        }
    }

    #[test]
    fn item_totals_stay_within_capacity(
        pushes in proptest::collection::vec((0..3usize, any::<bool>()), 1..60),
    ) {
        let (mut world, kit) = standard_world(8, 8);
        let hub = world.place(kit.item_source, GridPosition::new(3, 3), TEAM, Rotation::East).unwrap();
        let sinks = [
            world.place(kit.vault, GridPosition::new(4, 3), TEAM, Rotation::East).unwrap(),
            world.place(kit.router, GridPosition::new(3, 4), TEAM, Rotation::East).unwrap(),
            world.place(kit.conveyor, GridPosition::new(2, 3), TEAM, Rotation::West).unwrap(),
        ];
        for (which, use_lead) in pushes {
            let item = if use_lead { kit.lead } else { kit.copper };
            match which {
                0 => world.offload_near(hub, item),
                1 => { world.try_dump(hub, None); }
                _ => { world.try_dump(sinks[1], None); }
            }
            for id in sinks.iter().chain([&hub]) {
                let tile = world.tile(*id).unwrap();
                let block = world.block_of(*id).unwrap();
                prop_assert!(tile.entity.dump() < world.neighbor_count(*id) as u8);
                if *id != hub {
                    prop_assert!(tile.entity.items.total() <= block.item_capacity);
                }
            }
        }
    }

    #[test]
    fn acceptance_queries_are_idempotent(
        fill in 0.0..9.9f64,
        amount in 0.0..12.0f64,
        stack in 0..20u32,
        power in 0.0..20.0f64,
    ) {
        let (mut world, kit) = standard_world(6, 6);
        let tank = world.place(kit.tank, GridPosition::new(1, 1), TEAM, Rotation::East).unwrap();
        let vault = world.place(kit.vault, GridPosition::new(3, 1), TEAM, Rotation::East).unwrap();
        let battery = world.place(kit.battery, GridPosition::new(1, 3), TEAM, Rotation::East).unwrap();
        world.handle_liquid(tank, kit.water, fixed(fill));
        world.handle_stack(vault, kit.copper, stack / 4, &TEAM);

        let liquid = world.accept_liquid(tank, kit.water, fixed(amount));
        let items = world.accept_stack(vault, kit.copper, stack, &TEAM);
        let charge = world.accept_power(battery, fixed(power));
        for _ in 0..3 {
            prop_assert_eq!(world.accept_liquid(tank, kit.water, fixed(amount)), liquid);
            prop_assert_eq!(world.accept_stack(vault, kit.copper, stack, &TEAM), items);
            prop_assert_eq!(world.accept_power(battery, fixed(power)), charge);
        }
        prop_assert_eq!(liquid_in(&world, tank, kit.water), fixed(fill));
    }
}
