//! Intersection model behaviour tests
//!
//! Scripted scenarios use a zero spawn probability and place vehicles by hand
//! so that only the signal and following rules are exercised.

use std::collections::{HashMap, HashSet};

use crossroads_sim::simulation::{
    in_intersection, render_map, ConfigError, Density, Heading, IntersectionModel, Position,
    SimConfig, SpawnRate, Vehicle, VehicleId, FIELD_CENTER, MIN_SAFE_DISTANCE,
};

fn quiet_config() -> SimConfig {
    SimConfig::default().with_spawn_probability(0.0)
}

fn vehicle(model: &IntersectionModel, id: VehicleId) -> Vehicle {
    model.vehicle(id).expect("vehicle should be active").clone()
}

#[test]
fn test_construction_rejects_invalid_config() {
    let zero_cycle = SimConfig::default().with_cycle_length(0);
    assert!(matches!(
        IntersectionModel::new(zero_cycle),
        Err(ConfigError::NonPositiveCycleLength)
    ));

    let stopped = SimConfig {
        speed: 0.0,
        ..SimConfig::default()
    };
    assert!(matches!(
        IntersectionModel::new(stopped),
        Err(ConfigError::NonPositiveSpeed(_))
    ));

    let reversing = SimConfig {
        speed: -1.0,
        ..SimConfig::default()
    };
    assert!(matches!(
        IntersectionModel::new(reversing),
        Err(ConfigError::NonPositiveSpeed(_))
    ));

    let flat = SimConfig {
        footprint: 0.0,
        ..SimConfig::default()
    };
    assert!(matches!(
        IntersectionModel::new(flat),
        Err(ConfigError::NonPositiveFootprint(_))
    ));

    for p in [1.5, -0.1, f64::NAN] {
        let config = SimConfig::default().with_spawn_probability(p);
        assert!(matches!(
            IntersectionModel::with_seed(config, 1),
            Err(ConfigError::SpawnProbabilityOutOfRange(_))
        ));
    }
}

#[test]
fn test_density_presets() {
    assert_eq!(Density::Low.spawn_probability(), 0.02);
    assert_eq!(Density::Medium.spawn_probability(), 0.04);
    assert_eq!(Density::High.spawn_probability(), 0.08);

    let mut model = IntersectionModel::new(SimConfig::default()).unwrap();
    assert_eq!(model.spawn_probability(), 0.04);

    model.set_density(Density::High);
    assert_eq!(model.spawn_probability(), 0.08);
    assert_eq!(model.config().spawn_rate, SpawnRate::Preset(Density::High));
}

#[test]
fn test_spawn_probability_setters() {
    let mut model = IntersectionModel::new(quiet_config()).unwrap();

    model.set_spawn_probability(0.25).unwrap();
    assert_eq!(model.spawn_probability(), 0.25);

    assert!(model.set_spawn_probability(1.01).is_err());
    assert_eq!(model.spawn_probability(), 0.25);

    model.adjust_spawn_probability(10.0);
    assert_eq!(model.spawn_probability(), 1.0);
    model.adjust_spawn_probability(-10.0);
    assert_eq!(model.spawn_probability(), 0.0);
}

#[test]
fn test_non_finite_adjustment_is_ignored() {
    let mut model = IntersectionModel::with_seed(quiet_config(), 11).unwrap();
    model.set_spawn_probability(0.3).unwrap();

    for delta in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        model.adjust_spawn_probability(delta);
        assert_eq!(model.spawn_probability(), 0.3);
        assert_eq!(model.config().spawn_rate, SpawnRate::Explicit(0.3));
    }

    // A NaN rate would spawn on every tick
    model.set_spawn_probability(0.0).unwrap();
    model.adjust_spawn_probability(f64::NAN);
    for _ in 0..100 {
        model.step();
    }
    assert_eq!(model.stats().vehicles_spawned, 0);
}

#[test]
fn test_spawns_one_vehicle_per_tick_at_full_rate() {
    let config = SimConfig::default().with_spawn_probability(1.0);
    let mut model = IntersectionModel::with_seed(config, 42).unwrap();

    for tick in 1..=100usize {
        model.step();
        // Nothing can cross the field in 100 ticks
        assert_eq!(model.active_count(), tick);
        assert_eq!(model.stats().vehicles_spawned, tick);
    }

    let ids: HashSet<VehicleId> = model.vehicles().iter().map(|v| v.id).collect();
    assert_eq!(ids.len(), 100);
    assert!(model.vehicles().iter().all(|v| v.wait_ticks < 100));
}

#[test]
fn test_no_spawns_at_zero_rate() {
    let mut model = IntersectionModel::with_seed(quiet_config(), 3).unwrap();
    for _ in 0..500 {
        model.step();
    }
    assert_eq!(model.active_count(), 0);
    assert_eq!(model.stats().vehicles_spawned, 0);
}

#[test]
fn test_spawned_vehicles_start_at_road_edge() {
    let mut model = IntersectionModel::new(quiet_config()).unwrap();
    for heading in Heading::ALL {
        let id = model.spawn_vehicle(heading);
        let spawned = vehicle(&model, id);
        assert_eq!(spawned.position, heading.spawn_point());
        assert_eq!(spawned.wait_ticks, 0);
        assert!(!spawned.has_exited);
    }
    assert_eq!(
        Heading::North.spawn_point(),
        Position::new(FIELD_CENTER.x, 800.0)
    );
    assert_eq!(Heading::East.spawn_point(), Position::new(0.0, FIELD_CENTER.y));
}

#[test]
fn test_vehicle_crosses_on_green_and_exits() {
    let config = quiet_config().with_cycle_length(1000);
    let mut model = IntersectionModel::new(config).unwrap();
    let id = model.spawn_vehicle(Heading::North);

    for _ in 0..400 {
        model.step();
    }
    // Sitting on the far edge, still inside the field
    assert_eq!(vehicle(&model, id).position.y, 0.0);

    model.step();
    assert!(model.vehicle(id).is_none());
    assert_eq!(model.active_count(), 0);
    assert_eq!(model.stats().vehicles_exited, 1);
    assert_eq!(model.stats().exited_wait_ticks, 0);
}

#[test]
fn test_vehicle_waits_at_red_until_signal_opens() {
    let config = quiet_config().with_vertical_open(false).with_cycle_length(200);
    let mut model = IntersectionModel::new(config).unwrap();
    let id = model.insert_vehicle_at(Heading::North, Position::new(FIELD_CENTER.x, 500.0));

    // Approach: free movement until the signal box is reached
    while !in_intersection(&vehicle(&model, id).position) {
        assert!(model.tick() < 100, "vehicle never reached the intersection");
        model.step();
        assert_eq!(vehicle(&model, id).wait_ticks, 0);
    }
    assert_eq!(model.tick(), 35);

    let mut previous = vehicle(&model, id);
    loop {
        assert!(model.tick() < 1000, "signal never opened");
        model.step();
        let current = vehicle(&model, id);

        if model.signals().vertical().is_open() {
            assert!(current.position.y < previous.position.y);
            assert_eq!(current.wait_ticks, previous.wait_ticks);
            break;
        }

        assert_eq!(current.wait_ticks, previous.wait_ticks + 1);
        assert_eq!(current.position, previous.position);
        previous = current;
    }

    assert_eq!(model.tick(), 200);
    assert_eq!(vehicle(&model, id).wait_ticks, 164);
}

#[test]
fn test_queued_vehicles_keep_one_footprint_apart() {
    let config = quiet_config().with_vertical_open(false).with_cycle_length(300);
    let mut model = IntersectionModel::new(config).unwrap();
    let footprint = model.config().footprint;

    let leader = model.insert_vehicle_at(Heading::North, Position::new(FIELD_CENTER.x, 700.0));
    let follower = model.insert_vehicle_at(
        Heading::North,
        Position::new(FIELD_CENTER.x, 700.0 + footprint),
    );

    let mut follower_waited = false;
    for _ in 0..1000 {
        model.step();
        if let (Some(a), Some(b)) = (model.vehicle(leader), model.vehicle(follower)) {
            let gap = b.gap_to(a);
            assert!(gap >= footprint, "vehicles closed to {} apart", gap);
            assert!(b.lateral_offset(a) < MIN_SAFE_DISTANCE);
            follower_waited |= b.wait_ticks > 0;
        }
    }

    assert!(follower_waited, "follower should have queued behind the leader");
    assert_eq!(model.stats().vehicles_exited, 2);
}

#[test]
fn test_overlapping_spawns_separate_in_spawn_order() {
    let mut model = IntersectionModel::new(quiet_config()).unwrap();
    let first = model.spawn_vehicle(Heading::West);
    let second = model.spawn_vehicle(Heading::West);
    let footprint = model.config().footprint;

    for _ in 0..50 {
        model.step();
    }

    let first = vehicle(&model, first);
    let second = vehicle(&model, second);
    assert_eq!(first.wait_ticks, 0);
    assert_eq!(second.wait_ticks, 10);
    assert!((second.gap_to(&first) - footprint).abs() < 1e-3);
}

#[test]
fn test_crossing_traffic_is_only_gated_by_signal() {
    let config = quiet_config().with_cycle_length(1000);
    let mut model = IntersectionModel::new(config).unwrap();
    let north = model.insert_vehicle_at(Heading::North, FIELD_CENTER);
    let east = model.insert_vehicle_at(Heading::East, FIELD_CENTER);

    model.step();

    // North/south has the green; east/west waits even though nothing is ahead
    assert_eq!(vehicle(&model, north).wait_ticks, 0);
    assert_eq!(vehicle(&model, east).wait_ticks, 1);
    assert_eq!(vehicle(&model, east).position, FIELD_CENTER);
}

/// Step `model` for `ticks` ticks, checking the per-tick invariants
fn run_checked(model: &mut IntersectionModel, ticks: usize) {
    let mut last_wait: HashMap<VehicleId, u32> = HashMap::new();
    let mut last_position: HashMap<VehicleId, Position> = HashMap::new();

    for _ in 0..ticks {
        model.step();

        assert_ne!(
            model.signals().vertical().is_open(),
            model.signals().horizontal().is_open()
        );

        let stats = model.stats();
        assert_eq!(
            stats.vehicles_spawned,
            stats.vehicles_exited + model.active_count()
        );

        for v in model.vehicles() {
            assert!(!v.has_exited, "exited vehicle left in the active set");
            let previous = last_wait.insert(v.id, v.wait_ticks).unwrap_or(0);
            assert!(v.wait_ticks >= previous);
        }

        // A vehicle that moved never closes within one footprint of a
        // same-lane vehicle ahead of it
        for (index, a) in model.vehicles().iter().enumerate() {
            let moved = last_position
                .get(&a.id)
                .is_some_and(|previous| *previous != a.position);
            if !moved {
                continue;
            }
            for (other_index, b) in model.vehicles().iter().enumerate() {
                if other_index == index || b.heading != a.heading {
                    continue;
                }
                let gap = a.gap_to(b);
                let ahead = gap > 0.0 || (gap == 0.0 && other_index < index);
                if ahead && a.lateral_offset(b) < MIN_SAFE_DISTANCE {
                    assert!(
                        gap >= a.footprint,
                        "vehicle {:?} moved to {} behind {:?}",
                        a.id,
                        gap,
                        b.id
                    );
                }
            }
        }

        last_position.clear();
        last_position.extend(model.vehicles().iter().map(|v| (v.id, v.position)));
    }
}

#[test]
fn test_random_run_keeps_invariants() {
    let config = SimConfig::default().with_density(Density::High).with_cycle_length(120);
    let mut model = IntersectionModel::with_seed(config, 2024).unwrap();

    run_checked(&mut model, 3000);

    assert!(model.stats().vehicles_spawned > 0);
    assert!(model.stats().vehicles_exited > 0);
    assert_eq!(model.stats().signal_changes, 25);
}

#[test]
fn test_saturated_and_fast_cycling_runs_keep_invariants() {
    let saturated = SimConfig::default().with_spawn_probability(1.0);
    let mut model = IntersectionModel::with_seed(saturated, 77).unwrap();
    run_checked(&mut model, 600);
    assert_eq!(model.stats().vehicles_spawned, 600);

    let flickering = SimConfig::default().with_density(Density::High).with_cycle_length(7);
    let mut model = IntersectionModel::with_seed(flickering, 78).unwrap();
    run_checked(&mut model, 6000);
    assert!(model.stats().vehicles_exited > 0);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let config = SimConfig::default().with_density(Density::High);
    let mut a = IntersectionModel::with_seed(config, 9).unwrap();
    let mut b = IntersectionModel::with_seed(config, 9).unwrap();

    for _ in 0..600 {
        a.step();
        b.step();
    }

    assert_eq!(a.stats(), b.stats());
    assert_eq!(a.vehicles(), b.vehicles());
}

#[test]
fn test_reset_clears_state() {
    let config = SimConfig::default().with_spawn_probability(1.0);
    let mut model = IntersectionModel::with_seed(config, 5).unwrap();
    for _ in 0..200 {
        model.step();
    }
    assert!(model.active_count() > 0);

    model.reset();
    assert_eq!(model.active_count(), 0);
    assert_eq!(model.tick(), 0);
    assert_eq!(model.stats().vehicles_spawned, 0);
    assert!(model.signals().vertical().is_open());
    assert_eq!(model.signals().ticks_until_change(), model.config().cycle_length);
}

#[test]
fn test_render_map_shows_vehicles_and_open_axis() {
    let mut model = IntersectionModel::new(quiet_config()).unwrap();
    model.spawn_vehicle(Heading::North);
    model.spawn_vehicle(Heading::East);

    let map = render_map(&model);
    let lines: Vec<&str> = map.lines().collect();
    assert_eq!(lines.len(), 41);
    assert!(map.contains('^'));
    assert!(map.contains('>'));
    assert_eq!(lines[20].chars().nth(20), Some('|'));
}
