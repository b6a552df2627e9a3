//! The intersection model that ties signals and vehicles together
//!
//! This is the entry point for running the simulation without any Bevy
//! dependencies. The host calls [`IntersectionModel::step`] once per frame and
//! reads state back through the query methods to render it.

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use rand::SeedableRng;

use super::config::{validate_probability, ConfigError, Density, SimConfig, SpawnRate};
use super::signal::SignalPair;
use super::stats::SimStats;
use super::types::{
    in_field, in_intersection, Heading, Position, SimId, VehicleId, MIN_SAFE_DISTANCE,
};
use super::vehicle::Vehicle;

/// A four-way intersection with one signal pair and straight-through traffic
pub struct IntersectionModel {
    config: SimConfig,

    signals: SignalPair,

    /// Active vehicles in spawn order
    vehicles: Vec<Vehicle>,

    stats: SimStats,

    /// Next ID to assign
    next_id: usize,

    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,
}

impl IntersectionModel {
    fn new_internal(config: SimConfig, rng: Option<StdRng>) -> Result<Self, ConfigError> {
        config.validate()?;
        let signals = SignalPair::new(config.initial_vertical_open, config.cycle_length)?;
        Ok(Self {
            config,
            signals,
            vehicles: Vec::new(),
            stats: SimStats::default(),
            next_id: 0,
            rng,
        })
    }

    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        Self::new_internal(config, None)
    }

    /// Create a model with a seeded RNG for reproducible simulations
    pub fn with_seed(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new_internal(config, Some(StdRng::seed_from_u64(seed)))
    }

    /// Uniform sample in [0, 1), using seeded RNG if available
    fn random_unit(&mut self) -> f64 {
        match &mut self.rng {
            Some(rng) => rng.random::<f64>(),
            None => rand::rng().random::<f64>(),
        }
    }

    /// Choose a random element from a slice, using seeded RNG if available
    fn choose_random<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        match &mut self.rng {
            Some(rng) => slice.choose(rng),
            None => slice.choose(&mut rand::rng()),
        }
    }

    fn next_vehicle_id(&mut self) -> VehicleId {
        let id = VehicleId(SimId(self.next_id));
        self.next_id += 1;
        id
    }

    /// Advance the simulation by one tick
    pub fn step(&mut self) {
        self.stats.ticks += 1;

        if self.signals.step() {
            self.stats.signal_changes += 1;
            debug!(
                "Tick {}: signal now open for {:?} traffic",
                self.stats.ticks,
                self.signals.open_axis()
            );
        }

        self.maybe_spawn();
        self.resolve_motion();
        self.remove_exited();
    }

    /// Spawn probability for the current tick, re-derived from the spawn rate
    pub fn spawn_probability(&self) -> f64 {
        self.config.spawn_rate.probability()
    }

    fn maybe_spawn(&mut self) {
        let probability = self.spawn_probability();
        if self.random_unit() >= probability {
            return;
        }
        if let Some(&heading) = self.choose_random(&Heading::ALL) {
            self.spawn_vehicle(heading);
        }
    }

    /// Add a vehicle at the spawn point for `heading`
    pub fn spawn_vehicle(&mut self, heading: Heading) -> VehicleId {
        self.insert_vehicle_at(heading, heading.spawn_point())
    }

    /// Add a vehicle at an arbitrary position. No overlap check is made.
    pub fn insert_vehicle_at(&mut self, heading: Heading, position: Position) -> VehicleId {
        let id = self.next_vehicle_id();
        let vehicle = Vehicle::new(
            id,
            position,
            heading,
            self.config.speed,
            self.config.footprint,
        );
        debug!(
            "Tick {}: spawned vehicle {} heading {:?} at ({:.0}, {:.0})",
            self.stats.ticks, id.0 .0, heading, position.x, position.y
        );
        self.vehicles.push(vehicle);
        self.stats.vehicles_spawned += 1;
        id
    }

    /// Move or hold every active vehicle, in spawn order
    fn resolve_motion(&mut self) {
        for index in 0..self.vehicles.len() {
            let can_move = self.can_move(index);
            let vehicle = &mut self.vehicles[index];
            if vehicle.has_exited {
                continue;
            }

            if can_move {
                vehicle.advance();
                if !in_field(&vehicle.position) {
                    vehicle.has_exited = true;
                }
            } else {
                vehicle.wait();
                trace!(
                    "Vehicle {} held at ({:.0}, {:.0}), waited {} ticks",
                    vehicle.id.0 .0,
                    vehicle.position.x,
                    vehicle.position.y,
                    vehicle.wait_ticks
                );
            }
        }
    }

    /// Signal gate plus car-following check for the vehicle at `index`
    fn can_move(&self, index: usize) -> bool {
        let vehicle = &self.vehicles[index];

        if in_intersection(&vehicle.position) && !self.signals.is_open_for(vehicle.heading) {
            return false;
        }

        let blocked_by_leader = self.vehicles.iter().enumerate().any(|(other_index, other)| {
            if other_index == index || other.has_exited || other.heading != vehicle.heading {
                return false;
            }
            let gap = vehicle.gap_to(other);
            // Vehicles sharing a spot queue in spawn order
            let ahead = gap > 0.0 || (gap == 0.0 && other_index < index);
            ahead
                && vehicle.lateral_offset(other) < MIN_SAFE_DISTANCE
                && gap - vehicle.speed < vehicle.footprint
        });

        !blocked_by_leader
    }

    fn remove_exited(&mut self) {
        let stats = &mut self.stats;
        self.vehicles.retain(|vehicle| {
            if vehicle.has_exited {
                stats.record_exit(vehicle.wait_ticks);
                false
            } else {
                true
            }
        });
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|vehicle| vehicle.id == id)
    }

    pub fn active_count(&self) -> usize {
        self.vehicles.len()
    }

    pub fn signals(&self) -> &SignalPair {
        &self.signals
    }

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Ticks simulated so far
    pub fn tick(&self) -> u64 {
        self.stats.ticks
    }

    pub fn set_density(&mut self, density: Density) {
        self.config.spawn_rate = SpawnRate::Preset(density);
        debug!("Spawn rate set to {}", self.config.spawn_rate);
    }

    pub fn set_spawn_probability(&mut self, p: f64) -> Result<(), ConfigError> {
        let p = validate_probability(p)?;
        self.config.spawn_rate = SpawnRate::Explicit(p);
        debug!("Spawn rate set to {}", self.config.spawn_rate);
        Ok(())
    }

    /// Nudge the spawn probability, clamped to [0, 1]
    pub fn adjust_spawn_probability(&mut self, delta: f64) {
        if !delta.is_finite() {
            warn!("Ignoring non-finite spawn probability adjustment {}", delta);
            return;
        }
        let p = (self.spawn_probability() + delta).clamp(0.0, 1.0);
        self.config.spawn_rate = SpawnRate::Explicit(p);
        debug!("Spawn rate set to {}", self.config.spawn_rate);
    }

    pub fn set_cycle_length(&mut self, cycle_length: u32) -> Result<(), ConfigError> {
        self.signals.set_cycle_length(cycle_length)?;
        self.config.cycle_length = cycle_length;
        debug!("Signal cycle length set to {} ticks", cycle_length);
        Ok(())
    }

    /// Drop all vehicles and statistics and restart the signals
    pub fn reset(&mut self) {
        self.vehicles.clear();
        self.stats = SimStats::default();
        self.next_id = 0;
        // Config was validated at construction and by every setter
        if let Ok(signals) =
            SignalPair::new(self.config.initial_vertical_open, self.config.cycle_length)
        {
            self.signals = signals;
        }
        debug!("Simulation reset");
    }
}
