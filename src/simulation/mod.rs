//! Standalone intersection simulation module
//!
//! This module contains all the core simulation logic that can run
//! independently of the Bevy game engine. It can be tested via console
//! without needing to boot up the full game.

mod ascii;
mod config;
mod model;
mod signal;
mod stats;
mod types;
mod vehicle;

pub use ascii::{render_map, summary};
pub use config::{
    validate_probability, ConfigError, Density, SimConfig, SpawnRate, DEFAULT_CYCLE_LENGTH,
};
pub use model::IntersectionModel;
pub use signal::{Signal, SignalPair};
pub use stats::SimStats;
pub use types::{
    in_field, in_intersection, Axis, Heading, Position, SimId, VehicleId, FIELD_CENTER,
    FIELD_HEIGHT, FIELD_WIDTH, INTERSECTION_TOLERANCE, MIN_SAFE_DISTANCE, ROAD_WIDTH,
    VEHICLE_FOOTPRINT, VEHICLE_SPEED,
};
pub use vehicle::Vehicle;
