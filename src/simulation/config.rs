//! Configuration for the intersection model
//!
//! Only two things are meant to be tuned by a user: how often vehicles
//! arrive and how long each signal phase lasts. Speed and footprint are
//! carried here so construction can reject nonsensical values in one place.

use std::fmt;

use super::types::{VEHICLE_FOOTPRINT, VEHICLE_SPEED};

/// Default number of ticks a signal phase lasts (2.5 s at 60 Hz)
pub const DEFAULT_CYCLE_LENGTH: u32 = 150;

/// Traffic density presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Density {
    Low,
    #[default]
    Medium,
    High,
}

impl Density {
    /// Per-tick probability of a new arrival
    pub fn spawn_probability(self) -> f64 {
        match self {
            Density::Low => 0.02,
            Density::Medium => 0.04,
            Density::High => 0.08,
        }
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Density::Low => write!(f, "low"),
            Density::Medium => write!(f, "medium"),
            Density::High => write!(f, "high"),
        }
    }
}

/// How the spawn probability is chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnRate {
    /// Derived from a density preset
    Preset(Density),
    /// An explicit probability in [0, 1]
    Explicit(f64),
}

impl SpawnRate {
    pub fn probability(&self) -> f64 {
        match self {
            SpawnRate::Preset(density) => density.spawn_probability(),
            SpawnRate::Explicit(p) => *p,
        }
    }
}

impl Default for SpawnRate {
    fn default() -> Self {
        SpawnRate::Preset(Density::default())
    }
}

impl fmt::Display for SpawnRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpawnRate::Preset(density) => {
                write!(f, "{} ({:.2})", density, density.spawn_probability())
            }
            SpawnRate::Explicit(p) => write!(f, "custom ({:.2})", p),
        }
    }
}

/// Rejected configuration values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    NonPositiveCycleLength,
    NonPositiveSpeed(f32),
    NonPositiveFootprint(f32),
    SpawnProbabilityOutOfRange(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveCycleLength => {
                write!(f, "signal cycle length must be at least one tick")
            }
            ConfigError::NonPositiveSpeed(speed) => {
                write!(f, "vehicle speed must be positive, got {}", speed)
            }
            ConfigError::NonPositiveFootprint(footprint) => {
                write!(f, "vehicle footprint must be positive, got {}", footprint)
            }
            ConfigError::SpawnProbabilityOutOfRange(p) => {
                write!(f, "spawn probability must lie in [0, 1], got {}", p)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Check a spawn probability before it reaches the model
pub fn validate_probability(p: f64) -> Result<f64, ConfigError> {
    // NaN fails the range check too
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(ConfigError::SpawnProbabilityOutOfRange(p))
    }
}

/// Everything needed to construct an `IntersectionModel`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    pub spawn_rate: SpawnRate,
    /// Ticks per signal phase
    pub cycle_length: u32,
    /// Whether north/south traffic starts with the green light
    pub initial_vertical_open: bool,
    pub speed: f32,
    pub footprint: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            spawn_rate: SpawnRate::default(),
            cycle_length: DEFAULT_CYCLE_LENGTH,
            initial_vertical_open: true,
            speed: VEHICLE_SPEED,
            footprint: VEHICLE_FOOTPRINT,
        }
    }
}

impl SimConfig {
    pub fn with_density(mut self, density: Density) -> Self {
        self.spawn_rate = SpawnRate::Preset(density);
        self
    }

    pub fn with_spawn_probability(mut self, p: f64) -> Self {
        self.spawn_rate = SpawnRate::Explicit(p);
        self
    }

    pub fn with_cycle_length(mut self, cycle_length: u32) -> Self {
        self.cycle_length = cycle_length;
        self
    }

    pub fn with_vertical_open(mut self, open: bool) -> Self {
        self.initial_vertical_open = open;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cycle_length == 0 {
            return Err(ConfigError::NonPositiveCycleLength);
        }
        if self.speed.is_nan() || self.speed <= 0.0 {
            return Err(ConfigError::NonPositiveSpeed(self.speed));
        }
        if self.footprint.is_nan() || self.footprint <= 0.0 {
            return Err(ConfigError::NonPositiveFootprint(self.footprint));
        }
        validate_probability(self.spawn_rate.probability())?;
        Ok(())
    }
}
