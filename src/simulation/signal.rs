//! Traffic signal logic for the intersection
//!
//! Standalone implementation that doesn't depend on Bevy.

use super::config::ConfigError;
use super::types::{Axis, Heading};

/// A timed two-state flow gate for one traffic axis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    open: bool,
    /// Ticks spent in the current phase, always below `cycle_length`
    elapsed_ticks: u32,
    cycle_length: u32,
}

impl Signal {
    pub fn new(open: bool, cycle_length: u32) -> Result<Self, ConfigError> {
        if cycle_length == 0 {
            return Err(ConfigError::NonPositiveCycleLength);
        }
        Ok(Self {
            open,
            elapsed_ticks: 0,
            cycle_length,
        })
    }

    /// Advance one tick, flipping the phase once `cycle_length` ticks have passed
    pub fn step(&mut self) {
        self.elapsed_ticks += 1;
        if self.elapsed_ticks >= self.cycle_length {
            self.open = !self.open;
            self.elapsed_ticks = 0;
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn elapsed_ticks(&self) -> u32 {
        self.elapsed_ticks
    }

    pub fn cycle_length(&self) -> u32 {
        self.cycle_length
    }

    /// Calls to `step()` left before the phase flips
    pub fn ticks_until_change(&self) -> u32 {
        self.cycle_length - self.elapsed_ticks
    }

    fn set_cycle_length(&mut self, cycle_length: u32) -> Result<(), ConfigError> {
        if cycle_length == 0 {
            return Err(ConfigError::NonPositiveCycleLength);
        }
        self.cycle_length = cycle_length;
        self.elapsed_ticks = 0;
        Ok(())
    }
}

/// Two mutually exclusive signals guarding the crossing axes
///
/// The vertical signal is authoritative: the horizontal one only mirrors it,
/// so exactly one axis is open at any observation point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalPair {
    vertical: Signal,
    horizontal: Signal,
}

impl SignalPair {
    pub fn new(vertical_open: bool, cycle_length: u32) -> Result<Self, ConfigError> {
        Ok(Self {
            vertical: Signal::new(vertical_open, cycle_length)?,
            horizontal: Signal::new(!vertical_open, cycle_length)?,
        })
    }

    /// Advance one tick. Returns true when the open axis changed.
    pub fn step(&mut self) -> bool {
        let was_open = self.vertical.is_open();
        self.vertical.step();
        self.horizontal.open = !self.vertical.open;
        self.horizontal.elapsed_ticks = self.vertical.elapsed_ticks;
        was_open != self.vertical.is_open()
    }

    pub fn is_open_for(&self, heading: Heading) -> bool {
        self.signal(heading.axis()).is_open()
    }

    pub fn open_axis(&self) -> Axis {
        if self.vertical.is_open() {
            Axis::Vertical
        } else {
            Axis::Horizontal
        }
    }

    pub fn signal(&self, axis: Axis) -> &Signal {
        match axis {
            Axis::Vertical => &self.vertical,
            Axis::Horizontal => &self.horizontal,
        }
    }

    pub fn vertical(&self) -> &Signal {
        &self.vertical
    }

    pub fn horizontal(&self) -> &Signal {
        &self.horizontal
    }

    pub fn cycle_length(&self) -> u32 {
        self.vertical.cycle_length()
    }

    pub fn ticks_until_change(&self) -> u32 {
        self.vertical.ticks_until_change()
    }

    /// Change the phase length; the current phase restarts from zero
    pub fn set_cycle_length(&mut self, cycle_length: u32) -> Result<(), ConfigError> {
        self.vertical.set_cycle_length(cycle_length)?;
        self.horizontal.set_cycle_length(cycle_length)
    }
}
