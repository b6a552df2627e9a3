//! Vehicle state for the intersection simulation
//!
//! Standalone implementation that doesn't depend on Bevy. Vehicles only know
//! how to move and wait; deciding which of the two happens is the model's job.

use super::types::{Axis, Heading, Position, VehicleId};

/// A vehicle driving straight through the intersection
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: VehicleId,
    pub position: Position,
    pub heading: Heading,
    /// Ticks spent blocked, by a signal or by the vehicle in front
    pub wait_ticks: u32,
    pub has_exited: bool,
    pub speed: f32,
    /// Length occupied along the lane
    pub footprint: f32,
}

impl Vehicle {
    pub fn new(
        id: VehicleId,
        position: Position,
        heading: Heading,
        speed: f32,
        footprint: f32,
    ) -> Self {
        Self {
            id,
            position,
            heading,
            wait_ticks: 0,
            has_exited: false,
            speed,
            footprint,
        }
    }

    /// Move one tick's worth of distance along the heading
    pub fn advance(&mut self) {
        if self.has_exited {
            return;
        }
        self.position = self.position.offset(self.heading, self.speed);
    }

    /// Record one blocked tick
    pub fn wait(&mut self) {
        if self.has_exited {
            return;
        }
        self.wait_ticks += 1;
    }

    /// Signed progress of `position` along this vehicle's direction of travel
    pub fn along(&self, position: &Position) -> f32 {
        let (dx, dy) = self.heading.unit_vector();
        position.x * dx + position.y * dy
    }

    /// Coordinate of `position` across this vehicle's lane
    pub fn across(&self, position: &Position) -> f32 {
        match self.heading.axis() {
            Axis::Vertical => position.x,
            Axis::Horizontal => position.y,
        }
    }

    /// How far `other` is in front of this vehicle (negative when behind)
    pub fn gap_to(&self, other: &Vehicle) -> f32 {
        self.along(&other.position) - self.along(&self.position)
    }

    /// Lateral separation from `other`
    pub fn lateral_offset(&self, other: &Vehicle) -> f32 {
        (self.across(&other.position) - self.across(&self.position)).abs()
    }
}
