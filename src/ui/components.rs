//! UI components and resources for linking Bevy entities to simulation state

use bevy::prelude::*;
use std::collections::HashMap;

use crate::simulation::{Axis, IntersectionModel, VehicleId};

/// Resource wrapper for the intersection model
///
/// Inserted by the host before the plugin runs, since building the model can
/// fail on bad configuration.
#[derive(Resource)]
pub struct SimModelResource(pub IntersectionModel);

/// Whether the fixed-rate tick is currently running
#[derive(Resource, Default)]
pub struct SimControl {
    pub paused: bool,
}

/// Marker component for ground plane
#[derive(Component)]
pub struct Ground;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Links a Bevy entity to a simulation vehicle
#[derive(Component)]
pub struct VehicleLink(pub VehicleId);

/// A signal head showing the state of one axis
#[derive(Component)]
pub struct SignalLamp(pub Axis);

/// Marker for the status text line
#[derive(Component)]
pub struct StatusText;

/// Resource to track Bevy entities mapped to simulation entities
#[derive(Resource, Default)]
pub struct EntityMappings {
    pub vehicles: HashMap<VehicleId, Entity>,
}
