//! UI module that visualizes the simulation state using Bevy
//!
//! This module is purely for visualization - all simulation logic is in the `simulation` module.
//! The UI reads state from `IntersectionModel` and renders it using Bevy's 3D graphics.

mod components;
mod input;
mod sync;
mod world;

use bevy::prelude::*;

pub use components::{EntityMappings, SimControl, SimModelResource};

use input::{handle_input, handle_traffic_keyboard};
use sync::{sync_vehicles, tick_simulation, update_signal_lamps, update_status_text};
use world::{setup_status_ui, setup_world};

/// Host tick rate the model is tuned for
const TICK_HZ: f64 = 60.0;

/// Plugin to register all UI systems
///
/// Expects a [`SimModelResource`] to be inserted by the host.
pub struct IntersectionUIPlugin;

impl Plugin for IntersectionUIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EntityMappings>()
            .init_resource::<SimControl>()
            .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
            .add_systems(Startup, (setup_world, setup_status_ui))
            .add_systems(FixedUpdate, tick_simulation)
            .add_systems(
                Update,
                (
                    sync_vehicles,
                    update_signal_lamps,
                    update_status_text,
                    handle_input,
                    handle_traffic_keyboard,
                ),
            );
    }
}
