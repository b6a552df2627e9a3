//! Input handling systems

use bevy::prelude::*;

use super::components::{SimControl, SimModelResource};
use crate::simulation::Density;

/// Step applied to the spawn probability per key press
const SPAWN_PROBABILITY_STEP: f64 = 0.01;

/// Handle basic keyboard input
pub fn handle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut exit: MessageWriter<AppExit>,
    mut control: ResMut<SimControl>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
    if keyboard.just_pressed(KeyCode::Space) {
        control.paused = !control.paused;
        info!("Simulation {}", if control.paused { "paused" } else { "resumed" });
    }
}

/// Density presets, spawn-rate adjustment and reset
pub fn handle_traffic_keyboard(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut sim_model: ResMut<SimModelResource>,
) {
    let model = &mut sim_model.0;

    if keyboard.just_pressed(KeyCode::Digit1) {
        model.set_density(Density::Low);
    }
    if keyboard.just_pressed(KeyCode::Digit2) {
        model.set_density(Density::Medium);
    }
    if keyboard.just_pressed(KeyCode::Digit3) {
        model.set_density(Density::High);
    }
    if keyboard.just_pressed(KeyCode::ArrowUp) {
        model.adjust_spawn_probability(SPAWN_PROBABILITY_STEP);
    }
    if keyboard.just_pressed(KeyCode::ArrowDown) {
        model.adjust_spawn_probability(-SPAWN_PROBABILITY_STEP);
    }
    if keyboard.just_pressed(KeyCode::KeyR) {
        model.reset();
    }
}
