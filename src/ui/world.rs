//! World setup systems for camera, lighting, ground, roads and signal heads

use bevy::prelude::*;

use super::components::{Ground, MainCamera, SignalLamp, StatusText};
use crate::simulation::{
    Axis, Position, FIELD_CENTER, FIELD_HEIGHT, FIELD_WIDTH, INTERSECTION_TOLERANCE, ROAD_WIDTH,
};

/// Simulation units per Bevy world unit
pub const WORLD_SCALE: f32 = 10.0;

/// Map a field position onto the ground plane, centred on the intersection
pub fn to_world(position: &Position, height: f32) -> Vec3 {
    Vec3::new(
        (position.x - FIELD_CENTER.x) / WORLD_SCALE,
        height,
        (position.y - FIELD_CENTER.y) / WORLD_SCALE,
    )
}

/// System to setup the world environment (ground, lighting, camera)
pub fn setup_world(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Top-down view with north at the top of the window
    commands.spawn((
        MainCamera,
        Camera3d::default(),
        Transform::from_xyz(0.0, 95.0, 0.0).looking_at(Vec3::ZERO, Vec3::NEG_Z),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let width = FIELD_WIDTH / WORLD_SCALE;
    let height = FIELD_HEIGHT / WORLD_SCALE;
    commands.spawn((
        Ground,
        Mesh3d(meshes.add(Plane3d::default().mesh().size(width, height))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
    ));

    spawn_roads(&mut commands, &mut meshes, &mut materials);
    spawn_signal_lamps(&mut commands, &mut meshes, &mut materials);
}

fn spawn_roads(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
) {
    const ROAD_HEIGHT: f32 = 0.02;
    let road_color = Color::srgb(0.2, 0.2, 0.2);
    let road_width = ROAD_WIDTH / WORLD_SCALE;

    // North/south road
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(
            road_width,
            ROAD_HEIGHT,
            FIELD_HEIGHT / WORLD_SCALE,
        ))),
        MeshMaterial3d(materials.add(road_color)),
        Transform::from_translation(Vec3::new(0.0, ROAD_HEIGHT / 2.0, 0.0)),
    ));

    // East/west road
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(
            FIELD_WIDTH / WORLD_SCALE,
            ROAD_HEIGHT,
            road_width,
        ))),
        MeshMaterial3d(materials.add(road_color)),
        Transform::from_translation(Vec3::new(0.0, ROAD_HEIGHT / 2.0, 0.0)),
    ));
}

/// One lamp on each approach, just outside the signal box
fn spawn_signal_lamps(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
) {
    const LAMP_SIZE: f32 = 0.8;
    const LAMP_HEIGHT: f32 = 1.0;
    let offset = INTERSECTION_TOLERANCE + ROAD_WIDTH / 2.0;

    let lamps = [
        (Axis::Vertical, Position::new(FIELD_CENTER.x + offset, FIELD_CENTER.y + offset)),
        (Axis::Vertical, Position::new(FIELD_CENTER.x - offset, FIELD_CENTER.y - offset)),
        (Axis::Horizontal, Position::new(FIELD_CENTER.x - offset, FIELD_CENTER.y + offset)),
        (Axis::Horizontal, Position::new(FIELD_CENTER.x + offset, FIELD_CENTER.y - offset)),
    ];

    for (axis, position) in lamps {
        commands.spawn((
            SignalLamp(axis),
            Mesh3d(meshes.add(Sphere::new(LAMP_SIZE / 2.0))),
            MeshMaterial3d(materials.add(Color::srgb(0.3, 0.3, 0.3))),
            Transform::from_translation(to_world(&position, LAMP_HEIGHT)),
        ));
    }
}

/// Status text in the top-left corner
pub fn setup_status_ui(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Auto,
                height: Val::Auto,
                position_type: PositionType::Absolute,
                top: Val::Px(10.0),
                left: Val::Px(10.0),
                padding: UiRect::all(Val::Px(10.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.9, 0.9)),
                StatusText,
            ));
        });
}
