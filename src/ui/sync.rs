//! Systems for syncing Bevy entities with simulation state

use bevy::prelude::*;

use super::components::{
    EntityMappings, SignalLamp, SimControl, SimModelResource, StatusText, VehicleLink,
};
use super::world::{to_world, WORLD_SCALE};
use crate::simulation::ROAD_WIDTH;

/// Wait after which a vehicle is drawn fully red
const MAX_WAIT_COLOR_TICKS: f32 = 300.0;

const VEHICLE_HEIGHT: f32 = 0.3;

/// System to run simulation tick
pub fn tick_simulation(control: Res<SimControl>, mut sim_model: ResMut<SimModelResource>) {
    if !control.paused {
        sim_model.0.step();
    }
}

/// Blue while flowing, shading to red the longer a vehicle has waited
fn wait_color(wait_ticks: u32) -> Color {
    let t = (wait_ticks as f32 / MAX_WAIT_COLOR_TICKS).min(1.0);
    Color::srgb(0.2 + 0.7 * t, 0.4 * (1.0 - t), 0.8 * (1.0 - t))
}

/// Write `color` into a material only when it differs from the current one.
/// Returns whether the material was touched.
fn set_base_color(
    materials: &mut Assets<StandardMaterial>,
    handle: &Handle<StandardMaterial>,
    color: Color,
) -> bool {
    if !materials
        .get(handle)
        .is_some_and(|material| material.base_color != color)
    {
        return false;
    }
    if let Some(material) = materials.get_mut(handle) {
        material.base_color = color;
    }
    true
}

/// System to sync vehicle visuals from simulation state
pub fn sync_vehicles(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    sim_model: Res<SimModelResource>,
    mut mappings: ResMut<EntityMappings>,
    mut vehicle_query: Query<(
        Entity,
        &VehicleLink,
        &mut Transform,
        &MeshMaterial3d<StandardMaterial>,
    )>,
) {
    let model = &sim_model.0;

    for (entity, link, mut transform, material_handle) in vehicle_query.iter_mut() {
        match model.vehicle(link.0) {
            Some(vehicle) => {
                transform.translation = to_world(&vehicle.position, VEHICLE_HEIGHT);
                transform.rotation = Quat::from_rotation_y(vehicle.heading.angle());
                set_base_color(
                    &mut materials,
                    &material_handle.0,
                    wait_color(vehicle.wait_ticks),
                );
            }
            None => {
                // Vehicle left the field, despawn
                commands.entity(entity).despawn();
                mappings.vehicles.remove(&link.0);
            }
        }
    }

    for vehicle in model.vehicles() {
        if mappings.vehicles.contains_key(&vehicle.id) {
            continue;
        }
        let width = ROAD_WIDTH / WORLD_SCALE / 3.0;
        let length = vehicle.footprint / WORLD_SCALE;
        let entity = commands
            .spawn((
                VehicleLink(vehicle.id),
                Mesh3d(meshes.add(Cuboid::new(width, 0.2, length))),
                MeshMaterial3d(materials.add(wait_color(vehicle.wait_ticks))),
                Transform::from_translation(to_world(&vehicle.position, VEHICLE_HEIGHT))
                    .with_rotation(Quat::from_rotation_y(vehicle.heading.angle())),
            ))
            .id();
        mappings.vehicles.insert(vehicle.id, entity);
    }
}

/// System to colour the signal heads
pub fn update_signal_lamps(
    sim_model: Res<SimModelResource>,
    lamp_query: Query<(&SignalLamp, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let signals = sim_model.0.signals();
    for (lamp, material_handle) in lamp_query.iter() {
        let color = if signals.signal(lamp.0).is_open() {
            Color::srgb(0.0, 1.0, 0.0)
        } else {
            Color::srgb(1.0, 0.0, 0.0)
        };
        set_base_color(&mut materials, &material_handle.0, color);
    }
}

/// System to refresh the status line
pub fn update_status_text(
    sim_model: Res<SimModelResource>,
    control: Res<SimControl>,
    mut text_query: Query<&mut Text, With<StatusText>>,
) {
    let model = &sim_model.0;
    let signals = model.signals();
    for mut text in text_query.iter_mut() {
        **text = format!(
            "{}Spawn rate: {}\nOpen: {:?} ({} ticks left)\nActive: {} | Exited: {} | Avg wait: {:.0}",
            if control.paused { "PAUSED\n" } else { "" },
            model.config().spawn_rate,
            signals.open_axis(),
            signals.ticks_until_change(),
            model.active_count(),
            model.stats().vehicles_exited,
            model.stats().average_wait(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{Heading, IntersectionModel, SimConfig};

    fn sync_app(model: IntersectionModel) -> App {
        let mut app = App::new();
        app.init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .init_resource::<EntityMappings>()
            .insert_resource(SimModelResource(model))
            .add_systems(Update, sync_vehicles);
        app
    }

    fn linked_entities(app: &mut App) -> usize {
        let mut query = app.world_mut().query::<&VehicleLink>();
        query.iter(app.world()).count()
    }

    #[test]
    fn test_sync_tracks_vehicles_through_mappings() {
        let config = SimConfig::default().with_spawn_probability(0.0);
        let mut model = IntersectionModel::new(config).unwrap();
        let north = model.spawn_vehicle(Heading::North);
        let east = model.spawn_vehicle(Heading::East);
        let mut app = sync_app(model);

        app.update();
        assert_eq!(linked_entities(&mut app), 2);
        let mappings = app.world().resource::<EntityMappings>();
        assert!(mappings.vehicles.contains_key(&north));
        assert!(mappings.vehicles.contains_key(&east));

        // A second frame must not spawn duplicates for mapped vehicles
        app.update();
        assert_eq!(linked_entities(&mut app), 2);

        app.world_mut()
            .resource_mut::<SimModelResource>()
            .0
            .reset();
        app.update();
        assert_eq!(linked_entities(&mut app), 0);
        assert!(app.world().resource::<EntityMappings>().vehicles.is_empty());
    }

    #[test]
    fn test_set_base_color_leaves_matching_material_alone() {
        let mut materials = Assets::<StandardMaterial>::default();
        let handle = materials.add(wait_color(0));

        assert!(!set_base_color(&mut materials, &handle, wait_color(0)));

        let waited = wait_color(150);
        assert!(set_base_color(&mut materials, &handle, waited));
        assert_eq!(materials.get(&handle).map(|m| m.base_color), Some(waited));
        assert!(!set_base_color(&mut materials, &handle, waited));
    }
}
