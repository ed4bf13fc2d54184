#![allow(dead_code)]

use bevy_ecs::prelude::{Entity, World};
use twin_core::config::TwinConfig;
use twin_core::ecs::Vehicle;
use twin_core::runner::initialize_simulation;
use twin_core::scenario::build_scenario;
use twin_core::telemetry::{SimTelemetry, TwinEvent};

/// Seeded world with the start event already scheduled.
pub fn started_world(config: &TwinConfig) -> World {
    let mut world = World::new();
    build_scenario(&mut world, config).expect("scenario config should validate");
    initialize_simulation(&mut world);
    world
}

/// Vehicles ordered by spawn index.
pub fn vehicles(world: &mut World) -> Vec<(Entity, Vehicle)> {
    let mut vehicles: Vec<(Entity, Vehicle)> = world
        .query::<(Entity, &Vehicle)>()
        .iter(world)
        .map(|(entity, vehicle)| (entity, vehicle.clone()))
        .collect();
    vehicles.sort_by_key(|(_, v)| v.index);
    vehicles
}

pub fn events(world: &World) -> Vec<TwinEvent> {
    world.resource::<SimTelemetry>().events.clone()
}

/// Timestamps of every event named `name`, in emission order.
pub fn timestamps_of(events: &[TwinEvent], name: &str) -> Vec<(String, u64)> {
    events
        .iter()
        .filter(|e| e.name() == name)
        .map(|e| (e.vehicle().to_string(), e.timestamp_ms()))
        .collect()
}
