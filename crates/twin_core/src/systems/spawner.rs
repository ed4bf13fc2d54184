//! Spawner systems: release vehicles onto the road at staggered times.

use bevy_ecs::prelude::{Commands, Res, ResMut};
use tracing::{debug, info};

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock, ONE_MIN_MS};
use crate::ecs::Vehicle;
use crate::spawner::TrafficGenerator;
use crate::telemetry::{SimTelemetry, TwinEvent};

fn spawn_next_vehicle(
    commands: &mut Commands,
    clock: &mut SimulationClock,
    generator: &mut TrafficGenerator,
    telemetry: &mut SimTelemetry,
) {
    let Some(index) = generator.next_index() else {
        return;
    };
    let now = clock.now();
    let template = &generator.template;
    let mut vehicle = Vehicle::new(
        template.label(index),
        index,
        template.capacity_kwh,
        template.initial_soc,
        template.trip_km,
    );
    vehicle.departed_at = now;

    info!(vehicle = %vehicle.label, soc = vehicle.soc(), at_ms = now, "vehicle departing");
    telemetry.record(TwinEvent::VehicleStarted {
        timestamp_ms: now,
        vehicle: vehicle.label.clone(),
        soc: vehicle.soc(),
    });

    let entity = commands.spawn(vehicle).id();
    // First step runs at departure time.
    clock.schedule_in(0, EventKind::DriveStep, Some(EventSubject::Vehicle(entity)));

    if let Some(delay_minutes) = generator.next_delay_minutes() {
        debug!(delay_minutes, "next departure scheduled");
        clock.schedule_in(
            delay_minutes.saturating_mul(ONE_MIN_MS),
            EventKind::SpawnVehicle,
            None,
        );
    }
}

pub fn simulation_started_system(
    mut commands: Commands,
    mut clock: ResMut<SimulationClock>,
    mut generator: ResMut<TrafficGenerator>,
    mut telemetry: ResMut<SimTelemetry>,
    event: Res<CurrentEvent>,
) {
    if event.0.kind != EventKind::SimulationStarted {
        return;
    }
    debug!(
        vehicles = generator.vehicle_count(),
        "simulation started"
    );
    spawn_next_vehicle(&mut commands, &mut clock, &mut generator, &mut telemetry);
}

pub fn vehicle_spawner_system(
    mut commands: Commands,
    mut clock: ResMut<SimulationClock>,
    mut generator: ResMut<TrafficGenerator>,
    mut telemetry: ResMut<SimTelemetry>,
    event: Res<CurrentEvent>,
) {
    if event.0.kind != EventKind::SpawnVehicle {
        return;
    }
    spawn_next_vehicle(&mut commands, &mut clock, &mut generator, &mut telemetry);
}
