//! Drive step system: one fuzzy decision and one step of travel per event.
//!
//! A vehicle whose previous step covered the remaining distance arrives on
//! its next wake-up and queues for a charger. A step that empties the
//! battery strands the vehicle on the spot.

use bevy_ecs::prelude::{Entity, Query, Res, ResMut};
use tracing::{debug, info, warn};

use crate::charger::{ChargerPool, ChargerRequest};
use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::ecs::{Vehicle, VehiclePhase};
use crate::physics::DrivingModel;
use crate::scenario::VehicleProcessConfig;
use crate::telemetry::{SimTelemetry, TwinEvent};

pub fn drive_step_system(
    mut clock: ResMut<SimulationClock>,
    mut pool: ResMut<ChargerPool>,
    mut telemetry: ResMut<SimTelemetry>,
    model: Res<DrivingModel>,
    process: Res<VehicleProcessConfig>,
    event: Res<CurrentEvent>,
    mut vehicles: Query<&mut Vehicle>,
) {
    if event.0.kind != EventKind::DriveStep {
        return;
    }
    let Some(entity) = event.0.vehicle() else {
        return;
    };
    let Ok(mut vehicle) = vehicles.get_mut(entity) else {
        return;
    };
    if vehicle.phase != VehiclePhase::Driving {
        debug!(vehicle = %vehicle.label, phase = ?vehicle.phase, "ignoring drive step");
        return;
    }

    let now = clock.now();
    if vehicle.has_arrived() {
        arrive(entity, &mut vehicle, now, &mut clock, &mut pool, &mut telemetry, &process);
        return;
    }

    let outcome = model.advance(&mut vehicle);
    let mode = outcome.decision.mode();

    if process.is_log_tick(now) {
        telemetry.record(TwinEvent::StepUpdate {
            timestamp_ms: now,
            vehicle: vehicle.label.clone(),
            soc: vehicle.soc(),
            speed_kmh: outcome.speed_kmh,
            mode,
        });
    }

    if vehicle.battery_kwh <= 0.0 {
        vehicle.phase = VehiclePhase::Stranded;
        info!(
            vehicle = %vehicle.label,
            distance_km = vehicle.distance_km,
            at_ms = now,
            "battery depleted, vehicle stranded"
        );
        telemetry.record(TwinEvent::Stranded {
            timestamp_ms: now,
            vehicle: vehicle.label.clone(),
            distance_km: vehicle.distance_km,
        });
        return;
    }

    clock.schedule_in(
        process.step_ms,
        EventKind::DriveStep,
        Some(EventSubject::Vehicle(entity)),
    );
}

fn arrive(
    entity: Entity,
    vehicle: &mut Vehicle,
    now: u64,
    clock: &mut SimulationClock,
    pool: &mut ChargerPool,
    telemetry: &mut SimTelemetry,
    process: &VehicleProcessConfig,
) {
    info!(vehicle = %vehicle.label, soc = vehicle.soc(), at_ms = now, "arrived at destination");
    telemetry.record(TwinEvent::Arrived {
        timestamp_ms: now,
        vehicle: vehicle.label.clone(),
        soc: vehicle.soc(),
    });

    let target_kwh = vehicle.capacity_kwh * process.target_soc;
    let needed_kwh = (target_kwh - vehicle.battery_kwh).max(0.0);
    vehicle.charge_energy_kwh = needed_kwh;
    if needed_kwh <= 0.0 {
        vehicle.phase = VehiclePhase::Done;
        debug!(vehicle = %vehicle.label, "already at target charge, skipping charger");
        return;
    }

    match pool.request(entity) {
        Ok(ChargerRequest::Granted) => {
            vehicle.phase = VehiclePhase::AwaitingCharger;
            clock.schedule_in(0, EventKind::ChargerGranted, Some(EventSubject::Vehicle(entity)));
        }
        Ok(ChargerRequest::Queued { position }) => {
            vehicle.phase = VehiclePhase::AwaitingCharger;
            debug!(vehicle = %vehicle.label, position, "all chargers busy, waiting");
        }
        Err(err) => {
            // Already in the pool: keep the existing slot or queue place.
            warn!(vehicle = %vehicle.label, error = %err, "charger request rejected");
            vehicle.phase = VehiclePhase::AwaitingCharger;
            if pool.is_holding(entity) {
                clock.schedule_in(0, EventKind::ChargerGranted, Some(EventSubject::Vehicle(entity)));
            }
        }
    }
}
