use bevy_ecs::prelude::{Query, Res, ResMut};
use tracing::{info, warn};

use crate::charger::ChargerPool;
use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::ecs::{Vehicle, VehiclePhase};
use crate::scenario::VehicleProcessConfig;
use crate::telemetry::{SimTelemetry, TwinEvent};

/// Resumes a vehicle that now holds a charger slot and plugs it in.
pub fn charger_granted_system(
    mut clock: ResMut<SimulationClock>,
    pool: Res<ChargerPool>,
    mut telemetry: ResMut<SimTelemetry>,
    process: Res<VehicleProcessConfig>,
    event: Res<CurrentEvent>,
    mut vehicles: Query<&mut Vehicle>,
) {
    if event.0.kind != EventKind::ChargerGranted {
        return;
    }
    let Some(entity) = event.0.vehicle() else {
        return;
    };
    let Ok(mut vehicle) = vehicles.get_mut(entity) else {
        return;
    };
    if vehicle.phase != VehiclePhase::AwaitingCharger || !pool.is_holding(entity) {
        warn!(vehicle = %vehicle.label, phase = ?vehicle.phase, "charger grant without a held slot");
        return;
    }

    let now = clock.now();
    let energy_kwh = vehicle.charge_energy_kwh;
    let duration_minutes = process.charge_minutes(energy_kwh);
    vehicle.phase = VehiclePhase::Charging;

    info!(
        vehicle = %vehicle.label,
        energy_kwh,
        duration_minutes,
        at_ms = now,
        "charging started"
    );
    telemetry.record(TwinEvent::ChargingStarted {
        timestamp_ms: now,
        vehicle: vehicle.label.clone(),
        energy_kwh,
        duration_minutes,
    });
    clock.schedule_in_mins(
        duration_minutes,
        EventKind::ChargeCompleted,
        Some(EventSubject::Vehicle(entity)),
    );
}

/// Unplugs a charged vehicle and passes its slot to the next waiter.
pub fn charge_completed_system(
    mut clock: ResMut<SimulationClock>,
    mut pool: ResMut<ChargerPool>,
    mut telemetry: ResMut<SimTelemetry>,
    event: Res<CurrentEvent>,
    mut vehicles: Query<&mut Vehicle>,
) {
    if event.0.kind != EventKind::ChargeCompleted {
        return;
    }
    let Some(entity) = event.0.vehicle() else {
        return;
    };
    let Ok(mut vehicle) = vehicles.get_mut(entity) else {
        return;
    };
    if vehicle.phase != VehiclePhase::Charging {
        warn!(vehicle = %vehicle.label, phase = ?vehicle.phase, "charge completion while not charging");
        return;
    }

    let now = clock.now();
    vehicle.battery_kwh += vehicle.charge_energy_kwh;
    vehicle.phase = VehiclePhase::Done;
    info!(vehicle = %vehicle.label, soc = vehicle.soc(), at_ms = now, "charging completed");
    telemetry.record(TwinEvent::ChargingCompleted {
        timestamp_ms: now,
        vehicle: vehicle.label.clone(),
    });

    match pool.release(entity) {
        Ok(Some(next)) => {
            clock.schedule_in(0, EventKind::ChargerGranted, Some(EventSubject::Vehicle(next)));
        }
        Ok(None) => {}
        Err(err) => {
            warn!(vehicle = %vehicle.label, error = %err, "charger release failed");
        }
    }
}
