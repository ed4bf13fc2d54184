//! Per-step vehicle dynamics: speed from aggression, quadratic drag on
//! consumption, distance clamped to the trip.

use bevy_ecs::prelude::Resource;

use crate::ecs::Vehicle;
use crate::fuzzy::{self, FuzzyDecision};

/// Speed at aggression 0.
pub const BASE_SPEED_KMH: f64 = 60.0;
/// Extra speed at aggression 1.
pub const SPEED_RANGE_KMH: f64 = 50.0;
/// Speed at which consumption equals the base consumption.
pub const REFERENCE_SPEED_KMH: f64 = 80.0;

pub fn speed_for_aggression(aggression: f64) -> f64 {
    BASE_SPEED_KMH + SPEED_RANGE_KMH * aggression
}

/// Consumption multiplier; air resistance grows with the square of speed.
pub fn consumption_factor(speed_kmh: f64) -> f64 {
    (speed_kmh / REFERENCE_SPEED_KMH).powi(2)
}

/// Result of one driving step, before it is applied to the vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveStepOutcome {
    pub decision: FuzzyDecision,
    pub speed_kmh: f64,
    pub consumption_kwh_per_km: f64,
    pub distance_km: f64,
    pub energy_kwh: f64,
}

#[derive(Debug, Clone, Copy, Resource)]
pub struct DrivingModel {
    pub base_consumption_kwh_per_km: f64,
    pub step_minutes: f64,
}

impl DrivingModel {
    pub fn new(base_consumption_kwh_per_km: f64, step_minutes: f64) -> Self {
        Self {
            base_consumption_kwh_per_km,
            step_minutes,
        }
    }

    pub fn plan_step(&self, vehicle: &Vehicle) -> DriveStepOutcome {
        let decision = fuzzy::infer(vehicle.soc(), vehicle.distance_remaining_km());
        let speed_kmh = speed_for_aggression(decision.aggression);
        let consumption_kwh_per_km =
            self.base_consumption_kwh_per_km * consumption_factor(speed_kmh);

        let full_step_km = speed_kmh * self.step_minutes / 60.0;
        let distance_km = full_step_km.min(vehicle.distance_remaining_km());

        DriveStepOutcome {
            decision,
            speed_kmh,
            consumption_kwh_per_km,
            distance_km,
            energy_kwh: distance_km * consumption_kwh_per_km,
        }
    }

    /// Plans and applies one step to `vehicle`.
    pub fn advance(&self, vehicle: &mut Vehicle) -> DriveStepOutcome {
        let outcome = self.plan_step(vehicle);
        vehicle.distance_km = (vehicle.distance_km + outcome.distance_km).min(vehicle.trip_km);
        vehicle.battery_kwh -= outcome.energy_kwh;
        vehicle.aggression = outcome.decision.aggression;
        vehicle.speed_kmh = outcome.speed_kmh;
        outcome
    }
}
