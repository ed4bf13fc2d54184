use bevy_ecs::prelude::Component;
use serde::Serialize;

use crate::fuzzy::DrivingMode;

/// Lifecycle of a vehicle process.
///
/// `Driving` ends in either `Stranded` or `AwaitingCharger` (arrival);
/// `Stranded` and `Done` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VehiclePhase {
    Driving,
    Stranded,
    AwaitingCharger,
    Charging,
    Done,
}

impl VehiclePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, VehiclePhase::Stranded | VehiclePhase::Done)
    }
}

/// Digital twin of one electric vehicle on its trip.
#[derive(Debug, Clone, PartialEq, Component)]
pub struct Vehicle {
    pub label: String,
    /// Departure order (0 for the first vehicle).
    pub index: usize,
    pub capacity_kwh: f64,
    /// Remaining energy; only drops to or below zero on the step that strands the vehicle.
    pub battery_kwh: f64,
    /// Cumulative distance, never beyond `trip_km`.
    pub distance_km: f64,
    pub trip_km: f64,
    pub phase: VehiclePhase,
    /// Aggression chosen on the most recent step.
    pub aggression: f64,
    pub speed_kmh: f64,
    /// Energy requested from the charger on arrival (kWh).
    pub charge_energy_kwh: f64,
    pub departed_at: u64,
}

impl Vehicle {
    pub fn new(label: String, index: usize, capacity_kwh: f64, soc: f64, trip_km: f64) -> Self {
        Self {
            label,
            index,
            capacity_kwh,
            battery_kwh: capacity_kwh * soc,
            distance_km: 0.0,
            trip_km,
            phase: VehiclePhase::Driving,
            aggression: 1.0,
            speed_kmh: 0.0,
            charge_energy_kwh: 0.0,
            departed_at: 0,
        }
    }

    /// State of charge as a fraction, clamped to `[0, 1]`.
    pub fn soc(&self) -> f64 {
        if self.capacity_kwh <= 0.0 {
            return 0.0;
        }
        (self.battery_kwh / self.capacity_kwh).clamp(0.0, 1.0)
    }

    pub fn distance_remaining_km(&self) -> f64 {
        (self.trip_km - self.distance_km).max(0.0)
    }

    pub fn has_arrived(&self) -> bool {
        self.distance_km >= self.trip_km
    }

    pub fn mode(&self) -> DrivingMode {
        DrivingMode::from_aggression(self.aggression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soc_is_clamped() {
        let mut vehicle = Vehicle::new("Seal-0".to_string(), 0, 85.0, 0.9, 98.0);
        assert!((vehicle.soc() - 0.9).abs() < 1e-12);
        vehicle.battery_kwh = -3.0;
        assert_eq!(vehicle.soc(), 0.0);
        vehicle.battery_kwh = 100.0;
        assert_eq!(vehicle.soc(), 1.0);
    }

    #[test]
    fn terminal_phases() {
        assert!(VehiclePhase::Stranded.is_terminal());
        assert!(VehiclePhase::Done.is_terminal());
        assert!(!VehiclePhase::Charging.is_terminal());
        assert!(!VehiclePhase::AwaitingCharger.is_terminal());
    }
}
