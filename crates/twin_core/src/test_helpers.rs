//! Test helpers for common test setup and utilities.
//!
//! Shared by unit tests and the integration tests under `tests/`.

use bevy_ecs::prelude::{Entity, World};

use crate::clock::{CurrentEvent, Event, EventKind, EventSubject, SimulationClock};
use crate::config::TwinConfig;
use crate::ecs::{Vehicle, VehiclePhase};
use crate::scenario::build_scenario;

/// Config used by most tests: defaults with a fixed seed.
pub fn test_config() -> TwinConfig {
    TwinConfig::default().with_seed(42)
}

/// World with every scenario resource inserted and nothing scheduled.
///
/// # Panics
///
/// Panics if `config` does not validate.
pub fn create_test_world(config: &TwinConfig) -> World {
    let mut world = World::new();
    build_scenario(&mut world, config).expect("test config should validate");
    world
}

/// Makes `kind` for `vehicle` the event being dispatched, at the clock's current time.
pub fn set_current_event(world: &mut World, kind: EventKind, vehicle: Option<Entity>) {
    let timestamp = world.resource::<SimulationClock>().now();
    world.insert_resource(CurrentEvent(Event {
        timestamp,
        seq: 0,
        kind,
        subject: vehicle.map(EventSubject::Vehicle),
    }));
}

/// Advances the clock to `timestamp` by scheduling and popping a marker event.
pub fn advance_clock_to(world: &mut World, timestamp: u64) {
    let mut clock = world.resource_mut::<SimulationClock>();
    clock.schedule_at(timestamp, EventKind::SimulationStarted, None);
    while clock.next_event_time().is_some_and(|t| t <= timestamp) {
        clock.pop_next();
    }
}

/// Builder for vehicle fixtures.
#[derive(Clone, Debug)]
pub struct VehicleBuilder {
    label: String,
    index: usize,
    capacity_kwh: f64,
    soc: f64,
    distance_km: f64,
    trip_km: f64,
    phase: VehiclePhase,
    charge_energy_kwh: f64,
}

impl Default for VehicleBuilder {
    fn default() -> Self {
        Self {
            label: "Seal-0".to_string(),
            index: 0,
            capacity_kwh: 85.0,
            soc: 0.9,
            distance_km: 0.0,
            trip_km: 98.0,
            phase: VehiclePhase::Driving,
            charge_energy_kwh: 0.0,
        }
    }
}

impl VehicleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: &str, index: usize) -> Self {
        self.label = label.to_string();
        self.index = index;
        self
    }

    pub fn with_soc(mut self, soc: f64) -> Self {
        self.soc = soc;
        self
    }

    pub fn with_distance(mut self, distance_km: f64, trip_km: f64) -> Self {
        self.distance_km = distance_km;
        self.trip_km = trip_km;
        self
    }

    pub fn with_phase(mut self, phase: VehiclePhase) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_charge_energy(mut self, kwh: f64) -> Self {
        self.charge_energy_kwh = kwh;
        self
    }

    pub fn build(self) -> Vehicle {
        let mut vehicle = Vehicle::new(self.label, self.index, self.capacity_kwh, self.soc, self.trip_km);
        vehicle.distance_km = self.distance_km;
        vehicle.phase = self.phase;
        vehicle.charge_energy_kwh = self.charge_energy_kwh;
        vehicle
    }

    /// Spawn the vehicle fixture into the provided world.
    pub fn spawn(self, world: &mut World) -> Entity {
        world.spawn(self.build()).id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_overrides() {
        let vehicle = VehicleBuilder::new()
            .with_label("Seal-4", 4)
            .with_soc(0.5)
            .with_distance(10.0, 20.0)
            .with_phase(VehiclePhase::AwaitingCharger)
            .build();
        assert_eq!(vehicle.label, "Seal-4");
        assert_eq!(vehicle.index, 4);
        assert!((vehicle.soc() - 0.5).abs() < 1e-12);
        assert_eq!(vehicle.distance_remaining_km(), 10.0);
        assert_eq!(vehicle.phase, VehiclePhase::AwaitingCharger);
    }

    #[test]
    fn advance_clock_moves_now() {
        let mut world = create_test_world(&test_config());
        advance_clock_to(&mut world, 5_000);
        assert_eq!(world.resource::<SimulationClock>().now(), 5_000);
        assert!(world.resource::<SimulationClock>().is_empty());
    }
}
