//! Structured event stream emitted by the vehicle processes.
//!
//! Rendering is left to an [`EventSink`]; the core never formats output.

use bevy_ecs::prelude::Resource;
use serde::Serialize;

use crate::clock::ms_to_minutes;
use crate::ecs::VehiclePhase;
use crate::fuzzy::DrivingMode;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TwinEvent {
    VehicleStarted {
        timestamp_ms: u64,
        vehicle: String,
        soc: f64,
    },
    StepUpdate {
        timestamp_ms: u64,
        vehicle: String,
        soc: f64,
        speed_kmh: f64,
        mode: DrivingMode,
    },
    Stranded {
        timestamp_ms: u64,
        vehicle: String,
        distance_km: f64,
    },
    Arrived {
        timestamp_ms: u64,
        vehicle: String,
        soc: f64,
    },
    ChargingStarted {
        timestamp_ms: u64,
        vehicle: String,
        energy_kwh: f64,
        duration_minutes: f64,
    },
    ChargingCompleted {
        timestamp_ms: u64,
        vehicle: String,
    },
}

impl TwinEvent {
    pub fn timestamp_ms(&self) -> u64 {
        match self {
            TwinEvent::VehicleStarted { timestamp_ms, .. }
            | TwinEvent::StepUpdate { timestamp_ms, .. }
            | TwinEvent::Stranded { timestamp_ms, .. }
            | TwinEvent::Arrived { timestamp_ms, .. }
            | TwinEvent::ChargingStarted { timestamp_ms, .. }
            | TwinEvent::ChargingCompleted { timestamp_ms, .. } => *timestamp_ms,
        }
    }

    pub fn minutes(&self) -> f64 {
        ms_to_minutes(self.timestamp_ms())
    }

    pub fn vehicle(&self) -> &str {
        match self {
            TwinEvent::VehicleStarted { vehicle, .. }
            | TwinEvent::StepUpdate { vehicle, .. }
            | TwinEvent::Stranded { vehicle, .. }
            | TwinEvent::Arrived { vehicle, .. }
            | TwinEvent::ChargingStarted { vehicle, .. }
            | TwinEvent::ChargingCompleted { vehicle, .. } => vehicle,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TwinEvent::VehicleStarted { .. } => "vehicle_started",
            TwinEvent::StepUpdate { .. } => "step_update",
            TwinEvent::Stranded { .. } => "stranded",
            TwinEvent::Arrived { .. } => "arrived",
            TwinEvent::ChargingStarted { .. } => "charging_started",
            TwinEvent::ChargingCompleted { .. } => "charging_completed",
        }
    }
}

/// Collects the event stream. Insert as a resource; systems append to it.
#[derive(Debug, Default, Resource)]
pub struct SimTelemetry {
    pub events: Vec<TwinEvent>,
    pub vehicles_started: usize,
    pub vehicles_stranded: usize,
    pub vehicles_arrived: usize,
    pub charges_completed: usize,
}

impl SimTelemetry {
    pub fn record(&mut self, event: TwinEvent) {
        match &event {
            TwinEvent::VehicleStarted { .. } => self.vehicles_started += 1,
            TwinEvent::Stranded { .. } => self.vehicles_stranded += 1,
            TwinEvent::Arrived { .. } => self.vehicles_arrived += 1,
            TwinEvent::ChargingCompleted { .. } => self.charges_completed += 1,
            TwinEvent::StepUpdate { .. } | TwinEvent::ChargingStarted { .. } => {}
        }
        self.events.push(event);
    }

    pub fn events_for<'a>(&'a self, vehicle: &'a str) -> impl Iterator<Item = &'a TwinEvent> + 'a {
        self.events.iter().filter(move |e| e.vehicle() == vehicle)
    }
}

/// Consumer of the event stream (printer, file writer, test collector).
pub trait EventSink {
    fn emit(&mut self, event: &TwinEvent);
}

impl EventSink for Vec<TwinEvent> {
    fn emit(&mut self, event: &TwinEvent) {
        self.push(event.clone());
    }
}

/// Adapts a closure into an [`EventSink`].
pub struct FnSink<F>(pub F);

impl<F> EventSink for FnSink<F>
where
    F: FnMut(&TwinEvent),
{
    fn emit(&mut self, event: &TwinEvent) {
        (self.0)(event)
    }
}

/// Final state of one vehicle when the run stopped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleSummary {
    pub label: String,
    pub phase: VehiclePhase,
    pub soc: f64,
    pub distance_km: f64,
}

/// Everything a finished run produced.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub events: Vec<TwinEvent>,
    pub final_time_ms: u64,
    pub steps: usize,
    pub vehicles: Vec<VehicleSummary>,
    pub charger_peak_in_use: usize,
    /// The step limit stopped the run while events before the horizon were still queued.
    pub truncated: bool,
}

impl SimulationReport {
    pub fn vehicle(&self, label: &str) -> Option<&VehicleSummary> {
        self.vehicles.iter().find(|v| v.label == label)
    }

    pub fn count(&self, name: &str) -> usize {
        self.events.iter().filter(|e| e.name() == name).count()
    }
}
