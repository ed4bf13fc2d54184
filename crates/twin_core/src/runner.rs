//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Clock progression and event routing happen here, outside systems. Each step
//! pops the next event from [SimulationClock], inserts it as [CurrentEvent],
//! then runs the schedule. Only one logical process runs per step, so the
//! charger pool and the clock are never observed half-updated.

use bevy_ecs::prelude::Res;
use bevy_ecs::prelude::{Schedule, World};
use bevy_ecs::schedule::{apply_deferred, IntoSystemConfigs};
use tracing::{debug, info, warn};

use crate::charger::ChargerPool;
use crate::clock::{ms_to_minutes, CurrentEvent, Event, EventKind, SimulationClock};
use crate::config::TwinConfig;
use crate::ecs::Vehicle;
use crate::error::ConfigError;
use crate::scenario::{build_scenario, SimulationEndTimeMs};
use crate::systems::{
    charging::{charge_completed_system, charger_granted_system},
    drive::drive_step_system,
    spawner::{simulation_started_system, vehicle_spawner_system},
};
use crate::telemetry::{EventSink, SimTelemetry, SimulationReport, TwinEvent, VehicleSummary};

/// Upper bound on processed events for one run; the horizon normally stops a run long before.
pub const MAX_SIMULATION_STEPS: usize = 1_000_000;

// Condition functions for each event kind
fn is_simulation_started(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::SimulationStarted)
        .unwrap_or(false)
}

fn is_spawn_vehicle(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::SpawnVehicle)
        .unwrap_or(false)
}

fn is_drive_step(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::DriveStep)
        .unwrap_or(false)
}

fn is_charger_granted(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::ChargerGranted)
        .unwrap_or(false)
}

fn is_charge_completed(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::ChargeCompleted)
        .unwrap_or(false)
}

/// Pops the next event unless the queue is empty or the event lies at or
/// past [SimulationEndTimeMs] (when that resource is present).
fn pop_within_horizon(world: &mut World) -> Option<Event> {
    let stop_at = world.get_resource::<SimulationEndTimeMs>().map(|e| e.0);
    let next_ts = world
        .get_resource::<SimulationClock>()
        .and_then(|c| c.next_event_time());
    if let (Some(end_ms), Some(ts)) = (stop_at, next_ts) {
        if ts >= end_ms {
            return None;
        }
    }

    let event = world.get_resource_mut::<SimulationClock>()?.pop_next()?;
    debug!(
        at_ms = event.timestamp,
        seq = event.seq,
        kind = ?event.kind,
        "dispatching event"
    );
    world.insert_resource(CurrentEvent(event));
    Some(event)
}

/// Runs one simulation step: pops the next event, inserts it as [CurrentEvent], then runs the schedule.
/// Returns `true` if an event was processed, `false` if the clock was empty or if the next event
/// is at or past [SimulationEndTimeMs] (when that resource is present).
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> bool {
    if pop_within_horizon(world).is_none() {
        return false;
    }
    schedule.run(world);
    true
}

/// Runs one simulation step and invokes `hook` after the schedule completes.
pub fn run_next_event_with_hook<F>(world: &mut World, schedule: &mut Schedule, mut hook: F) -> bool
where
    F: FnMut(&World, &Event),
{
    let Some(event) = pop_within_horizon(world) else {
        return false;
    };
    schedule.run(world);
    hook(world, &event);
    true
}

/// Runs simulation steps until the event queue is empty (or the horizon is
/// reached) or `max_steps` is reached. Returns the number of steps executed.
pub fn run_until_empty(world: &mut World, schedule: &mut Schedule, max_steps: usize) -> usize {
    let mut steps = 0;
    while steps < max_steps && run_next_event(world, schedule) {
        steps += 1;
    }
    steps
}

/// Runs simulation steps until empty and invokes `hook` after each step.
pub fn run_until_empty_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    max_steps: usize,
    mut hook: F,
) -> usize
where
    F: FnMut(&World, &Event),
{
    let mut steps = 0;
    while steps < max_steps && run_next_event_with_hook(world, schedule, &mut hook) {
        steps += 1;
    }
    steps
}

/// Builds the simulation schedule: one system per event kind plus
/// [apply_deferred] so spawned vehicles exist before their first step.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();

    schedule.add_systems((
        // SimulationStarted
        simulation_started_system.run_if(is_simulation_started),
        // SpawnVehicle
        vehicle_spawner_system.run_if(is_spawn_vehicle),
        // DriveStep
        drive_step_system.run_if(is_drive_step),
        // ChargerGranted
        charger_granted_system.run_if(is_charger_granted),
        // ChargeCompleted
        charge_completed_system.run_if(is_charge_completed),
        apply_deferred,
    ));

    schedule
}

/// Initializes the simulation by scheduling the SimulationStarted event at time 0.
/// Call this after building the scenario and before running events.
pub fn initialize_simulation(world: &mut World) {
    let mut clock = world.resource_mut::<SimulationClock>();
    clock.schedule_at(0, EventKind::SimulationStarted, None);
}

struct DiscardSink;

impl EventSink for DiscardSink {
    fn emit(&mut self, _event: &TwinEvent) {}
}

/// Runs one full simulation to the configured horizon.
pub fn run_simulation(config: &TwinConfig) -> Result<SimulationReport, ConfigError> {
    run_simulation_with_sink(config, &mut DiscardSink)
}

/// Runs one full simulation, streaming every event to `sink` as soon as the
/// step that produced it completes.
pub fn run_simulation_with_sink<S>(
    config: &TwinConfig,
    sink: &mut S,
) -> Result<SimulationReport, ConfigError>
where
    S: EventSink + ?Sized,
{
    run_with_step_limit(config, sink, MAX_SIMULATION_STEPS)
}

fn run_with_step_limit<S>(
    config: &TwinConfig,
    sink: &mut S,
    max_steps: usize,
) -> Result<SimulationReport, ConfigError>
where
    S: EventSink + ?Sized,
{
    let mut world = World::new();
    build_scenario(&mut world, config)?;
    initialize_simulation(&mut world);
    info!(
        vehicles = config.vehicle_count,
        chargers = config.charger_slots,
        horizon_minutes = config.horizon_minutes,
        seed = ?config.seed,
        "simulation starting"
    );

    let mut schedule = simulation_schedule();
    let mut emitted = 0;
    let steps = run_until_empty_with_hook(
        &mut world,
        &mut schedule,
        max_steps,
        |world, _event| {
            let telemetry = world.resource::<SimTelemetry>();
            for event in &telemetry.events[emitted..] {
                sink.emit(event);
            }
            emitted = telemetry.events.len();
        },
    );

    let report = collect_report(&mut world, steps);
    if report.truncated {
        warn!(
            steps,
            final_minutes = ms_to_minutes(report.final_time_ms),
            horizon_minutes = config.horizon_minutes,
            "step limit reached before the horizon, run truncated"
        );
    }
    info!(
        steps,
        final_minutes = ms_to_minutes(report.final_time_ms),
        events = report.events.len(),
        "simulation finished"
    );
    Ok(report)
}

/// Gathers telemetry and per-vehicle state from a finished world.
///
/// The report is marked truncated when an event before the horizon (any
/// event, without a horizon) is still queued.
pub fn collect_report(world: &mut World, steps: usize) -> SimulationReport {
    let horizon = world.get_resource::<SimulationEndTimeMs>().map(|e| e.0);
    let truncated = world
        .resource::<SimulationClock>()
        .next_event_time()
        .is_some_and(|ts| horizon.map_or(true, |end| ts < end));

    let mut vehicles: Vec<(usize, VehicleSummary)> = world
        .query::<&Vehicle>()
        .iter(world)
        .map(|v| {
            (
                v.index,
                VehicleSummary {
                    label: v.label.clone(),
                    phase: v.phase,
                    soc: v.soc(),
                    distance_km: v.distance_km,
                },
            )
        })
        .collect();
    vehicles.sort_by_key(|(index, _)| *index);

    SimulationReport {
        events: world.resource::<SimTelemetry>().events.clone(),
        final_time_ms: world.resource::<SimulationClock>().now(),
        steps,
        vehicles: vehicles.into_iter().map(|(_, summary)| summary).collect(),
        charger_peak_in_use: world.resource::<ChargerPool>().peak_in_use(),
        truncated,
    }
}
