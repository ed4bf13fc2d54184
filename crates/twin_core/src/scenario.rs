//! Scenario setup: turns a [`TwinConfig`] into world resources.

use bevy_ecs::prelude::{Resource, World};

use crate::charger::ChargerPool;
use crate::clock::SimulationClock;
use crate::config::TwinConfig;
use crate::distributions::UniformIntegerMinutes;
use crate::error::ConfigError;
use crate::physics::DrivingModel;
use crate::spawner::{TrafficGenerator, VehicleTemplate};
use crate::telemetry::SimTelemetry;

/// Events at or after this simulation time are not processed.
#[derive(Debug, Clone, Copy, Resource)]
pub struct SimulationEndTimeMs(pub u64);

/// Timing and charging parameters the vehicle process systems read.
#[derive(Debug, Clone, Copy, Resource)]
pub struct VehicleProcessConfig {
    pub step_ms: u64,
    pub log_interval_ms: u64,
    pub target_soc: f64,
    pub charging_power_kw: f64,
}

impl VehicleProcessConfig {
    pub fn from_config(config: &TwinConfig) -> Self {
        Self {
            step_ms: config.step_ms(),
            log_interval_ms: config.log_interval_ms(),
            target_soc: config.target_soc,
            charging_power_kw: config.charging_power_kw,
        }
    }

    /// Minutes a charger needs to deliver `energy_kwh`.
    pub fn charge_minutes(&self, energy_kwh: f64) -> f64 {
        energy_kwh / self.charging_power_kw * 60.0
    }

    pub fn is_log_tick(&self, now_ms: u64) -> bool {
        self.log_interval_ms > 0 && now_ms % self.log_interval_ms == 0
    }
}

/// Inserts every resource the vehicle processes need, without scheduling
/// anything. Validates `config` first.
pub fn build_scenario(world: &mut World, config: &TwinConfig) -> Result<(), ConfigError> {
    config.validate()?;

    world.insert_resource(SimulationClock::default());
    world.insert_resource(SimTelemetry::default());
    world.insert_resource(SimulationEndTimeMs(config.horizon_ms()));
    world.insert_resource(ChargerPool::new(config.charger_slots));
    world.insert_resource(DrivingModel::new(
        config.base_consumption_kwh_per_km,
        config.step_minutes,
    ));
    world.insert_resource(VehicleProcessConfig::from_config(config));
    world.insert_resource(TrafficGenerator::new(
        VehicleTemplate {
            label_prefix: config.label_prefix.clone(),
            capacity_kwh: config.battery_capacity_kwh,
            initial_soc: config.initial_soc,
            trip_km: config.trip_distance_km,
        },
        Box::new(UniformIntegerMinutes::new(
            config.inter_arrival_min_minutes,
            config.inter_arrival_max_minutes,
            config.seed,
        )),
        config.vehicle_count,
    ));
    Ok(())
}
