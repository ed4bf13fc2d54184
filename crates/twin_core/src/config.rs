//! Simulation configuration: vehicle, charger and scenario parameters.
//!
//! Defaults reproduce the reference trip: a BYD Seal (85 kWh) driving 98 km
//! from Mexico City to Pachuca, three vehicles sharing two DC chargers.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::clock::{minutes_to_ms, ONE_MIN_MS};
use crate::error::ConfigError;

/// Largest inter-arrival delay whose millisecond value fits in the clock.
pub const MAX_INTER_ARRIVAL_MINUTES: u64 = u64::MAX / ONE_MIN_MS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwinConfig {
    /// Usable battery capacity (kWh).
    pub battery_capacity_kwh: f64,
    /// Consumption at 80 km/h (kWh/km); scales with the square of speed.
    pub base_consumption_kwh_per_km: f64,
    /// DC charging power (kW).
    pub charging_power_kw: f64,
    /// State of charge every vehicle starts with (fraction).
    pub initial_soc: f64,
    pub trip_distance_km: f64,
    /// Length of one driving step (minutes).
    pub step_minutes: f64,
    pub charger_slots: usize,
    /// Events at or after this time are never processed (minutes).
    pub horizon_minutes: f64,
    pub vehicle_count: usize,
    /// Inclusive bounds of the delay between vehicle departures (minutes).
    pub inter_arrival_min_minutes: u64,
    pub inter_arrival_max_minutes: u64,
    /// State of charge vehicles charge up to on arrival (fraction).
    pub target_soc: f64,
    /// Step updates are emitted when the clock is a multiple of this (minutes).
    pub log_interval_minutes: f64,
    pub label_prefix: String,
    /// RNG seed for departure staggering; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for TwinConfig {
    fn default() -> Self {
        Self {
            battery_capacity_kwh: 85.0,
            base_consumption_kwh_per_km: 0.190,
            charging_power_kw: 180.0,
            initial_soc: 0.90,
            trip_distance_km: 98.0,
            step_minutes: 2.0,
            charger_slots: 2,
            horizon_minutes: 300.0,
            vehicle_count: 3,
            inter_arrival_min_minutes: 5,
            inter_arrival_max_minutes: 15,
            target_soc: 0.85,
            log_interval_minutes: 20.0,
            label_prefix: "Seal".to_string(),
            seed: None,
        }
    }
}

impl TwinConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_vehicle_count(mut self, count: usize) -> Self {
        self.vehicle_count = count;
        self
    }

    pub fn with_charger_slots(mut self, slots: usize) -> Self {
        self.charger_slots = slots;
        self
    }

    pub fn with_horizon_minutes(mut self, minutes: f64) -> Self {
        self.horizon_minutes = minutes;
        self
    }

    /// Delay between departures, drawn uniformly from `min..=max` minutes.
    pub fn with_inter_arrival_minutes(mut self, min: u64, max: u64) -> Self {
        self.inter_arrival_min_minutes = min;
        self.inter_arrival_max_minutes = max;
        self
    }

    pub fn with_trip_distance_km(mut self, km: f64) -> Self {
        self.trip_distance_km = km;
        self
    }

    pub fn with_base_consumption(mut self, kwh_per_km: f64) -> Self {
        self.base_consumption_kwh_per_km = kwh_per_km;
        self
    }

    pub fn with_initial_soc(mut self, soc: f64) -> Self {
        self.initial_soc = soc;
        self
    }

    pub fn with_target_soc(mut self, soc: f64) -> Self {
        self.target_soc = soc;
        self
    }

    pub fn with_log_interval_minutes(mut self, minutes: f64) -> Self {
        self.log_interval_minutes = minutes;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Rejects configurations the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("battery_capacity_kwh", self.battery_capacity_kwh)?;
        positive("base_consumption_kwh_per_km", self.base_consumption_kwh_per_km)?;
        positive("charging_power_kw", self.charging_power_kw)?;
        positive("trip_distance_km", self.trip_distance_km)?;
        positive("horizon_minutes", self.horizon_minutes)?;
        fraction("initial_soc", self.initial_soc)?;
        fraction("target_soc", self.target_soc)?;

        if self.step_ms() == 0 {
            return Err(ConfigError::invalid(
                "step_minutes",
                format!("must be at least one millisecond, got {}", self.step_minutes),
            ));
        }
        if self.log_interval_ms() == 0 {
            return Err(ConfigError::invalid(
                "log_interval_minutes",
                format!(
                    "must be at least one millisecond, got {}",
                    self.log_interval_minutes
                ),
            ));
        }
        if self.charger_slots == 0 {
            return Err(ConfigError::invalid(
                "charger_slots",
                "at least one charger slot is required",
            ));
        }
        if self.inter_arrival_min_minutes > self.inter_arrival_max_minutes {
            return Err(ConfigError::EmptyArrivalRange {
                min: self.inter_arrival_min_minutes,
                max: self.inter_arrival_max_minutes,
            });
        }
        if self.inter_arrival_max_minutes > MAX_INTER_ARRIVAL_MINUTES {
            return Err(ConfigError::invalid(
                "inter_arrival_max_minutes",
                format!(
                    "must be at most {MAX_INTER_ARRIVAL_MINUTES} minutes, got {}",
                    self.inter_arrival_max_minutes
                ),
            ));
        }
        if self.label_prefix.trim().is_empty() {
            return Err(ConfigError::invalid("label_prefix", "must not be empty"));
        }
        Ok(())
    }

    pub fn step_ms(&self) -> u64 {
        minutes_to_ms(self.step_minutes)
    }

    pub fn horizon_ms(&self) -> u64 {
        minutes_to_ms(self.horizon_minutes)
    }

    pub fn log_interval_ms(&self) -> u64 {
        minutes_to_ms(self.log_interval_minutes)
    }

    pub fn initial_energy_kwh(&self) -> f64 {
        self.battery_capacity_kwh * self.initial_soc
    }

    pub fn target_energy_kwh(&self) -> f64 {
        self.battery_capacity_kwh * self.target_soc
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("must be a positive number, got {value}"),
        ))
    }
}

fn fraction(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("must be within [0, 1], got {value}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ONE_MIN_MS;

    #[test]
    fn defaults_are_valid() {
        let config = TwinConfig::default();
        config.validate().expect("defaults validate");
        assert_eq!(config.step_ms(), 2 * ONE_MIN_MS);
        assert_eq!(config.horizon_ms(), 300 * ONE_MIN_MS);
        assert!((config.initial_energy_kwh() - 76.5).abs() < 1e-9);
    }

    #[test]
    fn rejects_zero_chargers() {
        let err = TwinConfig::default()
            .with_charger_slots(0)
            .validate()
            .expect_err("zero chargers");
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                field: "charger_slots",
                ..
            }
        ));
    }

    #[test]
    fn rejects_negative_and_non_finite_quantities() {
        let mut config = TwinConfig::default();
        config.battery_capacity_kwh = -1.0;
        assert!(config.validate().is_err());

        let mut config = TwinConfig::default();
        config.charging_power_kw = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = TwinConfig::default();
        config.step_minutes = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_fractions_outside_unit_interval() {
        assert!(TwinConfig::default().with_initial_soc(1.2).validate().is_err());
        assert!(TwinConfig::default().with_target_soc(-0.1).validate().is_err());
    }

    #[test]
    fn rejects_empty_arrival_range() {
        let err = TwinConfig::default()
            .with_inter_arrival_minutes(10, 5)
            .validate()
            .expect_err("empty range");
        assert!(matches!(
            err,
            ConfigError::EmptyArrivalRange { min: 10, max: 5 }
        ));
    }

    #[test]
    fn rejects_inter_arrival_beyond_clock_range() {
        let too_long = MAX_INTER_ARRIVAL_MINUTES + 1;
        let err = TwinConfig::default()
            .with_inter_arrival_minutes(too_long, too_long)
            .validate()
            .expect_err("delay overflows milliseconds");
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                field: "inter_arrival_max_minutes",
                ..
            }
        ));

        TwinConfig::default()
            .with_inter_arrival_minutes(0, MAX_INTER_ARRIVAL_MINUTES)
            .validate()
            .expect("largest representable delay");
    }

    #[test]
    fn json_overrides_merge_with_defaults() {
        let config = TwinConfig::from_json_str(r#"{ "charger_slots": 1, "seed": 7 }"#)
            .expect("parse config");
        assert_eq!(config.charger_slots, 1);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.trip_distance_km, 98.0);
    }

    #[test]
    fn json_with_invalid_values_is_rejected() {
        let err = TwinConfig::from_json_str(r#"{ "vehicle_count": 2, "target_soc": 3.0 }"#)
            .expect_err("invalid target");
        assert!(matches!(err, ConfigError::InvalidField { field: "target_soc", .. }));
        let err = TwinConfig::from_json_str("{ not json").expect_err("parse error");
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
