//! Error types for the `twin_core` crate.

use bevy_ecs::prelude::Entity;

/// Errors raised while loading or validating a [`crate::config::TwinConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A field holds a value the simulation cannot run with.
    #[error("invalid configuration field `{field}`: {reason}")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The inter-arrival range is empty.
    #[error("inter-arrival range is empty: min {min} > max {max}")]
    EmptyArrivalRange {
        /// Lower bound (minutes).
        min: u64,
        /// Upper bound (minutes).
        max: u64,
    },

    /// The configuration file could not be read.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration document is not valid JSON for [`crate::config::TwinConfig`].
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors raised by the charger pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChargerError {
    /// The vehicle tried to release a slot it was never granted.
    #[error("vehicle {0:?} does not hold a charger slot")]
    NotHolding(Entity),

    /// The vehicle already holds or is already waiting for a slot.
    #[error("vehicle {0:?} already holds or awaits a charger slot")]
    AlreadyRequested(Entity),
}
