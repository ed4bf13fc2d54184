pub mod charger;
pub mod clock;
pub mod config;
pub mod distributions;
pub mod ecs;
pub mod error;
pub mod fuzzy;
pub mod physics;
pub mod runner;
pub mod scenario;
pub mod spawner;
pub mod systems;
pub mod telemetry;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
