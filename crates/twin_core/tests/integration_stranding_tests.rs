mod support;

use twin_core::charger::ChargerPool;
use twin_core::clock::SimulationClock;
use twin_core::config::TwinConfig;
use twin_core::ecs::VehiclePhase;
use twin_core::fuzzy::DrivingMode;
use twin_core::runner::run_simulation;
use twin_core::telemetry::TwinEvent;
use support::harness::TwinHarness;
use support::world::vehicles;

/// A consumption high enough that even survival speed cannot cover 98 km.
fn thirsty_config() -> TwinConfig {
    TwinConfig::default()
        .with_seed(8)
        .with_vehicle_count(1)
        .with_base_consumption(1.0)
}

#[test]
fn depleted_vehicle_strands_before_destination() {
    let report = run_simulation(&thirsty_config()).expect("run");

    assert_eq!(report.count("stranded"), 1);
    assert_eq!(report.count("arrived"), 0);
    assert_eq!(report.count("charging_started"), 0);

    let stranded = report
        .events
        .iter()
        .find_map(|e| match e {
            TwinEvent::Stranded { distance_km, .. } => Some(*distance_km),
            _ => None,
        })
        .expect("stranded event");
    assert!(stranded < 98.0);
    assert!(stranded > 0.0);

    let summary = &report.vehicles[0];
    assert_eq!(summary.phase, VehiclePhase::Stranded);
    assert_eq!(summary.soc, 0.0);
    assert_eq!(report.charger_peak_in_use, 0);
}

#[test]
fn stranded_vehicle_leaves_nothing_scheduled() {
    let mut harness = TwinHarness::start(&thirsty_config());
    harness.drain();
    let world = &mut harness.world;

    let (entity, vehicle) = vehicles(world).remove(0);
    assert_eq!(vehicle.phase, VehiclePhase::Stranded);
    let clock = world.resource::<SimulationClock>();
    assert!(!clock.has_pending_for(entity));
    assert!(clock.is_empty());
    assert_eq!(world.resource::<ChargerPool>().total_grants(), 0);
}

#[test]
fn controller_backs_off_as_the_battery_drains() {
    let config = thirsty_config().with_log_interval_minutes(2.0);
    let report = run_simulation(&config).expect("run");

    let modes: Vec<DrivingMode> = report
        .events
        .iter()
        .filter_map(|e| match e {
            TwinEvent::StepUpdate { mode, .. } => Some(*mode),
            _ => None,
        })
        .collect();
    assert_eq!(modes.first(), Some(&DrivingMode::Sport));
    assert!(modes.contains(&DrivingMode::Eco) || modes.contains(&DrivingMode::Survival));
}
