//! Run the default three-Seal convoy and print the event log.
//!
//! Run with: cargo run -p twin_core --example seal_trip

use twin_core::clock::ms_to_minutes;
use twin_core::config::TwinConfig;
use twin_core::runner::run_simulation;
use twin_core::telemetry::TwinEvent;

fn main() {
    const SEED: u64 = 42;

    let config = TwinConfig::default().with_seed(SEED);
    let report = match run_simulation(&config) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            std::process::exit(1);
        }
    };

    println!(
        "--- Seal convoy ({} vehicles, {} chargers, seed {}) ---",
        config.vehicle_count, config.charger_slots, SEED
    );
    for event in &report.events {
        let at = event.minutes();
        match event {
            TwinEvent::VehicleStarted { vehicle, soc, .. } => {
                println!("[{at:6.1}] {vehicle} departs with {:.1}%", soc * 100.0)
            }
            TwinEvent::StepUpdate {
                vehicle,
                soc,
                speed_kmh,
                mode,
                ..
            } => println!(
                "[{at:6.1}] {vehicle} soc {:.1}% at {speed_kmh:.0} km/h ({mode})",
                soc * 100.0
            ),
            TwinEvent::Stranded {
                vehicle,
                distance_km,
                ..
            } => println!("[{at:6.1}] {vehicle} stranded at km {distance_km:.1}"),
            TwinEvent::Arrived { vehicle, soc, .. } => {
                println!("[{at:6.1}] {vehicle} arrived with {:.1}%", soc * 100.0)
            }
            TwinEvent::ChargingStarted {
                vehicle,
                energy_kwh,
                duration_minutes,
                ..
            } => println!(
                "[{at:6.1}] {vehicle} charging {energy_kwh:.2} kWh for {duration_minutes:.1} min"
            ),
            TwinEvent::ChargingCompleted { vehicle, .. } => {
                println!("[{at:6.1}] {vehicle} fully charged")
            }
        }
    }
    println!(
        "Steps executed: {}, final time {:.1} min, peak chargers in use {}",
        report.steps,
        ms_to_minutes(report.final_time_ms),
        report.charger_peak_in_use
    );
}
