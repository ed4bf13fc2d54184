//! Performance benchmarks for twin_core using Criterion.rs.

use bevy_ecs::prelude::World;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use twin_core::config::TwinConfig;
use twin_core::fuzzy::calculate_aggression;
use twin_core::runner::{initialize_simulation, run_until_empty, simulation_schedule};
use twin_core::scenario::build_scenario;

fn bench_simulation_run(c: &mut Criterion) {
    let scenarios = vec![("small", 3, 2), ("medium", 50, 5), ("large", 500, 20)];

    let mut group = c.benchmark_group("simulation_run");
    for (name, vehicles, chargers) in scenarios {
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &(vehicles, chargers),
            |b, &(vehicles, chargers)| {
                b.iter(|| {
                    let config = TwinConfig::default()
                        .with_seed(42)
                        .with_vehicle_count(vehicles)
                        .with_charger_slots(chargers)
                        .with_inter_arrival_minutes(0, 2)
                        .with_horizon_minutes(24.0 * 60.0);
                    let mut world = World::new();
                    build_scenario(&mut world, &config).expect("bench config");
                    initialize_simulation(&mut world);
                    let mut schedule = simulation_schedule();
                    black_box(run_until_empty(&mut world, &mut schedule, 1_000_000));
                });
            },
        );
    }
    group.finish();
}

fn bench_fuzzy_inference(c: &mut Criterion) {
    let grid: Vec<(f64, f64)> = (0..=100)
        .flat_map(|soc| (0..=120).map(move |km| (soc as f64 / 100.0, km as f64)))
        .collect();

    c.bench_function("fuzzy_aggression_grid", |b| {
        b.iter(|| {
            for &(soc, km) in &grid {
                black_box(calculate_aggression(black_box(soc), black_box(km)));
            }
        });
    });
}

criterion_group!(benches, bench_simulation_run, bench_fuzzy_inference);
criterion_main!(benches);
