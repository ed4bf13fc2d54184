//! Traffic generator: releases a fixed number of vehicles onto the road,
//! staggered by an inter-arrival distribution.

use bevy_ecs::prelude::Resource;

use crate::distributions::InterArrivalDistribution;

/// Vehicle template shared by every spawned vehicle.
#[derive(Debug, Clone)]
pub struct VehicleTemplate {
    pub label_prefix: String,
    pub capacity_kwh: f64,
    pub initial_soc: f64,
    pub trip_km: f64,
}

impl VehicleTemplate {
    pub fn label(&self, index: usize) -> String {
        format!("{}-{}", self.label_prefix, index)
    }
}

#[derive(Debug, Resource)]
pub struct TrafficGenerator {
    pub template: VehicleTemplate,
    inter_arrival: Box<dyn InterArrivalDistribution>,
    vehicle_count: usize,
    spawned: usize,
}

impl TrafficGenerator {
    pub fn new(
        template: VehicleTemplate,
        inter_arrival: Box<dyn InterArrivalDistribution>,
        vehicle_count: usize,
    ) -> Self {
        Self {
            template,
            inter_arrival,
            vehicle_count,
            spawned: 0,
        }
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicle_count
    }

    pub fn spawned_count(&self) -> usize {
        self.spawned
    }

    pub fn is_exhausted(&self) -> bool {
        self.spawned >= self.vehicle_count
    }

    /// Claims the next vehicle index, or `None` once all vehicles departed.
    pub fn next_index(&mut self) -> Option<usize> {
        if self.is_exhausted() {
            return None;
        }
        let index = self.spawned;
        self.spawned += 1;
        Some(index)
    }

    /// Minutes until the next departure, or `None` after the last one.
    pub fn next_delay_minutes(&self) -> Option<u64> {
        if self.is_exhausted() {
            return None;
        }
        Some(
            self.inter_arrival
                .sample_minutes(self.spawned.saturating_sub(1) as u64),
        )
    }
}
