#![allow(dead_code)]

use bevy_ecs::prelude::World;
use bevy_ecs::schedule::Schedule;
use twin_core::clock::SimulationClock;
use twin_core::config::TwinConfig;
use twin_core::runner::{run_next_event, simulation_schedule};
use twin_core::scenario::SimulationEndTimeMs;

use super::world::started_world;

/// A started twin and its dispatch schedule, stepped one event at a time.
pub struct TwinHarness {
    pub world: World,
    schedule: Schedule,
}

impl TwinHarness {
    pub fn start(config: &TwinConfig) -> Self {
        Self {
            world: started_world(config),
            schedule: simulation_schedule(),
        }
    }

    /// Dispatches the next event before the horizon; `false` when there is none.
    pub fn step(&mut self) -> bool {
        run_next_event(&mut self.world, &mut self.schedule)
    }

    /// Dispatches until the horizon or an empty queue. Returns the number of events handled.
    pub fn drain(&mut self) -> usize {
        let mut handled = 0;
        while self.step() {
            handled += 1;
        }
        handled
    }

    /// Whether any event is still queued before the horizon.
    pub fn has_work(&self) -> bool {
        let horizon = self.world.get_resource::<SimulationEndTimeMs>().map(|end| end.0);
        self.world
            .resource::<SimulationClock>()
            .next_event_time()
            .is_some_and(|ts| horizon.map_or(true, |end| ts < end))
    }
}
