//! Everything a component may touch during one tick.

use swarm_world::WorldState;

use crate::commands::CommandGate;
use crate::interfaces::{Actuator, Pathfinder, SpawnQueue};

/// Borrowed view of the world and the collaborators for the current tick.
pub struct TickContext<'a> {
    pub world: &'a WorldState,
    pub commands: CommandGate<'a>,
    pub pathing: &'a dyn Pathfinder,
    pub spawns: &'a mut dyn SpawnQueue,
}

impl<'a> TickContext<'a> {
    pub fn new(
        world: &'a WorldState,
        actuator: &'a mut dyn Actuator,
        pathing: &'a dyn Pathfinder,
        spawns: &'a mut dyn SpawnQueue,
    ) -> Self {
        Self {
            world,
            commands: CommandGate::new(actuator),
            pathing,
            spawns,
        }
    }

    /// Current game tick.
    pub fn time(&self) -> u32 {
        self.world.time
    }
}
