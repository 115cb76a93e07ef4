//! Colony descriptor - the rooms and core structures one overseer looks after.

use serde::{Deserialize, Serialize};
use swarm_world::{Creep, RoomName, Structure, StructureId, WorldState};

/// A colony: a home room plus the rooms it mines or incubates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Colony {
    pub name: String,
    /// The home room, holding spawns and the controller.
    pub room: RoomName,
    /// Remote rooms harvested by this colony.
    pub outposts: Vec<RoomName>,
    /// Rooms of younger colonies this one is incubating.
    pub incubating_rooms: Vec<RoomName>,
    /// Whether this colony is itself still being incubated by another.
    pub is_incubating: bool,
    /// Spawns, primary first.
    pub spawns: Vec<StructureId>,
}

impl Colony {
    pub fn new(name: impl Into<String>, room: impl Into<RoomName>) -> Self {
        Self {
            name: name.into(),
            room: room.into(),
            outposts: Vec::new(),
            incubating_rooms: Vec::new(),
            is_incubating: false,
            spawns: Vec::new(),
        }
    }

    pub fn with_outpost(mut self, room: impl Into<RoomName>) -> Self {
        self.outposts.push(room.into());
        self
    }

    pub fn with_spawn(mut self, spawn: StructureId) -> Self {
        self.spawns.push(spawn);
        self
    }

    pub fn with_incubating_room(mut self, room: impl Into<RoomName>) -> Self {
        self.incubating_rooms.push(room.into());
        self
    }

    pub fn incubating(mut self) -> Self {
        self.is_incubating = true;
        self
    }

    /// Remote rooms the guard pass watches: outposts and incubated colonies.
    pub fn rooms_to_guard(&self) -> Vec<RoomName> {
        self.outposts
            .iter()
            .chain(self.incubating_rooms.iter())
            .cloned()
            .collect()
    }

    /// The first visible spawn.
    pub fn primary_spawn<'w>(&self, world: &'w WorldState) -> Option<&'w Structure> {
        self.spawns.iter().find_map(|id| world.structure(*id))
    }

    pub fn controller<'w>(&self, world: &'w WorldState) -> Option<&'w Structure> {
        world
            .room(&self.room)
            .and_then(|room| room.controller)
            .and_then(|id| world.structure(id))
    }

    pub fn creeps_by_role<'w>(&self, world: &'w WorldState, role: &str) -> Vec<&'w Creep> {
        world.creeps_by_role(&self.name, role)
    }

    /// Spawn energy in the home room, zero if the room is not visible.
    pub fn energy_available(&self, world: &WorldState) -> u32 {
        world.room(&self.room).map(|r| r.energy_available).unwrap_or(0)
    }
}
