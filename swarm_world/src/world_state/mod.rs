//! World state management - the snapshot of everything visible this tick.

mod position;

pub use position::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::entities::{Creep, CreepId, Owner, Structure, StructureId, StructureKind};

/// Kinds of flags placed by hand or by other subsystems.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlagKind {
    /// Marks the structure under the flag as a priority target for combat creeps.
    TargetSiege,
    Other(String),
}

/// An externally placed marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flag {
    pub name: String,
    pub kind: FlagKind,
    pub pos: Position,
}

impl Flag {
    pub fn new(name: impl Into<String>, kind: FlagKind, pos: Position) -> Self {
        Self {
            name: name.into(),
            kind,
            pos,
        }
    }
}

/// A visible room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub name: RoomName,
    pub energy_available: u32,
    pub energy_capacity: u32,
    pub controller: Option<StructureId>,
    pub flags: Vec<Flag>,

    /// Creeps in this room, in the order they were seen.
    creeps: Vec<CreepId>,

    /// Structures in this room, in the order they were seen.
    structures: Vec<StructureId>,
}

impl Room {
    pub fn new(name: impl Into<RoomName>) -> Self {
        Self {
            name: name.into(),
            energy_available: 0,
            energy_capacity: 0,
            controller: None,
            flags: Vec::new(),
            creeps: Vec::new(),
            structures: Vec::new(),
        }
    }

    /// Set the spawn energy.
    pub fn with_energy(mut self, available: u32, capacity: u32) -> Self {
        self.energy_available = available;
        self.energy_capacity = capacity;
        self
    }

    pub fn creep_ids(&self) -> &[CreepId] {
        &self.creeps
    }

    pub fn structure_ids(&self) -> &[StructureId] {
        &self.structures
    }
}

/// The complete state of the visible world at one tick.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorldState {
    /// Current game tick.
    pub time: u32,

    creeps: HashMap<CreepId, Creep>,
    structures: HashMap<StructureId, Structure>,

    /// Visible rooms only.
    rooms: HashMap<RoomName, Room>,
}

impl WorldState {
    /// Create a new empty world state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a room. Entities already indexed under that name are kept.
    pub fn add_room(&mut self, mut room: Room) -> RoomName {
        let name = room.name.clone();
        if let Some(existing) = self.rooms.remove(&name) {
            room.creeps = existing.creeps;
            room.structures = existing.structures;
        }
        self.rooms.insert(name.clone(), room);
        name
    }

    /// Add a creep, indexing it under its room (which becomes visible).
    pub fn add_creep(&mut self, creep: Creep) -> CreepId {
        let id = creep.id;
        self.room_entry(&creep.pos.room).creeps.push(id);
        self.creeps.insert(id, creep);
        id
    }

    /// Add a structure; controllers also become the room's controller.
    pub fn add_structure(&mut self, structure: Structure) -> StructureId {
        let id = structure.id;
        let room = self.room_entry(&structure.pos.room);
        room.structures.push(id);
        if structure.kind == StructureKind::Controller {
            room.controller = Some(id);
        }
        self.structures.insert(id, structure);
        id
    }

    /// Place a flag in its room.
    pub fn add_flag(&mut self, flag: Flag) {
        self.room_entry(&flag.pos.room).flags.push(flag);
    }

    /// Remove a creep (death).
    pub fn remove_creep(&mut self, id: CreepId) -> Option<Creep> {
        let creep = self.creeps.remove(&id)?;
        if let Some(room) = self.rooms.get_mut(&creep.pos.room) {
            room.creeps.retain(|c| *c != id);
        }
        Some(creep)
    }

    /// Remove a structure (destroyed).
    pub fn remove_structure(&mut self, id: StructureId) -> Option<Structure> {
        let structure = self.structures.remove(&id)?;
        if let Some(room) = self.rooms.get_mut(&structure.pos.room) {
            room.structures.retain(|s| *s != id);
            if room.controller == Some(id) {
                room.controller = None;
            }
        }
        Some(structure)
    }

    /// Move a creep, keeping the room index in sync.
    pub fn move_creep(&mut self, id: CreepId, pos: Position) {
        let Some(old_room) = self.creeps.get(&id).map(|c| c.pos.room.clone()) else {
            return;
        };
        if old_room != pos.room {
            if let Some(room) = self.rooms.get_mut(&old_room) {
                room.creeps.retain(|c| *c != id);
            }
            self.room_entry(&pos.room).creeps.push(id);
        }
        if let Some(creep) = self.creeps.get_mut(&id) {
            creep.pos = pos;
        }
    }

    fn room_entry(&mut self, name: &RoomName) -> &mut Room {
        self.rooms
            .entry(name.clone())
            .or_insert_with(|| Room::new(name.clone()))
    }

    /// Get a visible room.
    pub fn room(&self, name: &RoomName) -> Option<&Room> {
        self.rooms.get(name)
    }

    pub fn room_mut(&mut self, name: &RoomName) -> Option<&mut Room> {
        self.rooms.get_mut(name)
    }

    pub fn creep(&self, id: CreepId) -> Option<&Creep> {
        self.creeps.get(&id)
    }

    pub fn creep_mut(&mut self, id: CreepId) -> Option<&mut Creep> {
        self.creeps.get_mut(&id)
    }

    pub fn structure(&self, id: StructureId) -> Option<&Structure> {
        self.structures.get(&id)
    }

    pub fn structure_mut(&mut self, id: StructureId) -> Option<&mut Structure> {
        self.structures.get_mut(&id)
    }

    /// Iterate over every known creep.
    pub fn creeps(&self) -> impl Iterator<Item = &Creep> {
        self.creeps.values()
    }

    /// All creeps in a room, in index order.
    pub fn creeps_in(&self, room: &RoomName) -> Vec<&Creep> {
        self.rooms
            .get(room)
            .map(|r| r.creeps.iter().filter_map(|id| self.creeps.get(id)).collect())
            .unwrap_or_default()
    }

    /// All structures in a room, in index order.
    pub fn structures_in(&self, room: &RoomName) -> Vec<&Structure> {
        self.rooms
            .get(room)
            .map(|r| {
                r.structures
                    .iter()
                    .filter_map(|id| self.structures.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Hostile creeps (invaders and players) in a room.
    pub fn hostiles(&self, room: &RoomName) -> Vec<&Creep> {
        self.creeps_in(room)
            .into_iter()
            .filter(|c| c.owner.is_hostile())
            .collect()
    }

    /// Hostile creeps owned by other players.
    pub fn player_hostiles(&self, room: &RoomName) -> Vec<&Creep> {
        self.creeps_in(room)
            .into_iter()
            .filter(|c| c.owner.is_player())
            .collect()
    }

    /// Our own creeps in a room.
    pub fn my_creeps(&self, room: &RoomName) -> Vec<&Creep> {
        self.creeps_in(room)
            .into_iter()
            .filter(|c| c.owner.is_mine())
            .collect()
    }

    /// Structures owned by hostiles. Controllers are never targets.
    pub fn hostile_structures(&self, room: &RoomName) -> Vec<&Structure> {
        self.structures_in(room)
            .into_iter()
            .filter(|s| s.owner.is_hostile() && s.kind != StructureKind::Controller)
            .collect()
    }

    /// Our walls and ramparts (and neutral walls) in a room.
    pub fn barriers(&self, room: &RoomName) -> Vec<&Structure> {
        self.structures_in(room)
            .into_iter()
            .filter(|s| s.kind.is_barrier() && !s.owner.is_hostile())
            .collect()
    }

    pub fn barrier_positions(&self, room: &RoomName) -> Vec<Position> {
        self.barriers(room).into_iter().map(|s| s.pos.clone()).collect()
    }

    /// Flags of a kind in a room.
    pub fn flags(&self, room: &RoomName, kind: &FlagKind) -> Vec<&Flag> {
        self.rooms
            .get(room)
            .map(|r| r.flags.iter().filter(|f| &f.kind == kind).collect())
            .unwrap_or_default()
    }

    /// Non-road structure standing under a position.
    pub fn structure_at(&self, pos: &Position) -> Option<&Structure> {
        self.structures_in(&pos.room)
            .into_iter()
            .find(|s| &s.pos == pos && s.kind != StructureKind::Road)
    }

    /// Structures marked by siege-target flags in a room.
    pub fn siege_targets(&self, room: &RoomName) -> Vec<&Structure> {
        self.flags(room, &FlagKind::TargetSiege)
            .into_iter()
            .filter_map(|flag| self.structure_at(&flag.pos))
            .collect()
    }

    /// Our creeps of a role belonging to a colony.
    pub fn creeps_by_role(&self, colony: &str, role: &str) -> Vec<&Creep> {
        let mut creeps: Vec<_> = self
            .creeps
            .values()
            .filter(|c| c.owner == Owner::Mine && c.role == role)
            .filter(|c| c.colony.as_deref() == Some(colony))
            .collect();
        creeps.sort_by(|a, b| a.name.cmp(&b.name));
        creeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Body, BodyPartType};

    fn hostile(room: &str, x: u8) -> Creep {
        Creep::hostile(
            format!("invader{x}"),
            Owner::Invader,
            Position::new(room, x, 20),
            Body::from_types(&[BodyPartType::Attack, BodyPartType::Move]),
        )
    }

    #[test]
    fn test_hostiles_keep_index_order() {
        let mut state = WorldState::new();
        let first = state.add_creep(hostile("W1N1", 5));
        let second = state.add_creep(hostile("W1N1", 40));
        state.add_creep(Creep::new(
            "mine",
            "guard",
            Position::new("W1N1", 25, 25),
            Body::from_types(&[BodyPartType::Move]),
        ));

        let hostiles = state.hostiles(&RoomName::from("W1N1"));
        assert_eq!(hostiles.len(), 2);
        assert_eq!(hostiles[0].id, first);
        assert_eq!(hostiles[1].id, second);
    }

    #[test]
    fn test_move_creep_updates_index() {
        let mut state = WorldState::new();
        let id = state.add_creep(hostile("W1N1", 5));
        state.move_creep(id, Position::new("W2N1", 5, 5));

        assert!(state.creeps_in(&RoomName::from("W1N1")).is_empty());
        assert_eq!(state.creeps_in(&RoomName::from("W2N1")).len(), 1);
    }

    #[test]
    fn test_siege_targets_resolve_structure_under_flag() {
        let mut state = WorldState::new();
        let pos = Position::new("W1N1", 30, 30);
        let tower = state.add_structure(Structure::new(
            StructureKind::Tower,
            Owner::Player("Rival".into()),
            pos.clone(),
            3000,
        ));
        state.add_flag(Flag::new("siege1", FlagKind::TargetSiege, pos));

        let targets = state.siege_targets(&RoomName::from("W1N1"));
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].id, tower);
    }

    #[test]
    fn test_add_room_keeps_existing_index() {
        let mut state = WorldState::new();
        state.add_creep(hostile("W1N1", 5));
        state.add_room(Room::new("W1N1").with_energy(300, 800));

        let room = state.room(&RoomName::from("W1N1")).unwrap();
        assert_eq!(room.energy_available, 300);
        assert_eq!(room.creep_ids().len(), 1);
    }
}
