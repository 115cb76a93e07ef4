//! Test doubles for the collaborators and world fixtures.

use std::collections::HashMap;

use swarm_world::{Action, ActionResult, CreepId, Position, StructureId};

use crate::commands::Command;
use crate::interfaces::{Actuator, Pathfinder, SpawnQueue, SpawnRequest};

/// Records every command; answers `Ok` unless told otherwise.
#[derive(Debug, Default)]
pub struct RecordingActuator {
    pub calls: Vec<(CreepId, Command)>,
    pub safe_mode_activations: Vec<StructureId>,
    responses: HashMap<Action, ActionResult>,
}

impl RecordingActuator {
    /// Answer every future `action` with `result`.
    pub fn respond(&mut self, action: Action, result: ActionResult) {
        self.responses.insert(action, result);
    }

    pub fn commands_for(&self, creep: CreepId) -> Vec<&Command> {
        self.calls
            .iter()
            .filter(|(id, _)| *id == creep)
            .map(|(_, command)| command)
            .collect()
    }

    pub fn actions_for(&self, creep: CreepId) -> Vec<Action> {
        self.commands_for(creep).iter().map(|c| c.action()).collect()
    }

    /// Creeps in the order they first received a command.
    pub fn creep_order(&self) -> Vec<CreepId> {
        let mut order = Vec::new();
        for (id, _) in &self.calls {
            if !order.contains(id) {
                order.push(*id);
            }
        }
        order
    }

    /// Destinations of every move command issued to a creep.
    pub fn destinations_for(&self, creep: CreepId) -> Vec<&Position> {
        self.commands_for(creep)
            .into_iter()
            .filter_map(|c| match c {
                Command::Move { destination, .. } => Some(destination),
                _ => None,
            })
            .collect()
    }
}

impl Actuator for RecordingActuator {
    fn execute(&mut self, creep: CreepId, command: &Command) -> ActionResult {
        self.calls.push((creep, command.clone()));
        self.responses
            .get(&command.action())
            .copied()
            .unwrap_or(ActionResult::Ok)
    }

    fn activate_safe_mode(&mut self, controller: StructureId) -> ActionResult {
        self.safe_mode_activations.push(controller);
        ActionResult::Ok
    }
}

/// Answers every reachability query the same way.
#[derive(Debug, Clone, Copy)]
pub struct FixedPathfinder(pub bool);

impl Pathfinder for FixedPathfinder {
    fn is_reachable(&self, _from: &Position, _to: &Position, _obstacles: &[Position]) -> bool {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct CollectingSpawnQueue {
    pub requests: Vec<SpawnRequest>,
}

impl SpawnQueue for CollectingSpawnQueue {
    fn wishlist(&mut self, request: SpawnRequest) {
        self.requests.push(request);
    }
}

pub mod fixtures {
    use swarm_world::{
        Body, BodyPart, BodyPartType, Creep, Owner, Position, Room, Structure, StructureKind,
        WorldState,
    };

    use crate::colony::Colony;

    pub const COLONY: &str = "alpha";
    pub const HOME: &str = "W1N1";
    pub const OUTPOST: &str = "W2N1";

    /// One of our creeps, belonging to the test colony.
    pub fn creep(role: &str, parts: &[BodyPartType], pos: Position) -> Creep {
        Creep::new(format!("{role}-{}-{}", pos.x, pos.y), role, pos, Body::from_types(parts))
            .with_colony(COLONY)
    }

    pub fn guard(pos: Position) -> Creep {
        creep(
            "guard",
            &[BodyPartType::Attack, BodyPartType::Heal, BodyPartType::Move],
            pos,
        )
    }

    pub fn invader(pos: Position) -> Creep {
        Creep::hostile(
            "invader",
            Owner::Invader,
            pos,
            Body::from_types(&[BodyPartType::Attack, BodyPartType::Move]),
        )
    }

    pub fn player_attacker(pos: Position, boosted: bool) -> Creep {
        let mut body = Body::from_types(&[BodyPartType::Attack, BodyPartType::Move]);
        if boosted {
            body.parts[0] = BodyPart::new(BodyPartType::Attack).boosted("UH");
        }
        Creep::hostile("raider", Owner::Player("Rival".into()), pos, body)
    }

    /// Home room with a spawn and a controller, plenty of energy, and an empty outpost.
    pub fn world() -> (WorldState, Colony) {
        let mut world = WorldState::new();
        world.time = 1000;
        world.add_room(Room::new(HOME).with_energy(5000, 5000));
        world.add_room(Room::new(OUTPOST));
        let spawn = world.add_structure(Structure::new(
            StructureKind::Spawn,
            Owner::Mine,
            Position::new(HOME, 25, 25),
            5000,
        ));
        world.add_structure(Structure::new(
            StructureKind::Controller,
            Owner::Mine,
            Position::new(HOME, 10, 40),
            0,
        ));
        let colony = Colony::new(COLONY, HOME)
            .with_spawn(spawn)
            .with_outpost(OUTPOST);
        (world, colony)
    }
}
