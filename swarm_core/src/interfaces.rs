//! Collaborators the decision core drives but does not implement.
//!
//! - **Actuator**: executes one capability for one creep and reports a result code
//! - **Pathfinder**: answers reachability questions
//! - **SpawnQueue**: receives declared creep demand

use serde::{Deserialize, Serialize};
use swarm_world::{ActionResult, BodyPartType, CreepId, Position, StructureId};

use crate::commands::Command;
use crate::overlords::OverlordId;

/// Options forwarded to the movement engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelOptions {
    /// Stop once within this range of the destination.
    pub range: u32,
    /// Allow routing through hostile rooms.
    pub allow_hostile: bool,
    /// Prefer staying off roads while working.
    pub off_road: bool,
}

impl Default for TravelOptions {
    fn default() -> Self {
        Self {
            range: 1,
            allow_hostile: false,
            off_road: false,
        }
    }
}

impl TravelOptions {
    pub fn with_range(mut self, range: u32) -> Self {
        self.range = range;
        self
    }

    pub fn allowing_hostile(mut self) -> Self {
        self.allow_hostile = true;
        self
    }
}

/// Per-creep capability surface of the game.
pub trait Actuator {
    /// Execute a single command for a creep.
    fn execute(&mut self, creep: CreepId, command: &Command) -> ActionResult;

    /// Activate the colony's safe mode through its controller.
    fn activate_safe_mode(&mut self, controller: StructureId) -> ActionResult;
}

/// Reachability queries.
pub trait Pathfinder {
    /// Check whether a walkable path exists, treating `obstacles` as impassable.
    fn is_reachable(&self, from: &Position, to: &Position, obstacles: &[Position]) -> bool;
}

/// A body template to spawn for a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreepSetup {
    pub role: String,
    /// Repeated body pattern.
    pub pattern: Vec<BodyPartType>,
    /// Maximum number of times the pattern repeats.
    pub size_limit: usize,
}

impl CreepSetup {
    pub fn new(role: impl Into<String>, pattern: Vec<BodyPartType>, size_limit: usize) -> Self {
        Self {
            role: role.into(),
            pattern,
            size_limit,
        }
    }

    pub fn guard() -> Self {
        use BodyPartType::*;
        Self::new("guard", vec![Tough, Move, Attack, Move, Attack, Heal, Move], 3)
    }

    pub fn sieger() -> Self {
        use BodyPartType::*;
        Self::new("sieger", vec![Work, Move, Work, Move, Heal, Move], 4)
    }

    pub fn fortifier() -> Self {
        use BodyPartType::*;
        Self::new("fortifier", vec![Work, Carry, Move], 8)
    }

    pub fn miner() -> Self {
        use BodyPartType::*;
        Self::new("miner", vec![Work, Work, Carry, Move], 1)
    }

    pub fn queen() -> Self {
        use BodyPartType::*;
        Self::new("queen", vec![Carry, Carry, Move], 1)
    }
}

/// Demand declared by an overlord for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRequest {
    pub overlord: OverlordId,
    pub priority: u32,
    pub count: usize,
    pub setup: CreepSetup,
}

/// The colony's spawn queue.
pub trait SpawnQueue {
    fn wishlist(&mut self, request: SpawnRequest);
}
