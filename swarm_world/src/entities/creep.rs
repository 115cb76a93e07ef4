//! Creep definitions.

use serde::{Deserialize, Serialize};

use super::{Body, BodyPartType, CreepId, Owner};
use crate::world_state::{Position, RoomName};

/// A creep as seen this tick, friendly or hostile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creep {
    pub id: CreepId,
    pub name: String,
    /// Role this creep was spawned for ("guard", "sieger", ...). Empty for hostiles.
    pub role: String,
    /// Name of the colony this creep belongs to, if it is ours.
    pub colony: Option<String>,
    pub owner: Owner,
    pub pos: Position,

    pub hits: u32,
    pub hits_max: u32,
    pub body: Body,

    /// Energy currently carried.
    pub carry_energy: u32,
}

impl Creep {
    /// Create a new friendly creep with the given role and body, at full health.
    pub fn new(name: impl Into<String>, role: impl Into<String>, pos: Position, body: Body) -> Self {
        let hits_max = body.hits_max();
        Self {
            id: CreepId::new(),
            name: name.into(),
            role: role.into(),
            colony: None,
            owner: Owner::Mine,
            pos,
            hits: hits_max,
            hits_max,
            body,
            carry_energy: 0,
        }
    }

    /// Create a hostile creep.
    pub fn hostile(name: impl Into<String>, owner: Owner, pos: Position, body: Body) -> Self {
        let mut creep = Self::new(name, "", pos, body);
        creep.owner = owner;
        creep
    }

    /// Set the owning colony.
    pub fn with_colony(mut self, colony: impl Into<String>) -> Self {
        self.colony = Some(colony.into());
        self
    }

    /// Set the carried energy.
    pub fn with_energy(mut self, energy: u32) -> Self {
        self.carry_energy = energy;
        self
    }

    /// Set current hits.
    pub fn with_hits(mut self, hits: u32) -> Self {
        self.hits = hits.min(self.hits_max);
        self
    }

    /// Room the creep currently stands in.
    pub fn room(&self) -> &RoomName {
        &self.pos.room
    }

    /// Check if the creep is missing any hits.
    pub fn is_damaged(&self) -> bool {
        self.hits < self.hits_max
    }

    /// Fraction of max hits remaining, 0.0 to 1.0.
    pub fn health_ratio(&self) -> f32 {
        if self.hits_max == 0 {
            return 0.0;
        }
        self.hits as f32 / self.hits_max as f32
    }

    /// Number of active parts of a type.
    pub fn active_parts(&self, part: BodyPartType) -> usize {
        self.body.active(part)
    }

    /// Can this creep hurt us: it carries active attack, ranged attack or work parts.
    pub fn is_dangerous(&self) -> bool {
        self.active_parts(BodyPartType::Attack) > 0
            || self.active_parts(BodyPartType::RangedAttack) > 0
            || self.active_parts(BodyPartType::Work) > 0
    }

    pub fn is_boosted(&self) -> bool {
        self.body.is_boosted()
    }
}
