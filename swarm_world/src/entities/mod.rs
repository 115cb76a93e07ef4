//! Entity definitions for the game world.

mod body;
mod creep;
mod structure;

pub use body::*;
pub use creep::*;
pub use structure::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for creeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreepId(pub Uuid);

impl CreepId {
    /// Create a new random creep ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a creep ID from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for CreepId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CreepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StructureId(pub Uuid);

impl StructureId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StructureId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StructureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A reference to anything a creep can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityRef {
    Creep(CreepId),
    Structure(StructureId),
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityRef::Creep(id) => write!(f, "creep:{}", id),
            EntityRef::Structure(id) => write!(f, "structure:{}", id),
        }
    }
}

impl From<CreepId> for EntityRef {
    fn from(id: CreepId) -> Self {
        EntityRef::Creep(id)
    }
}

impl From<StructureId> for EntityRef {
    fn from(id: StructureId) -> Self {
        EntityRef::Structure(id)
    }
}

/// Who controls an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Owner {
    #[default]
    Mine,
    /// Non-player invaders spawned by the environment.
    Invader,
    /// Another player, by name.
    Player(String),
    /// Unowned (roads, walls, neutral structures).
    Neutral,
}

impl Owner {
    /// Check if the entity belongs to us.
    pub fn is_mine(&self) -> bool {
        matches!(self, Owner::Mine)
    }

    /// Check if the entity is hostile (invader or foreign player).
    pub fn is_hostile(&self) -> bool {
        matches!(self, Owner::Invader | Owner::Player(_))
    }

    /// Check if the entity is owned by another player.
    pub fn is_player(&self) -> bool {
        matches!(self, Owner::Player(_))
    }
}
