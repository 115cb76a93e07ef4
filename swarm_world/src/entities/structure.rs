//! Structure definitions.

use serde::{Deserialize, Serialize};

use super::{Owner, StructureId};
use crate::world_state::Position;

/// Types of structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    Spawn,
    Extension,
    Controller,
    Tower,
    Storage,
    Road,
    Wall,
    Rampart,
    Container,
    Other,
}

impl StructureKind {
    /// Walls and ramparts block hostile movement.
    pub fn is_barrier(&self) -> bool {
        matches!(self, StructureKind::Wall | StructureKind::Rampart)
    }
}

/// A structure as seen this tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Structure {
    pub id: StructureId,
    pub kind: StructureKind,
    pub owner: Owner,
    pub pos: Position,
    pub hits: u32,
    pub hits_max: u32,
}

impl Structure {
    /// Create a new structure at full hits.
    pub fn new(kind: StructureKind, owner: Owner, pos: Position, hits_max: u32) -> Self {
        Self {
            id: StructureId::new(),
            kind,
            owner,
            pos,
            hits: hits_max,
            hits_max,
        }
    }

    /// Set current hits.
    pub fn with_hits(mut self, hits: u32) -> Self {
        self.hits = hits;
        self
    }

    pub fn is_damaged(&self) -> bool {
        self.hits < self.hits_max
    }
}
