//! Body part definitions for creeps.

use serde::{Deserialize, Serialize};

/// Hit points of a single body part.
pub const BODY_PART_HITS: u32 = 100;

/// Kinds of body parts a creep can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyPartType {
    Move,
    Work,
    Carry,
    Attack,
    RangedAttack,
    Heal,
    Tough,
    Claim,
}

/// A single body part with its remaining hits and optional boost compound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyPart {
    pub part: BodyPartType,
    pub hits: u32,
    pub boost: Option<String>,
}

impl BodyPart {
    /// Create an undamaged, unboosted part.
    pub fn new(part: BodyPartType) -> Self {
        Self {
            part,
            hits: BODY_PART_HITS,
            boost: None,
        }
    }

    /// Set the boost compound.
    pub fn boosted(mut self, compound: impl Into<String>) -> Self {
        self.boost = Some(compound.into());
        self
    }

    /// A part with no hits left contributes nothing.
    pub fn is_active(&self) -> bool {
        self.hits > 0
    }
}

/// The full body of a creep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Body {
    pub parts: Vec<BodyPart>,
}

impl Body {
    /// Build a body from part types, all undamaged.
    pub fn from_types(types: &[BodyPartType]) -> Self {
        Self {
            parts: types.iter().copied().map(BodyPart::new).collect(),
        }
    }

    /// Number of parts regardless of condition.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Count parts of a type regardless of damage.
    pub fn count(&self, part: BodyPartType) -> usize {
        self.parts.iter().filter(|p| p.part == part).count()
    }

    /// Count parts of a type that still have hits.
    pub fn active(&self, part: BodyPartType) -> usize {
        self.parts
            .iter()
            .filter(|p| p.part == part && p.is_active())
            .count()
    }

    /// Check whether any part carries a boost.
    pub fn is_boosted(&self) -> bool {
        self.parts.iter().any(|p| p.boost.is_some())
    }

    /// Maximum hits of the whole body.
    pub fn hits_max(&self) -> u32 {
        self.parts.len() as u32 * BODY_PART_HITS
    }
}
