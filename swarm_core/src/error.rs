//! Error types for the scheduler.

use swarm_world::CreepId;
use thiserror::Error;

use crate::directives::DirectiveId;
use crate::overlords::OverlordId;

/// Everything that can go wrong inside the decision core.
///
/// None of these are fatal: the overseer logs them per unit and keeps going.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("unknown overlord {0}")]
    UnknownOverlord(OverlordId),

    #[error("unknown directive {0}")]
    UnknownDirective(DirectiveId),

    #[error("directive {directive} owns no {role} overlord")]
    MissingRole { directive: DirectiveId, role: String },

    #[error("creep {0} is not visible")]
    MissingCreep(CreepId),

    #[error("creep {creep} is assigned to {actual:?}, not {expected:?}")]
    AssignmentMismatch {
        creep: CreepId,
        expected: Option<OverlordId>,
        actual: Option<OverlordId>,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("memory (de)serialization failed: {0}")]
    Memory(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
