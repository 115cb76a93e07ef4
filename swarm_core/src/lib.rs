//! # Swarm Core
//!
//! The decision core of the colony bot. Each tick it decides which objectives
//! exist, which creeps serve which objective, and what each creep does now.
//! It reads the world from `swarm_world` and acts only through the
//! collaborator traits in [`interfaces`].
//!
//! ## Core Components
//!
//! - **tasks**: Resumable units of work chained through parent tasks
//! - **overlords**: Priority-ranked units that request and direct creeps
//! - **directives**: Positioned objectives owning overlords
//! - **overseer**: Per-colony scheduler running the init/run protocol
//! - **registry**: Creep-to-overlord assignments and task targets
//!
//! ## Design Philosophy
//!
//! - **Re-derived**: Nothing decided last tick is trusted this tick; tasks are re-validated and stances recomputed
//! - **Ordered**: Directives before overlords, init before run, lower priority numbers first
//! - **Isolated**: A failing directive or overlord is logged and skipped, never fatal

pub mod colony;
pub mod commands;
pub mod config;
pub mod context;
pub mod directives;
pub mod error;
pub mod interfaces;
pub mod overlords;
pub mod overseer;
pub mod registry;
pub mod tasks;

#[cfg(test)]
mod testing;

pub use colony::Colony;
pub use commands::{Command, CommandGate};
pub use config::*;
pub use context::TickContext;
pub use directives::*;
pub use error::{Result, SchedulerError};
pub use interfaces::*;
pub use overlords::{Overlord, OverlordId, OverlordKind};
pub use overseer::{Overseer, OverseerMemory};
pub use registry::Registry;
pub use tasks::*;
