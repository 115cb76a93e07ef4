//! # Swarm World
//!
//! The world-state crate - rooms, positions, creeps, structures and the
//! capability vocabulary shared by every decision layer.
//! This crate is the single source of truth for what the bot can see in a tick
//! and does not contain any scheduling logic.

pub mod entities;
pub mod mechanics;
pub mod world_state;

pub use entities::*;
pub use mechanics::*;
pub use world_state::*;
