//! Guard overlord - holds a room against hostile creeps and structures.

use swarm_world::{find_closest_by_range, Creep, WorldState};

use super::combat::{attack_and_chase, heal_self_if_possible, medic_actions, CombatTarget};
use super::Overlord;
use crate::context::TickContext;
use crate::error::Result;
use crate::interfaces::TravelOptions;
use crate::registry::Registry;

pub const GUARD_ROLE: &str = "guard";

/// Holds a room against hostiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardOverlord {
    /// Guards requested from the spawn queue.
    pub amount: usize,
}

impl Default for GuardOverlord {
    fn default() -> Self {
        Self { amount: 1 }
    }
}

impl GuardOverlord {
    pub fn run(&self, overlord: &Overlord, registry: &mut Registry, ctx: &mut TickContext<'_>) -> Result<()> {
        let world = ctx.world;
        for guard in overlord.creeps(registry, ctx, GUARD_ROLE) {
            if guard.room() != &overlord.pos.room {
                ctx.commands.travel_to(guard.id, &overlord.pos, &TravelOptions::default());
                continue;
            }
            match find_attack_target(guard, world) {
                Some(target) => {
                    tracing::trace!(target: "overlord", creep = %guard.id, entity = %target.entity, "guard engaging");
                    attack_and_chase(guard, &target, &mut ctx.commands);
                    heal_self_if_possible(guard, &mut ctx.commands);
                }
                None => {
                    medic_actions(guard, world, &mut ctx.commands);
                }
            }
        }
        Ok(())
    }
}

/// Pick what a guard should hit, in order: flagged siege targets, hostile
/// creeps off the room edge, hostile structures. Closest wins within a tier.
pub fn find_attack_target(guard: &Creep, world: &WorldState) -> Option<CombatTarget> {
    let room = guard.room();

    let flagged = world.siege_targets(room);
    if let Some(target) = find_closest_by_range(&guard.pos, flagged, |s| &s.pos) {
        return Some(CombatTarget::from(target));
    }

    let hostiles = world
        .hostiles(room)
        .into_iter()
        .filter(|h| h.pos.range_to_edge() > 0);
    if let Some(target) = find_closest_by_range(&guard.pos, hostiles, |c| &c.pos) {
        return Some(CombatTarget::from(target));
    }

    find_closest_by_range(&guard.pos, world.hostile_structures(room), |s| &s.pos).map(CombatTarget::from)
}
