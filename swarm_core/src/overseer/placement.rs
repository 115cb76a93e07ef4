//! Colony-wide reactive checks: directive placement and safe mode.

use swarm_world::{RoomName, WorldState};

use super::Overseer;
use crate::context::TickContext;
use crate::directives::{effective_hostile_count, Directive, DirectiveId, DirectiveKind};
use crate::overlords::{MINER_ROLE, QUEEN_ROLE};

impl Overseer {
    fn has_directive(&self, room: &RoomName, matches: impl Fn(&DirectiveKind) -> bool) -> bool {
        self.directives.iter().any(|d| d.room() == room && matches(&d.kind))
    }

    /// Place directives for conditions nothing covers yet. Running it again on
    /// an unchanged world places nothing.
    pub fn place_directives(&mut self, world: &WorldState) -> Vec<DirectiveId> {
        let mut placed = Vec::new();
        let colony = self.colony.name.clone();

        // Guard outposts and the rooms of colonies we are incubating.
        for room in self.colony.rooms_to_guard() {
            let hostiles = world.hostiles(&room);
            let big_hostiles = hostiles
                .iter()
                .filter(|h| h.body.len() >= self.config.big_hostile_body_size)
                .count();
            let covered = self.has_directive(&room, DirectiveKind::is_defense);
            if (!hostiles.is_empty() || big_hostiles > 0) && !covered {
                let pos = hostiles[0].pos.clone();
                tracing::info!(target: "overseer", room = %room, hostiles = hostiles.len(), "hostiles in unguarded room");
                placed.push(self.place_directive(Directive::new(DirectiveKind::Guard, pos, colony.clone(), world.time)));
            }
        }

        let home = self.colony.room.clone();
        if world.room(&home).is_some() {
            let effective = effective_hostile_count(&world.hostiles(&home));
            let defended = self.has_directive(&home, |k| *k == DirectiveKind::InvasionDefense);
            if effective >= self.config.invasion_threshold as usize && !defended {
                match self.colony.controller(world) {
                    Some(controller) => {
                        tracing::warn!(target: "overseer", room = %home, effective, "invasion detected");
                        let directive =
                            Directive::new(DirectiveKind::InvasionDefense, controller.pos.clone(), colony.clone(), world.time);
                        placed.push(self.place_directive(directive));
                    }
                    None => {
                        tracing::debug!(target: "overseer", room = %home, "invasion but no controller to anchor defense");
                    }
                }
            }
        }

        // Catastrophic crash: no energy, nobody to harvest or haul it.
        if !self.colony.is_incubating {
            let has_energy = self.colony.energy_available(world) >= self.config.emergency_energy_threshold;
            let has_miners = !self.colony.creeps_by_role(world, MINER_ROLE).is_empty();
            let has_queen = !self.colony.creeps_by_role(world, QUEEN_ROLE).is_empty();
            let bootstrapping = self.directives.iter().any(|d| d.kind == DirectiveKind::Bootstrap);
            if !has_energy && !has_miners && !has_queen && !bootstrapping {
                if let Some(spawn) = self.colony.primary_spawn(world) {
                    tracing::warn!(target: "overseer", colony = %colony, "entering bootstrap mode");
                    let directive = Directive::new(DirectiveKind::Bootstrap, spawn.pos.clone(), colony.clone(), world.time);
                    placed.push(self.place_directive(directive));
                }
            }
        }

        placed
    }

    /// Activate safe mode if a dangerous player creep can walk to the primary spawn.
    pub fn handle_safe_mode(&self, ctx: &mut TickContext<'_>) -> bool {
        let world = ctx.world;
        let home = &self.colony.room;
        let (Some(spawn), Some(controller)) = (self.colony.primary_spawn(world), self.colony.controller(world)) else {
            return false;
        };
        let barriers = world.barrier_positions(home);

        for hostile in world.player_hostiles(home).into_iter().filter(|h| h.is_dangerous()) {
            if ctx.pathing.is_reachable(&hostile.pos, &spawn.pos, &barriers) {
                tracing::warn!(target: "overseer", room = %home, hostile = %hostile.name, "hostile can reach spawn; activating safe mode");
                let result = ctx.commands.activate_safe_mode(controller.id);
                if !result.is_ok() {
                    tracing::warn!(target: "overseer", room = %home, ?result, "safe mode activation failed");
                }
                return true;
            }
        }
        false
    }
}
