//! Bootstrap overlord - emergency miner and queen after a colony crash.

use super::Overlord;
use crate::context::TickContext;
use crate::error::Result;
use crate::interfaces::CreepSetup;
use crate::registry::Registry;
use crate::tasks::Task;

pub const MINER_ROLE: &str = "miner";
pub const QUEEN_ROLE: &str = "queen";

/// Emergency spawning after a colony crash: one miner and one queen, staged at the spawn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapOverlord;

impl BootstrapOverlord {
    pub fn demand() -> Vec<(CreepSetup, usize)> {
        vec![(CreepSetup::miner(), 1), (CreepSetup::queen(), 1)]
    }

    pub fn run(&self, overlord: &Overlord, registry: &mut Registry, ctx: &mut TickContext<'_>) -> Result<()> {
        let world = ctx.world;
        for role in [MINER_ROLE, QUEEN_ROLE] {
            for creep in overlord.creeps(registry, ctx, role) {
                if !registry.validate_task(creep, world) && !creep.pos.in_range_to(&overlord.pos, 1) {
                    registry.set_task(creep.id, Some(Task::go_to(overlord.pos.clone())));
                }
                registry.run_task(creep, world, &mut ctx.commands);
            }
        }
        Ok(())
    }
}
