//! Fortify overlord - repairs barriers while the colony is under attack.

use swarm_world::{Creep, EntityRef, RoomName, Structure, WorldState};

use super::Overlord;
use crate::context::TickContext;
use crate::error::Result;
use crate::registry::Registry;
use crate::tasks::Task;

pub const FORTIFIER_ROLE: &str = "fortifier";

/// Keeps walls and ramparts up while the colony is under attack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FortifyOverlord {
    pub amount: usize,
}

impl FortifyOverlord {
    pub fn run(&self, overlord: &Overlord, registry: &mut Registry, ctx: &mut TickContext<'_>) -> Result<()> {
        let world = ctx.world;
        for fortifier in overlord.creeps(registry, ctx, FORTIFIER_ROLE) {
            if !registry.validate_task(fortifier, world) {
                self.assign_barrier(fortifier, &overlord.pos.room, registry, world);
            }
            registry.run_task(fortifier, world, &mut ctx.commands);
        }
        Ok(())
    }

    fn assign_barrier(&self, fortifier: &Creep, room: &RoomName, registry: &mut Registry, world: &WorldState) {
        if fortifier.carry_energy == 0 {
            tracing::trace!(target: "overlord", creep = %fortifier.id, "fortifier has no energy");
            return;
        }
        if let Some(barrier) = pick_barrier(room, registry, world) {
            registry.set_task(fortifier.id, Some(Task::fortify(barrier)));
        }
    }
}

/// Least-attended damaged barrier, weakest first among equals.
pub fn pick_barrier<'w>(room: &RoomName, registry: &Registry, world: &'w WorldState) -> Option<&'w Structure> {
    world
        .barriers(room)
        .into_iter()
        .filter(|b| b.hits < b.hits_max)
        .min_by_key(|b| (registry.targeted_by(EntityRef::Structure(b.id)).len(), b.hits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlords::OverlordKind;
    use crate::testing::{fixtures, CollectingSpawnQueue, FixedPathfinder, RecordingActuator};
    use swarm_world::{Action, BodyPartType, Owner, Position, StructureKind};

    fn rampart(world: &mut WorldState, x: u8, hits: u32) -> swarm_world::StructureId {
        world.add_structure(
            Structure::new(StructureKind::Rampart, Owner::Mine, Position::new(fixtures::HOME, x, 30), 10_000)
                .with_hits(hits),
        )
    }

    fn fortifier(x: u8) -> Creep {
        fixtures::creep(
            FORTIFIER_ROLE,
            &[BodyPartType::Work, BodyPartType::Carry, BodyPartType::Move],
            Position::new(fixtures::HOME, x, 28),
        )
        .with_energy(50)
    }

    #[test]
    fn test_fortifiers_spread_across_barriers() {
        let (mut world, _colony) = fixtures::world();
        let weak = rampart(&mut world, 20, 100);
        let strong = rampart(&mut world, 24, 5_000);
        rampart(&mut world, 28, 10_000);
        let first = world.add_creep(fortifier(20));
        let second = world.add_creep(fortifier(24));

        let overlord = Overlord::new(
            "fortify",
            fixtures::COLONY,
            250,
            Position::new(fixtures::HOME, 25, 25),
            OverlordKind::Fortify(FortifyOverlord { amount: 2 }),
        );
        let mut registry = Registry::new();
        registry.assign(first, FORTIFIER_ROLE, overlord.id).unwrap();
        registry.assign(second, FORTIFIER_ROLE, overlord.id).unwrap();

        let mut actuator = RecordingActuator::default();
        let pathing = FixedPathfinder(true);
        let mut spawns = CollectingSpawnQueue::default();
        {
            let mut ctx = TickContext::new(&world, &mut actuator, &pathing, &mut spawns);
            overlord.run(&mut registry, &mut ctx).unwrap();
        }

        assert_eq!(registry.targeted_by(EntityRef::Structure(weak)).len(), 1);
        assert_eq!(registry.targeted_by(EntityRef::Structure(strong)).len(), 1);
        assert_eq!(actuator.actions_for(first), vec![Action::Repair]);
        assert_eq!(actuator.actions_for(second), vec![Action::Repair]);
    }

    #[test]
    fn test_empty_fortifier_stays_idle() {
        let (mut world, _colony) = fixtures::world();
        rampart(&mut world, 20, 100);
        let id = world.add_creep(fortifier(20).with_energy(0));

        let overlord = Overlord::new(
            "fortify",
            fixtures::COLONY,
            250,
            Position::new(fixtures::HOME, 25, 25),
            OverlordKind::Fortify(FortifyOverlord { amount: 1 }),
        );
        let mut registry = Registry::new();
        registry.assign(id, FORTIFIER_ROLE, overlord.id).unwrap();

        let mut actuator = RecordingActuator::default();
        let pathing = FixedPathfinder(true);
        let mut spawns = CollectingSpawnQueue::default();
        {
            let mut ctx = TickContext::new(&world, &mut actuator, &pathing, &mut spawns);
            overlord.run(&mut registry, &mut ctx).unwrap();
        }
        assert!(registry.is_idle(id));
        assert!(actuator.calls.is_empty());
    }
}
