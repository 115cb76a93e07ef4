//! Siege overlord - breaks down structures in a target room, falling back to a
//! recovery waypoint to heal between pushes.

use swarm_world::{find_closest_by_range, BodyPartType, Creep, Position, RoomName, Structure, WorldState};

use super::Overlord;
use crate::commands::CommandGate;
use crate::context::TickContext;
use crate::error::{Result, SchedulerError};
use crate::interfaces::TravelOptions;
use crate::registry::Registry;
use crate::tasks::Task;

pub const SIEGER_ROLE: &str = "sieger";

#[derive(Debug, Clone, PartialEq)]
pub struct SiegeOverlord {
    /// Where siegers regroup and heal, usually in a neighbouring room.
    pub recovery_waypoint: Option<Position>,
    /// Health fraction below which a sieger leaves the target room.
    pub retreat_hits_ratio: f32,
    pub amount: usize,
}

/// What a sieger should do this tick.
///
/// Derived from scratch every tick from room membership, health and the
/// waypoint; nothing about it is stored.
///
/// Outside the target room only a sieger at full health advances. A scratched
/// one (say 90%) is routed via the waypoint, or heals once it stands in the
/// waypoint room, and only charges again when fully healed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiegeStance {
    /// Outside both the target and the waypoint room: route via the waypoint.
    ApproachWaypoint,
    /// In the target room and healthy enough to dismantle.
    Engage,
    /// Too hurt to stay or to go back in: heal, at the waypoint if there is one.
    RetreatHeal,
    /// Outside the target room at full health: push in.
    Advance,
}

impl SiegeStance {
    pub fn decide(creep: &Creep, target_room: &RoomName, waypoint: Option<&Position>, retreat_hits_ratio: f32) -> Self {
        let room = creep.room();
        if let Some(waypoint) = waypoint {
            if room != target_room && room != &waypoint.room {
                return SiegeStance::ApproachWaypoint;
            }
        }
        if room == target_room {
            if creep.health_ratio() >= retreat_hits_ratio {
                SiegeStance::Engage
            } else {
                SiegeStance::RetreatHeal
            }
        } else if creep.is_damaged() {
            SiegeStance::RetreatHeal
        } else {
            SiegeStance::Advance
        }
    }
}

impl SiegeOverlord {
    pub fn new(recovery_waypoint: Option<Position>, retreat_hits_ratio: f32, amount: usize) -> Self {
        Self {
            recovery_waypoint,
            retreat_hits_ratio,
            amount,
        }
    }

    fn travel_options() -> TravelOptions {
        TravelOptions::default().allowing_hostile()
    }

    pub fn run(&self, overlord: &Overlord, registry: &mut Registry, ctx: &mut TickContext<'_>) -> Result<()> {
        let ratio = self.retreat_hits_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(SchedulerError::Config(format!(
                "{}: retreat_hits_ratio must be in (0, 1], got {ratio}",
                overlord.name
            )));
        }
        let world = ctx.world;
        for sieger in overlord.creeps(registry, ctx, SIEGER_ROLE) {
            if !registry.is_idle(sieger.id) && registry.run_task(sieger, world, &mut ctx.commands).is_some() {
                continue;
            }
            self.handle_sieger(sieger, &overlord.pos, registry, world, &mut ctx.commands);
        }
        Ok(())
    }

    fn handle_sieger(
        &self,
        sieger: &Creep,
        target: &Position,
        registry: &mut Registry,
        world: &WorldState,
        commands: &mut CommandGate<'_>,
    ) {
        let stance = SiegeStance::decide(
            sieger,
            &target.room,
            self.recovery_waypoint.as_ref(),
            self.retreat_hits_ratio,
        );
        tracing::trace!(target: "overlord", creep = %sieger.id, ?stance, "sieger stance");

        match stance {
            SiegeStance::ApproachWaypoint => {
                if let Some(waypoint) = &self.recovery_waypoint {
                    let goto = Task::go_to(waypoint.clone()).with_travel(Self::travel_options());
                    registry.set_task(sieger.id, Some(goto));
                    registry.run_task(sieger, world, commands);
                }
            }
            SiegeStance::Engage => match find_siege_target(sieger, &target.room, world) {
                Some(structure) => {
                    commands.say(sieger.id, "JOY!!!");
                    self.siege_actions(sieger, structure, commands);
                }
                None => {
                    commands.say(sieger.id, "NO JOY");
                }
            },
            SiegeStance::RetreatHeal => {
                self.retreat_actions(sieger, commands);
                if sieger.room() != &target.room {
                    commands.say(sieger.id, "healme");
                }
            }
            SiegeStance::Advance => {
                commands.say(sieger.id, "charge");
                commands.travel_to(sieger.id, target, &Self::travel_options().with_range(50));
            }
        }
    }

    fn siege_actions(&self, sieger: &Creep, target: &Structure, commands: &mut CommandGate<'_>) {
        let mut dismantled = false;
        if sieger.pos.is_near_to(&target.pos) {
            dismantled = commands.dismantle(sieger.id, target.id).is_ok();
        } else {
            commands.travel_to(sieger.id, &target.pos, &Self::travel_options());
        }

        if !dismantled && sieger.active_parts(BodyPartType::Heal) > 0 && sieger.is_damaged() {
            commands.heal(sieger.id, sieger.id);
        }
    }

    fn retreat_actions(&self, sieger: &Creep, commands: &mut CommandGate<'_>) {
        if sieger.active_parts(BodyPartType::Heal) > 0 {
            commands.heal(sieger.id, sieger.id);
        }
        // No waypoint: heal where we stand.
        if let Some(waypoint) = &self.recovery_waypoint {
            commands.travel_to(sieger.id, waypoint, &Self::travel_options());
        }
    }
}

/// Flagged siege targets in the target room first, then any hostile structure there.
pub fn find_siege_target<'w>(sieger: &Creep, target_room: &RoomName, world: &'w WorldState) -> Option<&'w Structure> {
    let flagged = world.siege_targets(target_room);
    if !flagged.is_empty() {
        return find_closest_by_range(&sieger.pos, flagged, |s| &s.pos);
    }
    find_closest_by_range(&sieger.pos, world.hostile_structures(target_room), |s| &s.pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::overlords::OverlordKind;
    use crate::testing::{fixtures, CollectingSpawnQueue, FixedPathfinder, RecordingActuator};
    use swarm_world::{Action, BodyPartType, Owner, StructureKind};

    const TARGET: &str = "W5N5";
    const WAYPOINT: &str = "W4N5";

    fn sieger(room: &str, x: u8) -> Creep {
        fixtures::creep(
            SIEGER_ROLE,
            &[
                BodyPartType::Work,
                BodyPartType::Work,
                BodyPartType::Heal,
                BodyPartType::Move,
                BodyPartType::Move,
                BodyPartType::Move,
                BodyPartType::Move,
                BodyPartType::Move,
                BodyPartType::Move,
                BodyPartType::Move,
            ],
            Position::new(room, x, 25),
        )
    }

    fn waypoint() -> Position {
        Position::new(WAYPOINT, 25, 25)
    }

    #[test]
    fn test_stance_routes_via_waypoint() {
        let creep = sieger(fixtures::HOME, 25).with_hits(900);
        let stance = SiegeStance::decide(&creep, &RoomName::from(TARGET), Some(&waypoint()), 0.75);
        assert_eq!(stance, SiegeStance::ApproachWaypoint);
    }

    #[test]
    fn test_stance_drops_to_retreat_after_damage_in_target_room() {
        let target = RoomName::from(TARGET);
        let healthy = sieger(TARGET, 25).with_hits(900);
        assert_eq!(SiegeStance::decide(&healthy, &target, Some(&waypoint()), 0.75), SiegeStance::Engage);

        let hurt = healthy.with_hits(600);
        assert_eq!(SiegeStance::decide(&hurt, &target, Some(&waypoint()), 0.75), SiegeStance::RetreatHeal);
    }

    #[test]
    fn test_stance_full_health_gate_outside_target() {
        let target = RoomName::from(TARGET);
        let full = sieger(WAYPOINT, 25);
        assert_eq!(SiegeStance::decide(&full, &target, Some(&waypoint()), 0.75), SiegeStance::Advance);

        let scratched = sieger(WAYPOINT, 25).with_hits(900);
        assert_eq!(SiegeStance::decide(&scratched, &target, Some(&waypoint()), 0.75), SiegeStance::RetreatHeal);

        let no_waypoint = sieger(fixtures::HOME, 25);
        assert_eq!(SiegeStance::decide(&no_waypoint, &target, None, 0.75), SiegeStance::Advance);
    }

    fn siege_overlord() -> Overlord {
        Overlord::new(
            "siege",
            fixtures::COLONY,
            300,
            Position::new(TARGET, 25, 25),
            OverlordKind::Siege(SiegeOverlord::new(Some(waypoint()), 0.75, 3)),
        )
    }

    #[test]
    fn test_engaged_sieger_dismantles_without_healing() {
        let mut world = WorldState::new();
        let wall = world.add_structure(Structure::new(
            StructureKind::Wall,
            Owner::Player("Rival".into()),
            Position::new(TARGET, 11, 25),
            10_000,
        ));
        let id = world.add_creep(sieger(TARGET, 10).with_hits(900));

        let overlord = siege_overlord();
        let mut registry = Registry::new();
        registry.assign(id, SIEGER_ROLE, overlord.id).unwrap();

        let mut actuator = RecordingActuator::default();
        let pathing = FixedPathfinder(true);
        let mut spawns = CollectingSpawnQueue::default();
        {
            let mut ctx = TickContext::new(&world, &mut actuator, &pathing, &mut spawns);
            overlord.run(&mut registry, &mut ctx).unwrap();
        }

        assert_eq!(
            actuator.commands_for(id),
            vec![&Command::Say("JOY!!!".into()), &Command::Dismantle(wall)]
        );
    }

    #[test]
    fn test_retreating_sieger_heals_and_falls_back() {
        let mut world = WorldState::new();
        let id = world.add_creep(sieger(TARGET, 10).with_hits(500));

        let overlord = siege_overlord();
        let mut registry = Registry::new();
        registry.assign(id, SIEGER_ROLE, overlord.id).unwrap();

        let mut actuator = RecordingActuator::default();
        let pathing = FixedPathfinder(true);
        let mut spawns = CollectingSpawnQueue::default();
        {
            let mut ctx = TickContext::new(&world, &mut actuator, &pathing, &mut spawns);
            overlord.run(&mut registry, &mut ctx).unwrap();
        }

        assert_eq!(actuator.actions_for(id), vec![Action::Heal, Action::Move]);
        assert_eq!(actuator.destinations_for(id), vec![&waypoint()]);
    }

    #[test]
    fn test_engaged_sieger_without_target_reports_no_joy() {
        let mut world = WorldState::new();
        let id = world.add_creep(sieger(TARGET, 10));

        let overlord = siege_overlord();
        let mut registry = Registry::new();
        registry.assign(id, SIEGER_ROLE, overlord.id).unwrap();

        let mut actuator = RecordingActuator::default();
        let pathing = FixedPathfinder(true);
        let mut spawns = CollectingSpawnQueue::default();
        {
            let mut ctx = TickContext::new(&world, &mut actuator, &pathing, &mut spawns);
            overlord.run(&mut registry, &mut ctx).unwrap();
        }

        assert_eq!(actuator.commands_for(id), vec![&Command::Say("NO JOY".into())]);
        assert!(registry.is_idle(id));
    }

    #[test]
    fn test_out_of_range_retreat_ratio_is_an_error() {
        let mut world = WorldState::new();
        let id = world.add_creep(sieger(TARGET, 10));

        let overlord = Overlord::new(
            "siege",
            fixtures::COLONY,
            300,
            Position::new(TARGET, 25, 25),
            OverlordKind::Siege(SiegeOverlord::new(None, 1.5, 1)),
        );
        let mut registry = Registry::new();
        registry.assign(id, SIEGER_ROLE, overlord.id).unwrap();

        let mut actuator = RecordingActuator::default();
        let pathing = FixedPathfinder(true);
        let mut spawns = CollectingSpawnQueue::default();
        let result = {
            let mut ctx = TickContext::new(&world, &mut actuator, &pathing, &mut spawns);
            overlord.run(&mut registry, &mut ctx)
        };

        assert!(matches!(result, Err(SchedulerError::Config(_))));
        assert!(actuator.commands_for(id).is_empty());
    }

    #[test]
    fn test_far_sieger_gets_waypoint_task() {
        let mut world = WorldState::new();
        let id = world.add_creep(sieger(fixtures::HOME, 10));

        let overlord = siege_overlord();
        let mut registry = Registry::new();
        registry.assign(id, SIEGER_ROLE, overlord.id).unwrap();

        let mut actuator = RecordingActuator::default();
        let pathing = FixedPathfinder(true);
        let mut spawns = CollectingSpawnQueue::default();
        {
            let mut ctx = TickContext::new(&world, &mut actuator, &pathing, &mut spawns);
            overlord.run(&mut registry, &mut ctx).unwrap();
        }

        let task = registry.task(id).unwrap();
        assert_eq!(task.target_pos, waypoint());
        assert!(task.travel.allow_hostile);
        assert_eq!(actuator.destinations_for(id), vec![&waypoint()]);
    }
}
