//! Combat behaviors shared by the fighting overlords.

use swarm_world::{
    find_closest_by_range, Action, ActionResult, BodyPartType, Creep, EntityRef, Position, Structure,
    WorldState,
};

use crate::commands::CommandGate;
use crate::interfaces::TravelOptions;

/// Range of ranged attacks and ranged heals.
pub const RANGED_RANGE: u32 = 3;

/// Something a combat creep can attack.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatTarget {
    pub entity: EntityRef,
    pub pos: Position,
}

impl From<&Creep> for CombatTarget {
    fn from(creep: &Creep) -> Self {
        Self {
            entity: EntityRef::Creep(creep.id),
            pos: creep.pos.clone(),
        }
    }
}

impl From<&Structure> for CombatTarget {
    fn from(structure: &Structure) -> Self {
        Self {
            entity: EntityRef::Structure(structure.id),
            pos: structure.pos.clone(),
        }
    }
}

/// Attack the target with whatever weapons the creep has, moving to stay on it.
///
/// Returns the result of the melee attack if one was attempted, else of the
/// ranged attack, else of the move.
pub fn attack_and_chase(creep: &Creep, target: &CombatTarget, commands: &mut CommandGate<'_>) -> ActionResult {
    let range = creep.pos.range_to(&target.pos);
    let melee = creep.active_parts(BodyPartType::Attack) > 0;
    let ranged = creep.active_parts(BodyPartType::RangedAttack) > 0;

    let mut result = None;
    if melee && range <= 1 {
        result = Some(commands.attack(creep.id, target.entity));
    }
    if ranged && range <= RANGED_RANGE {
        let fired = commands.ranged_attack(creep.id, target.entity);
        if result.is_none() {
            result = Some(fired);
        }
    }

    // Melee creeps close in; pure ranged creeps hold at range.
    let chase_range = if melee { 1 } else { RANGED_RANGE };
    let moved = if range > chase_range || melee {
        Some(commands.travel_to(creep.id, &target.pos, &TravelOptions::default().with_range(chase_range)))
    } else {
        None
    };

    result.or(moved).unwrap_or(ActionResult::Ok)
}

/// Heal the creep itself if it is hurt, can heal, and healing would not conflict
/// with anything it already did this tick.
pub fn heal_self_if_possible(creep: &Creep, commands: &mut CommandGate<'_>) -> Option<ActionResult> {
    if creep.active_parts(BodyPartType::Heal) == 0 || !creep.is_damaged() {
        return None;
    }
    if !commands.can_execute(creep.id, Action::Heal) {
        return None;
    }
    Some(commands.heal(creep.id, creep.id))
}

/// Patch up the closest damaged friendly creep in the room.
pub fn medic_actions(creep: &Creep, world: &WorldState, commands: &mut CommandGate<'_>) -> Option<ActionResult> {
    if creep.active_parts(BodyPartType::Heal) == 0 {
        return None;
    }
    let patients = world
        .my_creeps(creep.room())
        .into_iter()
        .filter(|c| c.is_damaged());
    let patient = find_closest_by_range(&creep.pos, patients, |c| &c.pos)?;

    let range = creep.pos.range_to(&patient.pos);
    let result = if range <= 1 {
        commands.heal(creep.id, patient.id)
    } else {
        if range <= RANGED_RANGE {
            commands.ranged_heal(creep.id, patient.id);
        }
        commands.travel_to(creep.id, &patient.pos, &TravelOptions::default())
    };
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, RecordingActuator};
    use swarm_world::Position;

    #[test]
    fn test_melee_attack_then_self_heal_is_refused() {
        let guard = fixtures::guard(Position::new("W1N1", 10, 10)).with_hits(100);
        let invader = fixtures::invader(Position::new("W1N1", 11, 10));

        let mut actuator = RecordingActuator::default();
        {
            let mut gate = CommandGate::new(&mut actuator);
            assert_eq!(attack_and_chase(&guard, &CombatTarget::from(&invader), &mut gate), ActionResult::Ok);
            assert_eq!(heal_self_if_possible(&guard, &mut gate), None);
        }
        assert_eq!(actuator.actions_for(guard.id), vec![Action::Attack, Action::Move]);
    }

    #[test]
    fn test_out_of_range_chases_and_heals() {
        let guard = fixtures::guard(Position::new("W1N1", 10, 10)).with_hits(100);
        let invader = fixtures::invader(Position::new("W1N1", 20, 10));

        let mut actuator = RecordingActuator::default();
        {
            let mut gate = CommandGate::new(&mut actuator);
            attack_and_chase(&guard, &CombatTarget::from(&invader), &mut gate);
            assert_eq!(heal_self_if_possible(&guard, &mut gate), Some(ActionResult::Ok));
        }
        assert_eq!(actuator.actions_for(guard.id), vec![Action::Move, Action::Heal]);
    }

    #[test]
    fn test_medic_heals_adjacent_ally() {
        let mut world = WorldState::new();
        let medic = fixtures::guard(Position::new("W1N1", 10, 10));
        let hurt = fixtures::guard(Position::new("W1N1", 10, 11)).with_hits(50);
        let hurt_id = world.add_creep(hurt);
        let medic_id = world.add_creep(medic.clone());

        let mut actuator = RecordingActuator::default();
        {
            let mut gate = CommandGate::new(&mut actuator);
            assert!(medic_actions(&medic, &world, &mut gate).is_some());
        }
        assert_eq!(actuator.commands_for(medic_id), vec![&crate::commands::Command::Heal(hurt_id)]);
    }
}
