//! Capability calls and same-tick conflict checking.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use swarm_world::{Action, ActionLog, ActionResult, CreepId, EntityRef, Position, StructureId};

use crate::interfaces::{Actuator, TravelOptions};

/// One capability call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Move {
        destination: Position,
        options: TravelOptions,
    },
    Attack(EntityRef),
    RangedAttack(EntityRef),
    RangedMassAttack,
    Heal(CreepId),
    RangedHeal(CreepId),
    Dismantle(StructureId),
    Repair(StructureId),
    Say(String),
}

impl Command {
    /// The capability this command exercises.
    pub fn action(&self) -> Action {
        match self {
            Command::Move { .. } => Action::Move,
            Command::Attack(_) => Action::Attack,
            Command::RangedAttack(_) => Action::RangedAttack,
            Command::RangedMassAttack => Action::RangedMassAttack,
            Command::Heal(_) => Action::Heal,
            Command::RangedHeal(_) => Action::RangedHeal,
            Command::Dismantle(_) => Action::Dismantle,
            Command::Repair(_) => Action::Repair,
            Command::Say(_) => Action::Say,
        }
    }
}

/// Routes commands to the actuator, refusing ones that conflict with an
/// action the creep already took this tick.
///
/// A gate lives for exactly one tick, so its logs never carry over.
pub struct CommandGate<'a> {
    actuator: &'a mut dyn Actuator,
    logs: HashMap<CreepId, ActionLog>,
}

impl<'a> CommandGate<'a> {
    pub fn new(actuator: &'a mut dyn Actuator) -> Self {
        Self {
            actuator,
            logs: HashMap::new(),
        }
    }

    /// Issue a command. Conflicting commands return [`ActionResult::Busy`] without reaching the actuator.
    pub fn issue(&mut self, creep: CreepId, command: Command) -> ActionResult {
        let action = command.action();
        let log = self.logs.entry(creep).or_default();
        if !log.can_execute(action) {
            tracing::trace!(target: "commands", creep = %creep, ?action, "conflicting action skipped");
            return ActionResult::Busy;
        }

        let result = self.actuator.execute(creep, &command);
        log.record(action, result);
        match result {
            ActionResult::Ok | ActionResult::NotInRange => {}
            other => {
                tracing::warn!(target: "commands", creep = %creep, ?action, result = ?other, "action failed");
            }
        }
        result
    }

    /// Actions this creep has completed so far this tick.
    pub fn log(&self, creep: CreepId) -> ActionLog {
        self.logs.get(&creep).copied().unwrap_or_default()
    }

    pub fn can_execute(&self, creep: CreepId, action: Action) -> bool {
        self.log(creep).can_execute(action)
    }

    pub fn travel_to(&mut self, creep: CreepId, destination: &Position, options: &TravelOptions) -> ActionResult {
        self.issue(
            creep,
            Command::Move {
                destination: destination.clone(),
                options: options.clone(),
            },
        )
    }

    pub fn attack(&mut self, creep: CreepId, target: EntityRef) -> ActionResult {
        self.issue(creep, Command::Attack(target))
    }

    pub fn ranged_attack(&mut self, creep: CreepId, target: EntityRef) -> ActionResult {
        self.issue(creep, Command::RangedAttack(target))
    }

    pub fn ranged_mass_attack(&mut self, creep: CreepId) -> ActionResult {
        self.issue(creep, Command::RangedMassAttack)
    }

    pub fn heal(&mut self, creep: CreepId, target: CreepId) -> ActionResult {
        self.issue(creep, Command::Heal(target))
    }

    pub fn ranged_heal(&mut self, creep: CreepId, target: CreepId) -> ActionResult {
        self.issue(creep, Command::RangedHeal(target))
    }

    pub fn dismantle(&mut self, creep: CreepId, target: StructureId) -> ActionResult {
        self.issue(creep, Command::Dismantle(target))
    }

    pub fn repair(&mut self, creep: CreepId, target: StructureId) -> ActionResult {
        self.issue(creep, Command::Repair(target))
    }

    pub fn say(&mut self, creep: CreepId, message: &str) -> ActionResult {
        self.issue(creep, Command::Say(message.to_string()))
    }

    pub fn activate_safe_mode(&mut self, controller: StructureId) -> ActionResult {
        self.actuator.activate_safe_mode(controller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingActuator;

    #[test]
    fn test_conflicting_command_never_reaches_actuator() {
        let mut actuator = RecordingActuator::default();
        let creep = CreepId::new();
        let target = CreepId::new();
        {
            let mut gate = CommandGate::new(&mut actuator);
            assert_eq!(gate.attack(creep, EntityRef::Creep(target)), ActionResult::Ok);
            assert_eq!(gate.heal(creep, creep), ActionResult::Busy);
            assert_eq!(gate.ranged_attack(creep, EntityRef::Creep(target)), ActionResult::Ok);
            assert!(gate.log(creep).has(Action::Attack));
        }
        assert_eq!(actuator.commands_for(creep).len(), 2);
    }

    #[test]
    fn test_failed_action_leaves_pipeline_free() {
        let mut actuator = RecordingActuator::default();
        let creep = CreepId::new();
        let wall = StructureId::new();
        actuator.respond(Action::Dismantle, ActionResult::NotInRange);

        let mut gate = CommandGate::new(&mut actuator);
        assert_eq!(gate.dismantle(creep, wall), ActionResult::NotInRange);
        assert!(gate.can_execute(creep, Action::Heal));
    }

    #[test]
    fn test_logs_are_per_creep() {
        let mut actuator = RecordingActuator::default();
        let a = CreepId::new();
        let b = CreepId::new();

        let mut gate = CommandGate::new(&mut actuator);
        gate.attack(a, EntityRef::Creep(b));
        assert!(gate.can_execute(b, Action::Attack));
        assert!(!gate.can_execute(a, Action::Attack));
    }
}
