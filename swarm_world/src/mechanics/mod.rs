//! Game mechanics: capabilities, result codes and same-tick action exclusivity.

use serde::{Deserialize, Serialize};

/// Every capability a creep can be ordered to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Move,
    Attack,
    RangedAttack,
    RangedMassAttack,
    Heal,
    RangedHeal,
    Dismantle,
    Repair,
    Say,
}

impl Action {
    /// All actions, in bit order.
    pub const ALL: [Action; 9] = [
        Action::Move,
        Action::Attack,
        Action::RangedAttack,
        Action::RangedMassAttack,
        Action::Heal,
        Action::RangedHeal,
        Action::Dismantle,
        Action::Repair,
        Action::Say,
    ];

    /// Bit of this action inside an [`ActionLog`].
    pub const fn bit(self) -> u16 {
        1 << (self as u16)
    }

    /// Exclusivity groups this action belongs to.
    pub fn groups(self) -> &'static [ActionGroup] {
        match self {
            Action::Attack | Action::Dismantle | Action::Heal => &[ActionGroup::Melee],
            Action::RangedAttack | Action::RangedMassAttack => &[ActionGroup::Ranged],
            Action::Repair | Action::RangedHeal => &[ActionGroup::Melee, ActionGroup::Ranged],
            Action::Move | Action::Say => &[],
        }
    }
}

/// Pipelines of which a creep may use at most one member per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionGroup {
    Melee,
    Ranged,
}

impl ActionGroup {
    /// Bitmask of every action in this group.
    pub const fn members(self) -> u16 {
        match self {
            ActionGroup::Melee => {
                Action::Attack.bit()
                    | Action::Dismantle.bit()
                    | Action::Heal.bit()
                    | Action::Repair.bit()
                    | Action::RangedHeal.bit()
            }
            ActionGroup::Ranged => {
                Action::RangedAttack.bit()
                    | Action::RangedMassAttack.bit()
                    | Action::Repair.bit()
                    | Action::RangedHeal.bit()
            }
        }
    }
}

/// Outcome of a capability call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionResult {
    Ok,
    /// Target is out of range, or the action is still in progress.
    NotInRange,
    InvalidTarget,
    /// The creep is busy or the action conflicts with one already taken this tick.
    Busy,
    NoPath,
}

impl ActionResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, ActionResult::Ok)
    }
}

/// Actions a single creep has successfully executed during the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionLog(u16);

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of an action; only successes occupy a pipeline.
    pub fn record(&mut self, action: Action, result: ActionResult) {
        if result.is_ok() {
            self.0 |= action.bit();
        }
    }

    /// Check whether the action was executed this tick.
    pub fn has(&self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    /// Check whether the action would conflict with one already taken this tick.
    pub fn can_execute(&self, action: Action) -> bool {
        action
            .groups()
            .iter()
            .all(|group| self.0 & group.members() == 0)
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attack_blocks_heal() {
        let mut log = ActionLog::new();
        assert!(log.can_execute(Action::Heal));

        log.record(Action::Attack, ActionResult::Ok);
        assert!(log.has(Action::Attack));
        assert!(!log.can_execute(Action::Heal));
        assert!(!log.can_execute(Action::Dismantle));
        assert!(log.can_execute(Action::RangedAttack));
        assert!(log.can_execute(Action::Move));
    }

    #[test]
    fn test_failed_action_does_not_occupy_pipeline() {
        let mut log = ActionLog::new();
        log.record(Action::Dismantle, ActionResult::NotInRange);
        assert!(log.can_execute(Action::Heal));
    }

    #[test]
    fn test_repair_spans_both_pipelines() {
        let mut log = ActionLog::new();
        log.record(Action::RangedMassAttack, ActionResult::Ok);
        assert!(!log.can_execute(Action::Repair));
        assert!(!log.can_execute(Action::RangedHeal));
        assert!(log.can_execute(Action::Heal));

        log.clear();
        assert!(log.can_execute(Action::Repair));
    }

    #[test]
    fn test_bits_are_distinct() {
        let mut seen = 0u16;
        for action in Action::ALL {
            assert_eq!(seen & action.bit(), 0);
            seen |= action.bit();
        }
    }
}
