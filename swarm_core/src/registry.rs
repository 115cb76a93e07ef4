//! Assignment registry - which creep serves which overlord, and what it is doing.
//!
//! The registry is owned by the overseer and passed by reference to every
//! component that needs it. Every mutation keeps three indices in step:
//! - creep -> overlord (at most one)
//! - overlord -> role -> creeps (the cache buckets overlords read)
//! - task target -> creeps currently holding a task on it

use std::collections::{BTreeMap, BTreeSet, HashMap};
use swarm_world::{ActionResult, Creep, CreepId, EntityRef, WorldState};

use crate::commands::CommandGate;
use crate::error::{Result, SchedulerError};
use crate::overlords::OverlordId;
use crate::tasks::Task;

#[derive(Debug, Clone)]
struct Assignment {
    overlord: OverlordId,
    role: String,
}

#[derive(Debug, Default)]
pub struct Registry {
    assignments: HashMap<CreepId, Assignment>,
    buckets: HashMap<OverlordId, BTreeMap<String, Vec<CreepId>>>,
    tasks: HashMap<CreepId, Task>,
    targets: HashMap<EntityRef, BTreeSet<CreepId>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlord a creep currently serves.
    pub fn overlord_of(&self, creep: CreepId) -> Option<OverlordId> {
        self.assignments.get(&creep).map(|a| a.overlord)
    }

    /// Creeps of a role assigned to an overlord, in assignment order.
    pub fn creeps(&self, overlord: OverlordId, role: &str) -> Vec<CreepId> {
        self.buckets
            .get(&overlord)
            .and_then(|roles| roles.get(role))
            .cloned()
            .unwrap_or_default()
    }

    /// All creeps assigned to an overlord.
    pub fn all_creeps(&self, overlord: OverlordId) -> Vec<CreepId> {
        self.buckets
            .get(&overlord)
            .map(|roles| roles.values().flatten().copied().collect())
            .unwrap_or_default()
    }

    /// Move a creep from one overlord to another as a single step.
    ///
    /// `from` must match the creep's current assignment. The creep leaves the
    /// old bucket before it enters the new one; `to = None` makes it idle.
    pub fn reassign(
        &mut self,
        creep: CreepId,
        role: &str,
        from: Option<OverlordId>,
        to: Option<OverlordId>,
    ) -> Result<()> {
        let actual = self.overlord_of(creep);
        if actual != from {
            return Err(SchedulerError::AssignmentMismatch {
                creep,
                expected: from,
                actual,
            });
        }

        if let Some(old) = self.assignments.remove(&creep) {
            self.remove_from_bucket(creep, &old);
        }

        if let Some(overlord) = to {
            self.buckets
                .entry(overlord)
                .or_default()
                .entry(role.to_string())
                .or_default()
                .push(creep);
            self.assignments.insert(
                creep,
                Assignment {
                    overlord,
                    role: role.to_string(),
                },
            );
        }

        tracing::debug!(target: "registry", creep = %creep, role, ?from, ?to, "creep reassigned");
        Ok(())
    }

    /// Assign a creep to an overlord, wherever it currently is.
    pub fn assign(&mut self, creep: CreepId, role: &str, overlord: OverlordId) -> Result<()> {
        let from = self.overlord_of(creep);
        self.reassign(creep, role, from, Some(overlord))
    }

    fn remove_from_bucket(&mut self, creep: CreepId, assignment: &Assignment) {
        if let Some(roles) = self.buckets.get_mut(&assignment.overlord) {
            if let Some(bucket) = roles.get_mut(&assignment.role) {
                bucket.retain(|c| *c != creep);
                if bucket.is_empty() {
                    roles.remove(&assignment.role);
                }
            }
            if roles.is_empty() {
                self.buckets.remove(&assignment.overlord);
            }
        }
    }

    /// Drop an overlord's bucket; its creeps become idle and lose their tasks.
    pub fn release_overlord(&mut self, overlord: OverlordId) -> Vec<CreepId> {
        let released: Vec<CreepId> = self
            .buckets
            .remove(&overlord)
            .map(|roles| roles.into_values().flatten().collect())
            .unwrap_or_default();
        for creep in &released {
            self.assignments.remove(creep);
            self.set_task(*creep, None);
        }
        released
    }

    pub fn task(&self, creep: CreepId) -> Option<&Task> {
        self.tasks.get(&creep)
    }

    /// A creep with no task is idle.
    pub fn is_idle(&self, creep: CreepId) -> bool {
        !self.tasks.contains_key(&creep)
    }

    /// Replace a creep's task, keeping the target index in step.
    pub fn set_task(&mut self, creep: CreepId, task: Option<Task>) {
        if let Some(old) = self.tasks.remove(&creep) {
            self.unregister_target(creep, &old);
        }
        if let Some(task) = task {
            if let Some(target) = task.target() {
                self.targets.entry(target).or_default().insert(creep);
            }
            self.tasks.insert(creep, task);
        }
    }

    fn unregister_target(&mut self, creep: CreepId, task: &Task) {
        if let Some(target) = task.target() {
            if let Some(creeps) = self.targets.get_mut(&target) {
                creeps.remove(&creep);
                if creeps.is_empty() {
                    self.targets.remove(&target);
                }
            }
        }
    }

    /// Creeps whose current task targets this entity.
    pub fn targeted_by(&self, target: EntityRef) -> Vec<CreepId> {
        self.targets
            .get(&target)
            .map(|creeps| creeps.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Re-derive the creep's task from the current world.
    ///
    /// Invalid tasks are popped until a valid ancestor remains; returns whether
    /// the creep still has a task.
    pub fn validate_task(&mut self, creep: &Creep, world: &WorldState) -> bool {
        let Some(task) = self.tasks.remove(&creep.id) else {
            return false;
        };
        self.unregister_target(creep.id, &task);
        let name = task.name();

        let outcome = task.validate(creep, world);
        if outcome.fell_back() {
            tracing::debug!(
                target: "task",
                creep = %creep.id,
                task = name,
                detached = outcome.detached,
                remaining = outcome.task.is_some(),
                "task invalidated"
            );
        }
        let has_task = outcome.task.is_some();
        self.set_task(creep.id, outcome.task);
        has_task
    }

    /// Validate then run the creep's task. `None` when the creep ends up idle.
    pub fn run_task(&mut self, creep: &Creep, world: &WorldState, commands: &mut CommandGate<'_>) -> Option<ActionResult> {
        if !self.validate_task(creep, world) {
            return None;
        }
        self.tasks.get(&creep.id).map(|task| task.run(creep, commands))
    }

    /// Forget creeps that no longer exist.
    pub fn refresh(&mut self, world: &WorldState) {
        let dead: Vec<CreepId> = self
            .assignments
            .keys()
            .chain(self.tasks.keys())
            .filter(|id| world.creep(**id).is_none())
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        for creep in dead {
            if let Some(old) = self.assignments.remove(&creep) {
                self.remove_from_bucket(creep, &old);
            }
            self.set_task(creep, None);
            tracing::trace!(target: "registry", creep = %creep, "pruned dead creep");
        }
    }

    /// Verify every assigned creep sits in exactly one bucket, the one its assignment names.
    pub fn check_invariants(&self) -> Result<()> {
        let mut seen: HashMap<CreepId, usize> = HashMap::new();
        for (overlord, roles) in &self.buckets {
            for (role, creeps) in roles {
                for creep in creeps {
                    *seen.entry(*creep).or_default() += 1;
                    let assignment = self.assignments.get(creep);
                    let matches = assignment
                        .is_some_and(|a| a.overlord == *overlord && &a.role == role);
                    if !matches {
                        return Err(SchedulerError::AssignmentMismatch {
                            creep: *creep,
                            expected: Some(*overlord),
                            actual: assignment.map(|a| a.overlord),
                        });
                    }
                }
            }
        }
        for (creep, assignment) in &self.assignments {
            if seen.get(creep).copied() != Some(1) {
                return Err(SchedulerError::AssignmentMismatch {
                    creep: *creep,
                    expected: Some(assignment.overlord),
                    actual: None,
                });
            }
        }
        Ok(())
    }
}
