//! Tasks - resumable units of work bound to a single creep.
//!
//! A task is re-validated against the current world every tick before it is
//! worked. Tasks chain through an owned parent link: when the head becomes
//! invalid it is detached and the parent takes over, until a valid ancestor
//! is found or the chain runs out and the creep goes idle.

use serde::{Deserialize, Serialize};
use swarm_world::{ActionResult, BodyPartType, Creep, EntityRef, Position, Structure, StructureId, WorldState};

use crate::commands::CommandGate;
use crate::interfaces::TravelOptions;

/// What a task does, with only the data its behavior needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    /// Walk until within range of the target position.
    GoTo,
    /// Take a structure apart with work parts.
    Dismantle(StructureId),
    /// Repair a wall or rampart with carried energy.
    Fortify(StructureId),
}

impl TaskKind {
    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::GoTo => "goTo",
            TaskKind::Dismantle(_) => "dismantle",
            TaskKind::Fortify(_) => "fortify",
        }
    }
}

/// Numeric and behavioral parameters of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSettings {
    /// Range at which the task can be worked.
    pub target_range: u32,
    /// Step off roads while working so traffic can pass.
    pub work_off_road: bool,
}

impl Default for TaskSettings {
    fn default() -> Self {
        Self {
            target_range: 1,
            work_off_road: false,
        }
    }
}

/// A unit of work, optionally resting on a parent task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub kind: TaskKind,
    pub target_pos: Position,
    pub settings: TaskSettings,
    pub travel: TravelOptions,
    parent: Option<Box<Task>>,
}

/// Result of unwinding a task chain.
#[derive(Debug)]
pub struct TaskValidation {
    /// The first valid task in the chain, if any.
    pub task: Option<Task>,
    /// How many invalid tasks were detached on the way.
    pub detached: usize,
}

impl TaskValidation {
    pub fn fell_back(&self) -> bool {
        self.detached > 0
    }
}

impl Task {
    fn new(kind: TaskKind, target_pos: Position, settings: TaskSettings) -> Self {
        Self {
            kind,
            target_pos,
            settings,
            travel: TravelOptions::default(),
            parent: None,
        }
    }

    /// Travel to a position.
    pub fn go_to(pos: Position) -> Self {
        Self::new(TaskKind::GoTo, pos, TaskSettings::default())
    }

    pub fn dismantle(target: &Structure) -> Self {
        Self::new(
            TaskKind::Dismantle(target.id),
            target.pos.clone(),
            TaskSettings::default(),
        )
    }

    /// Repair a barrier. Worked from range 3, off the road.
    pub fn fortify(target: &Structure) -> Self {
        Self::new(
            TaskKind::Fortify(target.id),
            target.pos.clone(),
            TaskSettings {
                target_range: 3,
                work_off_road: true,
            },
        )
    }

    pub fn with_range(mut self, range: u32) -> Self {
        self.settings.target_range = range;
        self
    }

    pub fn with_travel(mut self, travel: TravelOptions) -> Self {
        self.travel = travel;
        self
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Entity this task acts on; positional tasks have none.
    pub fn target(&self) -> Option<EntityRef> {
        match self.kind {
            TaskKind::GoTo => None,
            TaskKind::Dismantle(id) | TaskKind::Fortify(id) => Some(EntityRef::Structure(id)),
        }
    }

    pub fn parent(&self) -> Option<&Task> {
        self.parent.as_deref()
    }

    /// Number of tasks in the chain, this one included.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.parent();
        while let Some(task) = current {
            depth += 1;
            current = task.parent();
        }
        depth
    }

    /// Put `child` in front of this task; this task resumes once the child is done.
    pub fn fork(self, mut child: Task) -> Task {
        child.parent = Some(Box::new(self));
        child
    }

    /// Can this creep perform this kind of task at all right now?
    pub fn is_valid_task(&self, creep: &Creep) -> bool {
        match self.kind {
            TaskKind::GoTo => !creep.pos.in_range_to(&self.target_pos, self.settings.target_range),
            TaskKind::Dismantle(_) => creep.active_parts(BodyPartType::Work) > 0,
            TaskKind::Fortify(_) => creep.carry_energy > 0,
        }
    }

    /// Is the target still worth working on?
    pub fn is_valid_target(&self, world: &WorldState) -> bool {
        match self.kind {
            TaskKind::GoTo => true,
            TaskKind::Dismantle(id) => world.structure(id).is_some_and(|s| s.hits > 0),
            // Undamaged-but-not-max barriers still qualify so a trip tops them off.
            TaskKind::Fortify(id) => world.structure(id).is_some_and(|s| s.hits < s.hits_max),
        }
    }

    /// Validity of this task alone, ignoring the parent chain.
    pub fn is_valid(&self, creep: &Creep, world: &WorldState) -> bool {
        self.is_valid_task(creep) && self.is_valid_target(world)
    }

    /// Unwind the chain until a valid task is found.
    ///
    /// Every invalid task on the way is detached and dropped; the returned
    /// task, if any, is the new head.
    pub fn validate(self, creep: &Creep, world: &WorldState) -> TaskValidation {
        let mut current = Some(self);
        let mut detached = 0;
        while let Some(mut task) = current {
            if task.is_valid(creep, world) {
                return TaskValidation {
                    task: Some(task),
                    detached,
                };
            }
            detached += 1;
            current = task.parent.take().map(|parent| *parent);
        }
        TaskValidation {
            task: None,
            detached,
        }
    }

    /// Perform the task's single capability action.
    pub fn work(&self, creep: &Creep, commands: &mut CommandGate<'_>) -> ActionResult {
        match self.kind {
            TaskKind::GoTo => ActionResult::Ok,
            TaskKind::Dismantle(id) => commands.dismantle(creep.id, id),
            TaskKind::Fortify(id) => commands.repair(creep.id, id),
        }
    }

    /// Work the task if in range, otherwise move toward its target.
    pub fn run(&self, creep: &Creep, commands: &mut CommandGate<'_>) -> ActionResult {
        let range = self.settings.target_range;
        if creep.pos.in_range_to(&self.target_pos, range) {
            self.work(creep, commands)
        } else {
            let options = TravelOptions {
                range,
                off_road: self.settings.work_off_road,
                ..self.travel.clone()
            };
            commands.travel_to(creep.id, &self.target_pos, &options)
        }
    }
}

impl Drop for Task {
    // Unlink iteratively so long chains never recurse.
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(mut task) = next {
            next = task.parent.take();
        }
    }
}
