//! Overlords - priority-ranked units that request creeps and direct them.
//!
//! Every overlord runs the same two-phase protocol each tick:
//! 1. **init**: pull idle creeps of pooled roles into its bucket, then declare
//!    spawn demand through the wishlist
//! 2. **run**: drive each assigned creep, either through its task chain or
//!    with direct commands
//!
//! The set of assigned creeps is always read from the registry, never cached
//! across ticks.

mod bootstrap;
pub mod combat;
mod fortify;
mod guard;
mod siege;

pub use bootstrap::*;
pub use fortify::*;
pub use guard::*;
pub use siege::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use swarm_world::{Creep, Position};
use uuid::Uuid;

use crate::context::TickContext;
use crate::directives::DirectiveId;
use crate::error::Result;
use crate::interfaces::{CreepSetup, SpawnRequest};
use crate::registry::Registry;

/// Unique identifier for an overlord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OverlordId(pub Uuid);

impl OverlordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OverlordId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OverlordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Behavior of an overlord, with only the data that behavior needs.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlordKind {
    Guard(GuardOverlord),
    Siege(SiegeOverlord),
    Fortify(FortifyOverlord),
    Bootstrap(BootstrapOverlord),
}

impl OverlordKind {
    pub fn name(&self) -> &'static str {
        match self {
            OverlordKind::Guard(_) => "guard",
            OverlordKind::Siege(_) => "siege",
            OverlordKind::Fortify(_) => "fortify",
            OverlordKind::Bootstrap(_) => "bootstrap",
        }
    }

    /// Roles whose unassigned creeps this overlord adopts during init.
    pub fn pooled_roles(&self) -> &'static [&'static str] {
        match self {
            OverlordKind::Guard(_) => &[GUARD_ROLE],
            OverlordKind::Fortify(_) => &[FORTIFIER_ROLE],
            OverlordKind::Siege(_) | OverlordKind::Bootstrap(_) => &[],
        }
    }

    /// Creeps wanted per body template.
    pub fn demand(&self) -> Vec<(CreepSetup, usize)> {
        match self {
            OverlordKind::Guard(guard) => vec![(CreepSetup::guard(), guard.amount)],
            OverlordKind::Siege(siege) => vec![(CreepSetup::sieger(), siege.amount)],
            OverlordKind::Fortify(fortify) => vec![(CreepSetup::fortifier(), fortify.amount)],
            OverlordKind::Bootstrap(_) => BootstrapOverlord::demand(),
        }
    }
}

/// An assignment unit registered with the overseer.
#[derive(Debug, Clone)]
pub struct Overlord {
    pub id: OverlordId,
    /// Unique name, `<directive>:<kind>`.
    pub name: String,
    pub colony: String,
    /// Owning directive, if any.
    pub directive: Option<DirectiveId>,
    /// Lower is serviced first.
    pub priority: u32,
    /// Anchor position, usually the owning directive's.
    pub pos: Position,
    pub kind: OverlordKind,
    /// `(current, needed)` per role, `None` until the role has been wishlisted.
    usage: BTreeMap<String, Option<(usize, usize)>>,
}

impl Overlord {
    pub fn new(
        name: impl Into<String>,
        colony: impl Into<String>,
        priority: u32,
        pos: Position,
        kind: OverlordKind,
    ) -> Self {
        let usage = kind
            .demand()
            .into_iter()
            .map(|(setup, _)| (setup.role, None))
            .collect();
        Self {
            id: OverlordId::new(),
            name: name.into(),
            colony: colony.into(),
            directive: None,
            priority,
            pos,
            kind,
            usage,
        }
    }

    pub fn with_directive(mut self, directive: DirectiveId) -> Self {
        self.directive = Some(directive);
        self
    }

    /// Live creeps of a role assigned to this overlord.
    pub fn creeps<'w>(&self, registry: &Registry, ctx: &TickContext<'w>, role: &str) -> Vec<&'w Creep> {
        let world = ctx.world;
        registry
            .creeps(self.id, role)
            .into_iter()
            .filter_map(|id| world.creep(id))
            .collect()
    }

    /// Adopt every creep of the colony with this role that serves no overlord.
    pub fn reassign_idle_creeps(&self, registry: &mut Registry, ctx: &TickContext<'_>, role: &str) -> Result<usize> {
        let mut adopted = 0;
        for creep in ctx.world.creeps_by_role(&self.colony, role) {
            if registry.overlord_of(creep.id).is_none() {
                registry.reassign(creep.id, role, None, Some(self.id))?;
                adopted += 1;
            }
        }
        if adopted > 0 {
            tracing::debug!(target: "overlord", overlord = %self.name, role, adopted, "adopted idle creeps");
        }
        Ok(adopted)
    }

    /// Declare demand for `count` creeps of a template to the spawn queue.
    pub fn wishlist(&mut self, registry: &Registry, ctx: &mut TickContext<'_>, count: usize, setup: CreepSetup) {
        let current = registry.creeps(self.id, &setup.role).len();
        self.usage.insert(setup.role.clone(), Some((current, count)));
        ctx.spawns.wishlist(SpawnRequest {
            overlord: self.id,
            priority: self.priority,
            count,
            setup,
        });
    }

    /// Adopt idle creeps, then wishlist. Demand is declared even when adoption
    /// fails; the first adoption error is returned afterwards.
    pub fn init(&mut self, registry: &mut Registry, ctx: &mut TickContext<'_>) -> Result<()> {
        let mut adoption = Ok(());
        for role in self.kind.pooled_roles() {
            if let Err(err) = self.reassign_idle_creeps(registry, ctx, role) {
                tracing::warn!(target: "overlord", overlord = %self.name, role, error = %err, "failed to adopt idle creeps");
                if adoption.is_ok() {
                    adoption = Err(err);
                }
            }
        }
        for (setup, count) in self.kind.demand() {
            self.wishlist(registry, ctx, count, setup);
        }
        adoption
    }

    pub fn run(&self, registry: &mut Registry, ctx: &mut TickContext<'_>) -> Result<()> {
        match &self.kind {
            OverlordKind::Guard(guard) => guard.run(self, registry, ctx),
            OverlordKind::Siege(siege) => siege.run(self, registry, ctx),
            OverlordKind::Fortify(fortify) => fortify.run(self, registry, ctx),
            OverlordKind::Bootstrap(bootstrap) => bootstrap.run(self, registry, ctx),
        }
    }

    pub fn usage_report(&self) -> &BTreeMap<String, Option<(usize, usize)>> {
        &self.usage
    }
}
