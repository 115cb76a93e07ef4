//! Directives - positioned objectives that own overlords and remove themselves
//! once their condition is met.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use swarm_world::{Creep, Position, RoomName, WorldState};
use uuid::Uuid;

use crate::config::SchedulerConfig;
use crate::context::TickContext;
use crate::error::{Result, SchedulerError};
use crate::overlords::{
    BootstrapOverlord, FortifyOverlord, GuardOverlord, Overlord, OverlordId, OverlordKind, SiegeOverlord, MINER_ROLE,
    QUEEN_ROLE,
};

/// Unique identifier for a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DirectiveId(pub Uuid);

impl DirectiveId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DirectiveId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DirectiveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kinds of objective the overseer knows how to run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DirectiveKind {
    /// Defend a remote room against hostiles.
    Guard,
    /// Hold a room with a configurable number of guards.
    GuardSwarm,
    /// Defend the home room against a large attack.
    InvasionDefense,
    /// Rebuild the economy after a crash.
    Bootstrap,
    /// Break down a hostile room.
    Siege { recovery_waypoint: Option<Position> },
}

impl DirectiveKind {
    pub fn name(&self) -> &'static str {
        match self {
            DirectiveKind::Guard => "guard",
            DirectiveKind::GuardSwarm => "guardSwarm",
            DirectiveKind::InvasionDefense => "invasionDefense",
            DirectiveKind::Bootstrap => "bootstrap",
            DirectiveKind::Siege { .. } => "siege",
        }
    }

    /// Kinds that count as room defense when checking for existing coverage.
    pub fn is_defense(&self) -> bool {
        matches!(
            self,
            DirectiveKind::Guard | DirectiveKind::GuardSwarm | DirectiveKind::InvasionDefense
        )
    }
}

/// Per-directive persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveMemory {
    /// Tick the directive was created.
    pub created: u32,
    /// Persistent directives never remove themselves.
    #[serde(default)]
    pub persistent: bool,
    /// Cached creep count, for kinds that size their overlords.
    #[serde(default)]
    pub amount: Option<usize>,
}

impl DirectiveMemory {
    pub fn new(created: u32) -> Self {
        Self {
            created,
            persistent: false,
            amount: None,
        }
    }
}

/// Whether a directive stays alive after this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveOutcome {
    Continue,
    Remove,
}

/// What gets saved for a directive between resets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectiveSnapshot {
    pub kind: DirectiveKind,
    pub pos: Position,
    pub colony: String,
    pub memory: DirectiveMemory,
}

/// A placed objective.
#[derive(Debug, Clone)]
pub struct Directive {
    pub id: DirectiveId,
    pub name: String,
    pub kind: DirectiveKind,
    pub pos: Position,
    pub colony: String,
    pub memory: DirectiveMemory,
    /// Owned overlords by role name.
    pub overlords: BTreeMap<String, OverlordId>,
}

impl Directive {
    pub fn new(kind: DirectiveKind, pos: Position, colony: impl Into<String>, created: u32) -> Self {
        Self {
            id: DirectiveId::new(),
            name: format!("{}@{}", kind.name(), pos),
            kind,
            pos,
            colony: colony.into(),
            memory: DirectiveMemory::new(created),
            overlords: BTreeMap::new(),
        }
    }

    pub fn persistent(mut self) -> Self {
        self.memory.persistent = true;
        self
    }

    pub fn with_amount(mut self, amount: usize) -> Self {
        self.memory.amount = Some(amount);
        self
    }

    pub fn room(&self) -> &RoomName {
        &self.pos.room
    }

    /// Create the overlords this directive owns and remember them by role.
    pub fn build_overlords(&mut self, config: &SchedulerConfig) -> Vec<Overlord> {
        let priorities = &config.priorities;
        let units: Vec<(&str, u32, OverlordKind)> = match &self.kind {
            DirectiveKind::Guard => vec![("guard", priorities.guard, OverlordKind::Guard(GuardOverlord::default()))],
            DirectiveKind::GuardSwarm => vec![(
                "guard",
                priorities.guard,
                OverlordKind::Guard(GuardOverlord {
                    amount: self.memory.amount.unwrap_or(1),
                }),
            )],
            DirectiveKind::InvasionDefense => vec![
                (
                    "guard",
                    priorities.invasion_defense,
                    OverlordKind::Guard(GuardOverlord::default()),
                ),
                (
                    "fortify",
                    priorities.fortify,
                    OverlordKind::Fortify(FortifyOverlord { amount: 1 }),
                ),
            ],
            DirectiveKind::Bootstrap => vec![(
                "bootstrap",
                priorities.bootstrap,
                OverlordKind::Bootstrap(BootstrapOverlord),
            )],
            DirectiveKind::Siege { recovery_waypoint } => vec![(
                "siege",
                priorities.siege,
                OverlordKind::Siege(SiegeOverlord::new(
                    recovery_waypoint.clone(),
                    config.siege.retreat_hits_ratio,
                    config.siege.sieger_amount,
                )),
            )],
        };

        units
            .into_iter()
            .map(|(role, priority, kind)| {
                let overlord = Overlord::new(
                    format!("{}:{}", self.name, role),
                    self.colony.clone(),
                    priority,
                    self.pos.clone(),
                    kind,
                )
                .with_directive(self.id);
                self.overlords.insert(role.to_string(), overlord.id);
                overlord
            })
            .collect()
    }

    fn overlord_mut<'o>(
        &self,
        overlords: &'o mut HashMap<OverlordId, Overlord>,
        role: &str,
    ) -> Result<&'o mut Overlord> {
        let id = self
            .overlords
            .get(role)
            .copied()
            .ok_or_else(|| SchedulerError::MissingRole {
                directive: self.id,
                role: role.to_string(),
            })?;
        overlords.get_mut(&id).ok_or(SchedulerError::UnknownOverlord(id))
    }

    /// Size owned overlords from the current world before they declare demand.
    pub fn init(&mut self, overlords: &mut HashMap<OverlordId, Overlord>, ctx: &TickContext<'_>) -> Result<()> {
        let amount = match self.kind {
            DirectiveKind::InvasionDefense => {
                let hostiles = ctx.world.hostiles(self.room());
                let amount = effective_hostile_count(&hostiles).max(1);
                self.memory.amount = Some(amount);
                amount
            }
            DirectiveKind::GuardSwarm => self.memory.amount.unwrap_or(1),
            _ => return Ok(()),
        };

        if let OverlordKind::Guard(guard) = &mut self.overlord_mut(overlords, "guard")?.kind {
            guard.amount = amount;
        }
        Ok(())
    }

    /// Check the completion condition.
    pub fn run(&self, ctx: &TickContext<'_>, config: &SchedulerConfig) -> DirectiveOutcome {
        let world = ctx.world;
        let done = match &self.kind {
            DirectiveKind::Guard | DirectiveKind::GuardSwarm | DirectiveKind::InvasionDefense => {
                self.defense_cleared(world, config.defense_grace_ticks)
            }
            DirectiveKind::Bootstrap => {
                let recovered = !world.creeps_by_role(&self.colony, MINER_ROLE).is_empty()
                    && !world.creeps_by_role(&self.colony, QUEEN_ROLE).is_empty();
                let energy = world.room(self.room()).map(|r| r.energy_available).unwrap_or(0);
                recovered || energy >= config.emergency_energy_threshold
            }
            DirectiveKind::Siege { .. } => {
                !self.memory.persistent
                    && world
                        .room(self.room())
                        .is_some_and(|_| world.hostile_structures(self.room()).is_empty())
            }
        };

        if done {
            tracing::info!(target: "directive", directive = %self.name, "objective complete");
            DirectiveOutcome::Remove
        } else {
            DirectiveOutcome::Continue
        }
    }

    /// Non-persistent, past the grace period, room visible and clear, nobody hurt.
    fn defense_cleared(&self, world: &WorldState, grace: u32) -> bool {
        if self.memory.persistent || world.time.saturating_sub(self.memory.created) < grace {
            return false;
        }
        let room = self.room();
        if world.room(room).is_none() {
            return false;
        }
        world.hostiles(room).is_empty()
            && world.hostile_structures(room).is_empty()
            && world.creeps_in(room).iter().all(|c| !c.is_damaged())
    }

    /// Hook for drawing; directives draw nothing by default.
    pub fn visuals(&self) {}

    pub fn snapshot(&self) -> DirectiveSnapshot {
        DirectiveSnapshot {
            kind: self.kind.clone(),
            pos: self.pos.clone(),
            colony: self.colony.clone(),
            memory: self.memory.clone(),
        }
    }

    pub fn from_snapshot(snapshot: DirectiveSnapshot) -> Self {
        let mut directive = Self::new(snapshot.kind, snapshot.pos, snapshot.colony, snapshot.memory.created);
        directive.memory = snapshot.memory;
        directive
    }
}

/// Hostile headcount where boosted creeps count double.
pub fn effective_hostile_count(hostiles: &[&Creep]) -> usize {
    hostiles.iter().map(|h| if h.is_boosted() { 2 } else { 1 }).sum()
}
