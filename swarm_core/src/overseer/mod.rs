//! Overseer - one per colony; runs directives, then overlords in priority
//! order, then the colony-wide reactive checks.
//!
//! Tick protocol:
//! 1. **init**: prune dead creeps from the registry, init every directive in
//!    placement order, then every overlord in ascending priority
//! 2. **run**: run every directive and drop the finished ones, run every
//!    overlord in ascending priority, check safe mode, place new directives
//!
//! New directives are placed after everything else has run, so they first act
//! on the following tick.

mod placement;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::colony::Colony;
use crate::config::SchedulerConfig;
use crate::context::TickContext;
use crate::directives::{Directive, DirectiveId, DirectiveOutcome, DirectiveSnapshot};
use crate::error::{Result, SchedulerError};
use crate::overlords::{Overlord, OverlordId};
use crate::registry::Registry;

/// Persisted overseer record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverseerMemory {
    pub directives: Vec<DirectiveSnapshot>,
}

/// The colony scheduler.
pub struct Overseer {
    colony: Colony,
    config: SchedulerConfig,
    /// Live directives in placement order.
    directives: Vec<Directive>,
    overlords: HashMap<OverlordId, Overlord>,
    /// Overlord ids bucketed by priority; iterated lowest first.
    priorities: BTreeMap<u32, Vec<OverlordId>>,
    registry: Registry,
}

impl Overseer {
    pub fn new(colony: Colony, config: SchedulerConfig) -> Self {
        Self {
            colony,
            config,
            directives: Vec::new(),
            overlords: HashMap::new(),
            priorities: BTreeMap::new(),
            registry: Registry::new(),
        }
    }

    pub fn colony(&self) -> &Colony {
        &self.colony
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn overlord(&self, id: OverlordId) -> Option<&Overlord> {
        self.overlords.get(&id)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    // Registration ===================================================================================================

    /// Add an overlord to its priority bucket.
    pub fn register_overlord(&mut self, overlord: Overlord) -> OverlordId {
        let id = overlord.id;
        tracing::debug!(target: "overseer", overlord = %overlord.name, priority = overlord.priority, "overlord registered");
        self.priorities.entry(overlord.priority).or_default().push(id);
        self.overlords.insert(id, overlord);
        id
    }

    /// Remove an overlord; its creeps become idle.
    pub fn unregister_overlord(&mut self, id: OverlordId) -> Result<Overlord> {
        let overlord = self.overlords.remove(&id).ok_or(SchedulerError::UnknownOverlord(id))?;
        if let Some(bucket) = self.priorities.get_mut(&overlord.priority) {
            bucket.retain(|o| *o != id);
            if bucket.is_empty() {
                self.priorities.remove(&overlord.priority);
            }
        }
        let released = self.registry.release_overlord(id);
        tracing::debug!(target: "overseer", overlord = %overlord.name, released = released.len(), "overlord unregistered");
        Ok(overlord)
    }

    /// Add a directive and register the overlords it owns.
    pub fn place_directive(&mut self, mut directive: Directive) -> DirectiveId {
        for overlord in directive.build_overlords(&self.config) {
            self.register_overlord(overlord);
        }
        let id = directive.id;
        tracing::info!(target: "overseer", directive = %directive.name, colony = %self.colony.name, "directive placed");
        self.directives.push(directive);
        id
    }

    /// Drop a directive and synchronously unregister everything it owns.
    pub fn remove_directive(&mut self, id: DirectiveId) -> Result<Directive> {
        let index = self
            .directives
            .iter()
            .position(|d| d.id == id)
            .ok_or(SchedulerError::UnknownDirective(id))?;
        let directive = self.directives.remove(index);
        for overlord in directive.overlords.values() {
            if let Err(err) = self.unregister_overlord(*overlord) {
                tracing::warn!(target: "overseer", directive = %directive.name, error = %err, "owned overlord already gone");
            }
        }
        tracing::info!(target: "overseer", directive = %directive.name, "directive removed");
        Ok(directive)
    }

    /// Overlord ids in service order.
    pub fn priority_order(&self) -> Vec<OverlordId> {
        self.priorities.values().flatten().copied().collect()
    }

    // Tick ===========================================================================================================

    pub fn init(&mut self, ctx: &mut TickContext<'_>) {
        self.registry.refresh(ctx.world);

        for directive in &mut self.directives {
            if let Err(err) = directive.init(&mut self.overlords, ctx) {
                tracing::warn!(target: "overseer", directive = %directive.name, error = %err, "directive init failed");
            }
        }

        for id in self.priority_order() {
            let Some(overlord) = self.overlords.get_mut(&id) else {
                continue;
            };
            if let Err(err) = overlord.init(&mut self.registry, ctx) {
                tracing::warn!(target: "overseer", overlord = %overlord.name, error = %err, "overlord init failed");
            }
        }
    }

    pub fn run(&mut self, ctx: &mut TickContext<'_>) {
        let finished: Vec<DirectiveId> = self
            .directives
            .iter()
            .filter(|d| d.run(&*ctx, &self.config) == DirectiveOutcome::Remove)
            .map(|d| d.id)
            .collect();
        for id in finished {
            if let Err(err) = self.remove_directive(id) {
                tracing::warn!(target: "overseer", error = %err, "failed to remove directive");
            }
        }

        for id in self.priority_order() {
            let Some(overlord) = self.overlords.get(&id) else {
                continue;
            };
            if let Err(err) = overlord.run(&mut self.registry, ctx) {
                tracing::warn!(target: "overseer", overlord = %overlord.name, error = %err, "overlord run failed");
            }
        }

        self.handle_safe_mode(ctx);
        self.place_directives(ctx.world);

        for directive in &self.directives {
            directive.visuals();
        }
    }

    /// Both phases of one tick.
    pub fn tick(&mut self, ctx: &mut TickContext<'_>) {
        self.init(ctx);
        self.run(ctx);
    }

    // Reporting ======================================================================================================

    /// `(current, needed)` per role summed over every overlord.
    pub fn creep_usage_report(&self) -> BTreeMap<String, (usize, usize)> {
        let mut occupancy: BTreeMap<String, (usize, usize)> = BTreeMap::new();
        for id in self.priority_order() {
            let Some(overlord) = self.overlords.get(&id) else {
                continue;
            };
            for (role, report) in overlord.usage_report() {
                match report {
                    Some((current, needed)) => {
                        let entry = occupancy.entry(role.clone()).or_default();
                        entry.0 += current;
                        entry.1 += needed;
                    }
                    None => {
                        tracing::warn!(target: "overseer", overlord = %overlord.name, role, "role is not reported");
                    }
                }
            }
        }
        occupancy
    }

    // Memory =========================================================================================================

    pub fn save_memory(&self) -> Result<serde_json::Value> {
        let memory = OverseerMemory {
            directives: self.directives.iter().map(Directive::snapshot).collect(),
        };
        Ok(serde_json::to_value(memory)?)
    }

    /// Re-create directives from a saved record. Directives already present
    /// (same kind at the same position) are skipped.
    pub fn restore_memory(&mut self, value: serde_json::Value) -> Result<usize> {
        let memory: OverseerMemory = serde_json::from_value(value)?;
        let mut restored = 0;
        for snapshot in memory.directives {
            let exists = self
                .directives
                .iter()
                .any(|d| d.kind == snapshot.kind && d.pos == snapshot.pos);
            if exists {
                continue;
            }
            self.place_directive(Directive::from_snapshot(snapshot));
            restored += 1;
        }
        Ok(restored)
    }
}
