//! Per-actor ability coordination.
//!
//! [`AbilityManager`] owns every ability granted to one actor and enforces the
//! cross-ability rules: a single active cast with one queued follow-up, and
//! the shared global cooldown that gates instant casts.
//!
//! ```text
//! try_cast ──▶ idle? ── begin ──▶ current
//!                 └──── busy ────▶ queued (replaces older request)
//!
//! tick(dt): cooldowns(all) ──▶ advance current | start queued
//! ```

mod error;
mod queue;
mod snapshot;

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::ability::{
    Ability, AbilityComponent, AbilityDefinition, AbilityEvent, AbilityId, CancelReason,
    CastContext, CastResolution, CastTarget, Rejection, TargetMode, UseOutcome,
};
use crate::config::EngineConfig;
use crate::env::{ActorId, CastEnv};
use crate::formula::{BindReport, Bindable, FormulaRegistry};

pub use error::ManagerError;
pub use queue::{CastQueue, PendingCast};
pub use snapshot::{AbilitySnapshot, ManagerSnapshot};

/// Result of a cast request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CastOutcome {
    /// The ability entered Targeting and is now the current cast.
    Started,
    /// Another cast is active; the request waits in the queued slot.
    Queued,
    Rejected(Rejection),
}

impl CastOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started)
    }
}

#[derive(Debug)]
struct Granted {
    ability: Ability,
    grants: u32,
}

/// Owns and drives the abilities of a single actor.
#[derive(Debug)]
pub struct AbilityManager {
    actor: ActorId,
    registry: Arc<FormulaRegistry>,
    config: EngineConfig,
    abilities: BTreeMap<AbilityId, Granted>,
    queue: CastQueue,
    global_cooldown: f64,
    events: Vec<AbilityEvent>,
}

impl AbilityManager {
    pub fn new(actor: ActorId, registry: Arc<FormulaRegistry>, config: EngineConfig) -> Self {
        Self {
            actor,
            registry,
            config,
            abilities: BTreeMap::new(),
            queue: CastQueue::default(),
            global_cooldown: 0.0,
            events: Vec::new(),
        }
    }

    pub fn actor(&self) -> ActorId {
        self.actor
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<FormulaRegistry> {
        &self.registry
    }

    // ===== grants =====

    /// Grants an ability, or adds a reference if it is already granted.
    ///
    /// The first grant builds the ability and binds its formulas; later
    /// grants ignore `definition`. Returns the new grant count.
    pub fn grant(&mut self, definition: AbilityDefinition) -> Result<u32, ManagerError> {
        if let Some(granted) = self.abilities.get_mut(&definition.id) {
            granted.grants += 1;
            debug!(
                target: "ability::manager",
                actor = %self.actor,
                ability = %definition.id,
                grants = granted.grants,
                "grant reference added"
            );
            return Ok(granted.grants);
        }

        let id = definition.id.clone();
        let ability = Ability::from_definition(definition, &self.registry)?;
        info!(
            target: "ability::manager",
            actor = %self.actor,
            ability = %id,
            "ability granted"
        );
        self.abilities.insert(id, Granted { ability, grants: 1 });
        Ok(1)
    }

    /// Drops one grant reference. The last revoke destroys the ability,
    /// interrupting it if it is the current cast.
    ///
    /// Returns the remaining grant count.
    pub fn revoke(&mut self, id: &AbilityId) -> Result<u32, ManagerError> {
        let granted = self
            .abilities
            .get_mut(id)
            .ok_or_else(|| ManagerError::AbilityNotFound(id.clone()))?;
        granted.grants -= 1;
        if granted.grants > 0 {
            return Ok(granted.grants);
        }

        if let Some(mut granted) = self.abilities.remove(id) {
            if granted.ability.interrupt() {
                debug!(target: "ability::manager", ability = %id, "revoked ability interrupted");
            }
            self.events.append(&mut granted.ability.drain_events());
        }
        self.queue.forget(id);
        info!(
            target: "ability::manager",
            actor = %self.actor,
            ability = %id,
            "ability revoked"
        );
        Ok(0)
    }

    pub fn grants(&self, id: &AbilityId) -> u32 {
        self.abilities.get(id).map_or(0, |g| g.grants)
    }

    pub fn add_component(
        &mut self,
        id: &AbilityId,
        component: Box<dyn AbilityComponent>,
    ) -> Result<(), ManagerError> {
        self.lookup_mut(id)?.add_component(component);
        Ok(())
    }

    // ===== casting =====

    /// Requests a cast of `id`.
    ///
    /// When idle the ability is started immediately (it advances on the next
    /// [`tick`](Self::tick)). When another cast is active the request is
    /// queued, replacing any earlier queued request.
    pub fn try_cast(
        &mut self,
        id: &AbilityId,
        context: CastContext,
        env: &dyn CastEnv,
    ) -> Result<CastOutcome, ManagerError> {
        if !self.abilities.contains_key(id) {
            debug!(target: "ability::manager", ability = %id, "cast of unknown ability");
            return Err(ManagerError::AbilityNotFound(id.clone()));
        }

        if let Some(current) = self.queue.current() {
            if current == id || !self.config.queue_while_casting {
                return Ok(self.reject(id, Rejection::Busy));
            }
            let displaced = self.queue.enqueue(PendingCast {
                ability: id.clone(),
                context,
            });
            debug!(
                target: "ability::manager",
                ability = %id,
                displaced = ?displaced.map(|p| p.ability),
                "cast queued"
            );
            return Ok(CastOutcome::Queued);
        }

        Ok(self.start(id, &context, env))
    }

    fn start(&mut self, id: &AbilityId, context: &CastContext, env: &dyn CastEnv) -> CastOutcome {
        if self.held_by_global_cooldown(id) {
            return self.reject(id, Rejection::GlobalCooldown);
        }
        let Some(granted) = self.abilities.get_mut(id) else {
            return CastOutcome::Rejected(Rejection::Busy);
        };
        let ability = &mut granted.ability;

        let outcome = ability.begin(context, env);
        self.events.append(&mut ability.drain_events());
        match outcome {
            UseOutcome::Started => {
                self.queue.set_current(id.clone());
                CastOutcome::Started
            }
            UseOutcome::Rejected(rejection) => CastOutcome::Rejected(rejection),
        }
    }

    /// True while the global cooldown runs and `id` is an instant that
    /// respects it.
    fn held_by_global_cooldown(&mut self, id: &AbilityId) -> bool {
        if self.global_cooldown <= 0.0 {
            return false;
        }
        let registry = &self.registry;
        self.abilities.get_mut(id).is_some_and(|granted| {
            !granted.ability.ignores_global_cooldown() && granted.ability.is_instant(registry)
        })
    }

    fn reject(&mut self, id: &AbilityId, rejection: Rejection) -> CastOutcome {
        debug!(
            target: "ability::manager",
            ability = %id,
            %rejection,
            "cast rejected"
        );
        self.events.push(AbilityEvent::CastRejected {
            ability: id.clone(),
            reason: rejection.clone(),
        });
        CastOutcome::Rejected(rejection)
    }

    /// Advances the actor by `dt` seconds.
    ///
    /// Every charge cooldown and the global cooldown elapse. Then exactly one
    /// state machine moves: the current cast, or, when idle, the queued
    /// request, which is started and advanced in the same step. A queued
    /// instant held by the global cooldown stays queued until it elapses.
    pub fn tick(&mut self, dt: f64, env: &dyn CastEnv) {
        for granted in self.abilities.values_mut() {
            granted.ability.tick_cooldowns(dt);
        }
        self.global_cooldown = (self.global_cooldown - dt).max(0.0);

        let id = match self.queue.current().cloned() {
            Some(current) => current,
            None => {
                let Some(next) = self.queue.queued().map(|pending| pending.ability.clone()) else {
                    return;
                };
                if self.held_by_global_cooldown(&next) {
                    return;
                }
                let Some(pending) = self.queue.take_queued() else {
                    return;
                };
                if !self.start(&pending.ability, &pending.context, env).is_started() {
                    return;
                }
                pending.ability
            }
        };
        self.advance(&id, dt, env);
    }

    fn advance(&mut self, id: &AbilityId, dt: f64, env: &dyn CastEnv) {
        let Some(granted) = self.abilities.get_mut(id) else {
            self.queue.clear_current();
            return;
        };
        let ability = &mut granted.ability;
        let resolution = ability.update(dt, env, &self.registry);
        let ignores_global_cooldown = ability.ignores_global_cooldown();
        self.events.append(&mut ability.drain_events());

        let Some(resolution) = resolution else {
            return;
        };
        self.queue.clear_current();
        if resolution == (CastResolution::Succeeded { instant: true }) && !ignores_global_cooldown
        {
            self.global_cooldown = self.config.global_cooldown;
            debug!(
                target: "ability::manager",
                ability = %id,
                global_cooldown = self.global_cooldown,
                "global cooldown started"
            );
        }
    }

    /// Cancels the current cast. The queued request, if any, is kept.
    pub fn cancel_current(&mut self) -> Result<(), ManagerError> {
        let ability = self.current_mut()?;
        ability.cancel(CancelReason::Requested);
        let mut events = ability.drain_events();
        self.events.append(&mut events);
        self.queue.clear_current();
        Ok(())
    }

    /// Interrupts the current cast (external cause, e.g. a stun).
    pub fn interrupt_current(&mut self) -> Result<(), ManagerError> {
        let ability = self.current_mut()?;
        ability.interrupt();
        let mut events = ability.drain_events();
        self.events.append(&mut events);
        self.queue.clear_current();
        Ok(())
    }

    /// Supplies the target the current cast is waiting for.
    ///
    /// Returns `Ok(false)` when the cast is past Targeting or the target kind
    /// does not match.
    pub fn select_target(&mut self, target: CastTarget) -> Result<bool, ManagerError> {
        let ability = self.current_mut()?;
        if ability.target_mode() == TargetMode::None {
            return Err(ManagerError::TargetNotRequired(ability.id().clone()));
        }
        Ok(ability.select_target(target))
    }

    /// Drops the queued request, returning its ability id.
    pub fn clear_queue(&mut self) -> Option<AbilityId> {
        self.queue.take_queued().map(|pending| pending.ability)
    }

    fn current_mut(&mut self) -> Result<&mut Ability, ManagerError> {
        let id = self.queue.current().ok_or(ManagerError::NotCasting)?;
        self.abilities
            .get_mut(id)
            .map(|granted| &mut granted.ability)
            .ok_or(ManagerError::NotCasting)
    }

    fn lookup_mut(&mut self, id: &AbilityId) -> Result<&mut Ability, ManagerError> {
        self.abilities
            .get_mut(id)
            .map(|granted| &mut granted.ability)
            .ok_or_else(|| ManagerError::AbilityNotFound(id.clone()))
    }

    // ===== queries =====

    pub fn is_casting(&self) -> bool {
        self.queue.is_busy()
    }

    /// Progress of the current cast in `[0, 1]`; zero when idle.
    pub fn progress_fraction(&self) -> f64 {
        self.queue
            .current()
            .and_then(|id| self.abilities.get(id))
            .map_or(0.0, |granted| granted.ability.progress_fraction())
    }

    pub fn active_ability(&self) -> Option<&AbilityId> {
        self.queue.current()
    }

    pub fn queued_ability(&self) -> Option<&AbilityId> {
        self.queue.queued().map(|pending| &pending.ability)
    }

    pub fn global_cooldown_remaining(&self) -> f64 {
        self.global_cooldown
    }

    pub fn ability(&self, id: &AbilityId) -> Result<&Ability, ManagerError> {
        self.abilities
            .get(id)
            .map(|granted| &granted.ability)
            .ok_or_else(|| ManagerError::AbilityNotFound(id.clone()))
    }

    pub fn ability_mut(&mut self, id: &AbilityId) -> Result<&mut Ability, ManagerError> {
        self.lookup_mut(id)
    }

    pub fn abilities(&self) -> impl Iterator<Item = &Ability> + '_ {
        self.abilities.values().map(|granted| &granted.ability)
    }

    /// Takes every notification recorded since the last drain, in order.
    pub fn drain_events(&mut self) -> Vec<AbilityEvent> {
        std::mem::take(&mut self.events)
    }

    // ===== persistence =====

    pub fn snapshot(&self) -> ManagerSnapshot {
        ManagerSnapshot {
            actor: self.actor,
            config: self.config.clone(),
            global_cooldown: self.global_cooldown,
            abilities: self
                .abilities
                .values()
                .map(|granted| AbilitySnapshot {
                    definition: granted.ability.definition().clone(),
                    charges: granted.ability.charges().clone(),
                    grants: granted.grants,
                })
                .collect(),
        }
    }

    /// Rebuilds a manager from a snapshot and binds every formula against
    /// `registry`. The restored manager is idle.
    pub fn restore(
        snapshot: ManagerSnapshot,
        registry: Arc<FormulaRegistry>,
    ) -> Result<Self, ManagerError> {
        let mut manager = Self::new(snapshot.actor, registry, snapshot.config);
        manager.global_cooldown = snapshot.global_cooldown.max(0.0);

        for entry in snapshot.abilities {
            let id = entry.definition.id.clone();
            let ability = Ability::restore(entry.definition, entry.charges, &manager.registry)?;
            manager.abilities.insert(
                id,
                Granted {
                    ability,
                    grants: entry.grants.max(1),
                },
            );
        }
        Ok(manager)
    }
}

impl Bindable for AbilityManager {
    fn bind_all(&mut self, registry: &FormulaRegistry, report: &mut BindReport) {
        for granted in self.abilities.values_mut() {
            granted.ability.bind_all(registry, report);
        }
    }
}
