//! The per-ability cast state machine.

use std::mem;

use tracing::debug;

use crate::env::{ActorId, CastEnv};
use crate::formula::{BindReport, Bindable, FormulaRegistry};
use crate::value::FormulaValue;

use super::charge::ChargeSet;
use super::component::{AbilityComponent, AbilityEvent, CastInfo};
use super::definition::{AbilityDefinition, DefinitionError, TimingKind};
use super::requirement::{CastPhase, RequirementCheck, RequirementContext, first_failure};
use super::state::{
    AbilityId, CancelReason, CastContext, CastMode, CastResolution, CastState, CastTarget,
    Rejection, TargetMode, UseOutcome,
};

/// Tolerance for comparing accumulated float time against boundaries.
const TIME_EPSILON: f64 = 1e-9;

/// Bookkeeping for the cast currently in flight.
#[derive(Clone, Debug)]
struct ActiveCast {
    actor: ActorId,
    target: Option<CastTarget>,
    duration: f64,
    elapsed: f64,
    instant: bool,
    channel_ticks: u32,
    ticks_fired: u32,
}

impl ActiveCast {
    fn new(actor: ActorId, target: Option<CastTarget>) -> Self {
        Self {
            actor,
            target,
            duration: 0.0,
            elapsed: 0.0,
            instant: true,
            channel_ticks: 0,
            ticks_fired: 0,
        }
    }

    /// Number of channel boundaries crossed by `elapsed` that have not fired yet.
    fn due_ticks(&self) -> u32 {
        if self.channel_ticks == 0 {
            return 0;
        }
        if self.elapsed + TIME_EPSILON >= self.duration {
            return self.channel_ticks - self.ticks_fired;
        }
        let interval = self.duration / f64::from(self.channel_ticks);
        let crossed = ((self.elapsed + TIME_EPSILON) / interval).floor() as u32;
        crossed.min(self.channel_ticks).saturating_sub(self.ticks_fired)
    }
}

/// One granted ability of one actor.
///
/// Owns its timing values, requirement list, side-effect components and
/// charges. Driven by [`AbilityManager`](crate::manager::AbilityManager),
/// which guarantees at most one ability per actor is active at a time.
///
/// # Lifecycle
///
/// [`begin`](Self::begin) moves `Invalid → Targeting`. Each
/// [`update`](Self::update) then cascades through as many transitions as
/// it can make progress on, spending `dt` at most once inside `Casting`.
pub struct Ability {
    definition: AbilityDefinition,
    requirements: Vec<Box<dyn RequirementCheck>>,
    components: Vec<Box<dyn AbilityComponent>>,
    charges: ChargeSet,
    state: CastState,
    cast: Option<ActiveCast>,
    events: Vec<AbilityEvent>,
}

impl Ability {
    /// Builds an ability from a validated definition and binds its formulas.
    pub fn from_definition(
        definition: AbilityDefinition,
        registry: &FormulaRegistry,
    ) -> Result<Self, DefinitionError> {
        definition.validate()?;
        let charges = ChargeSet::new(definition.charges);
        Self::assemble(definition, charges, registry)
    }

    /// Rebuilds an ability from persisted parts. Charge cooldowns are kept.
    pub fn restore(
        definition: AbilityDefinition,
        charges: ChargeSet,
        registry: &FormulaRegistry,
    ) -> Result<Self, DefinitionError> {
        definition.validate()?;
        if charges.len() != definition.charges {
            return Err(DefinitionError::ChargeCount {
                id: definition.id.clone(),
                count: charges.len(),
            });
        }
        Self::assemble(definition, charges, registry)
    }

    fn assemble(
        definition: AbilityDefinition,
        charges: ChargeSet,
        registry: &FormulaRegistry,
    ) -> Result<Self, DefinitionError> {
        let requirements = definition
            .requirements
            .iter()
            .cloned()
            .map(|spec| Box::new(spec) as Box<dyn RequirementCheck>)
            .collect();

        let mut ability = Self {
            definition,
            requirements,
            components: Vec::new(),
            charges,
            state: CastState::Invalid,
            cast: None,
            events: Vec::new(),
        };
        ability.bind(registry);
        Ok(ability)
    }

    pub fn id(&self) -> &AbilityId {
        &self.definition.id
    }

    pub fn definition(&self) -> &AbilityDefinition {
        &self.definition
    }

    pub fn state(&self) -> CastState {
        self.state
    }

    pub fn level(&self) -> u32 {
        self.definition.level
    }

    pub fn set_level(&mut self, level: u32) {
        self.definition.level = level;
    }

    pub fn cast_mode(&self) -> CastMode {
        self.definition.cast_mode
    }

    pub fn target_mode(&self) -> TargetMode {
        self.definition.target_mode
    }

    pub fn ignores_global_cooldown(&self) -> bool {
        self.definition.ignores_global_cooldown
    }

    pub fn charges(&self) -> &ChargeSet {
        &self.charges
    }

    /// Target of the cast in flight, if one has been supplied.
    pub fn target(&self) -> Option<&CastTarget> {
        self.cast.as_ref().and_then(|cast| cast.target.as_ref())
    }

    /// Appends a custom requirement after the authored ones.
    pub fn add_requirement(&mut self, requirement: Box<dyn RequirementCheck>) {
        self.requirements.push(requirement);
    }

    /// Appends a side-effect component; components run in insertion order.
    pub fn add_component(&mut self, component: Box<dyn AbilityComponent>) {
        self.components.push(component);
    }

    pub fn timing(&self, kind: TimingKind) -> &FormulaValue {
        self.definition.timings.get(kind)
    }

    /// Mutable access for runtime modifiers (haste, talents, debuffs).
    pub fn timing_mut(&mut self, kind: TimingKind) -> &mut FormulaValue {
        self.definition.timings.get_mut(kind)
    }

    /// Evaluates a timing at the ability's level, resolving its formula lazily.
    pub fn evaluate(&mut self, kind: TimingKind, registry: &FormulaRegistry) -> f64 {
        let level = self.definition.level;
        self.definition.timings.get_mut(kind).evaluate(registry, level)
    }

    /// Duration the cast would spend in Casting if started now.
    ///
    /// Channeled abilities use their channel time, timed ones their cast time.
    pub fn resolved_duration(&mut self, registry: &FormulaRegistry) -> f64 {
        let kind = match self.definition.cast_mode {
            CastMode::Timed => TimingKind::CastTime,
            CastMode::Channeled => TimingKind::ChannelTime,
        };
        self.evaluate(kind, registry).max(0.0)
    }

    pub fn is_instant(&mut self, registry: &FormulaRegistry) -> bool {
        self.resolved_duration(registry) <= 0.0
    }

    pub fn available_charge_count(&self) -> usize {
        self.charges.available()
    }

    /// Consumes the next ready charge in rotation order.
    ///
    /// # Panics
    ///
    /// Panics if `cooldown` is negative.
    pub fn consume_next_ready_charge(&mut self, cooldown: f64) -> Option<usize> {
        self.charges.consume_next_ready(cooldown)
    }

    pub fn tick_cooldowns(&mut self, dt: f64) {
        self.charges.tick(dt);
    }

    /// Completion fraction of the current cast in `[0, 1]`.
    pub fn progress_fraction(&self) -> f64 {
        match (self.state, &self.cast) {
            (CastState::Completed, _) => 1.0,
            (CastState::Casting, Some(cast)) if cast.instant => 1.0,
            (CastState::Casting, Some(cast)) => (cast.elapsed / cast.duration).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    /// Takes the notifications recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<AbilityEvent> {
        mem::take(&mut self.events)
    }

    /// Starts a cast: `Invalid → Targeting`.
    ///
    /// Fails without changing state when the ability is already active, no
    /// charge is ready, or a start-phase requirement fails.
    pub fn begin(&mut self, ctx: &CastContext, env: &dyn CastEnv) -> UseOutcome {
        // A target of the wrong kind is dropped before any check sees it.
        let target = ctx
            .target
            .filter(|target| target.satisfies(self.definition.target_mode));
        if let Some(rejection) = self.start_rejection(ctx.actor, target.as_ref(), env) {
            debug!(
                target: "ability::cast",
                ability = %self.definition.id,
                actor = %ctx.actor,
                %rejection,
                "cast rejected"
            );
            self.events.push(AbilityEvent::CastRejected {
                ability: self.definition.id.clone(),
                reason: rejection.clone(),
            });
            return UseOutcome::Rejected(rejection);
        }

        self.cast = Some(ActiveCast::new(ctx.actor, target));
        self.transition(CastState::Targeting);
        self.notify(AbilityEvent::Used {
            ability: self.definition.id.clone(),
        });
        UseOutcome::Started
    }

    fn start_rejection(
        &self,
        actor: ActorId,
        target: Option<&CastTarget>,
        env: &dyn CastEnv,
    ) -> Option<Rejection> {
        if self.state.is_active() {
            return Some(Rejection::Busy);
        }
        if self.charges.available() == 0 {
            return Some(Rejection::NoCharges);
        }
        let check = RequirementContext {
            actor,
            target,
            phase: CastPhase::Start,
            env,
        };
        first_failure(&self.requirements, &check).map(|name| Rejection::RequirementFailed {
            requirement: name.to_owned(),
        })
    }

    /// Supplies the target an ability is waiting for in Targeting.
    ///
    /// Returns false when the ability is not targeting or the target kind
    /// does not match its [`TargetMode`].
    pub fn select_target(&mut self, target: CastTarget) -> bool {
        if self.state != CastState::Targeting || !target.satisfies(self.definition.target_mode) {
            return false;
        }
        match &mut self.cast {
            Some(cast) => {
                cast.target = Some(target);
                true
            }
            None => false,
        }
    }

    /// Advances the state machine by `dt`.
    ///
    /// Returns how the cast ended if it left the active states during this
    /// call, `None` while it is still in flight or when idle.
    pub fn update(
        &mut self,
        dt: f64,
        env: &dyn CastEnv,
        registry: &FormulaRegistry,
    ) -> Option<CastResolution> {
        let mut dt_spent = false;
        loop {
            match self.state {
                CastState::Invalid => return None,
                CastState::Targeting => {
                    if !self.target_resolved() {
                        return None;
                    }
                    self.enter_casting(registry);
                }
                CastState::Casting => {
                    if self.cast.as_ref().is_some_and(|cast| cast.instant) {
                        self.transition(CastState::Completed);
                        continue;
                    }
                    if dt_spent {
                        return None;
                    }
                    dt_spent = true;
                    if let Some(requirement) = self.phase_failure(CastPhase::Update, env) {
                        self.cancel(CancelReason::RequirementFailed { requirement });
                        return Some(CastResolution::Failed);
                    }
                    if !self.advance(dt) {
                        return None;
                    }
                    self.transition(CastState::Completed);
                }
                CastState::Completed => return Some(self.complete(env, registry)),
            }
        }
    }

    fn target_resolved(&self) -> bool {
        match self.definition.target_mode {
            TargetMode::None => true,
            _ => self.target().is_some(),
        }
    }

    fn enter_casting(&mut self, registry: &FormulaRegistry) {
        let duration = self.resolved_duration(registry);
        let channel_ticks = match self.definition.cast_mode {
            CastMode::Channeled if duration > 0.0 => {
                self.evaluate(TimingKind::ChannelTicks, registry).max(1.0) as u32
            }
            _ => 0,
        };
        if let Some(cast) = &mut self.cast {
            cast.duration = duration;
            cast.instant = duration <= 0.0;
            cast.channel_ticks = channel_ticks;
        }
        self.transition(CastState::Casting);
        self.notify(AbilityEvent::CastStarted {
            ability: self.definition.id.clone(),
            duration,
        });
    }

    /// Spends `dt` and fires due channel ticks. Returns true once elapsed.
    fn advance(&mut self, dt: f64) -> bool {
        let Some(cast) = &mut self.cast else {
            return true;
        };
        cast.elapsed += dt.max(0.0);
        let due = cast.due_ticks();
        let first = cast.ticks_fired + 1;
        cast.ticks_fired += due;
        let done = cast.elapsed + TIME_EPSILON >= cast.duration;

        for tick in first..first + due {
            self.notify(AbilityEvent::ChannelTick {
                ability: self.definition.id.clone(),
                tick,
            });
        }
        done
    }

    fn complete(&mut self, env: &dyn CastEnv, registry: &FormulaRegistry) -> CastResolution {
        if let Some(requirement) = self.phase_failure(CastPhase::Complete, env) {
            self.cancel(CancelReason::RequirementFailed { requirement });
            return CastResolution::Failed;
        }

        let instant = self.cast.as_ref().is_none_or(|cast| cast.instant);
        self.notify(AbilityEvent::CastCompleted {
            ability: self.definition.id.clone(),
        });

        let cooldown = self.evaluate(TimingKind::Cooldown, registry).max(0.0);
        if let Some(charge) = self.charges.consume_next_ready(cooldown) {
            self.notify(AbilityEvent::ChargeConsumed {
                ability: self.definition.id.clone(),
                charge,
                cooldown,
            });
        }

        self.finish();
        CastResolution::Succeeded { instant }
    }

    fn phase_failure(&self, phase: CastPhase, env: &dyn CastEnv) -> Option<String> {
        let cast = self.cast.as_ref()?;
        let check = RequirementContext {
            actor: cast.actor,
            target: cast.target.as_ref(),
            phase,
            env,
        };
        first_failure(&self.requirements, &check).map(str::to_owned)
    }

    /// Aborts an active cast. No charge is consumed.
    ///
    /// Returns false when there was nothing to cancel.
    pub fn cancel(&mut self, reason: CancelReason) -> bool {
        if !self.state.is_active() {
            return false;
        }
        self.notify(AbilityEvent::CastCancelled {
            ability: self.definition.id.clone(),
            reason,
        });
        self.finish();
        true
    }

    /// Like [`cancel`](Self::cancel), but reported as an external interruption.
    pub fn interrupt(&mut self) -> bool {
        if !self.state.is_active() {
            return false;
        }
        self.notify(AbilityEvent::CastInterrupted {
            ability: self.definition.id.clone(),
        });
        self.finish();
        true
    }

    fn finish(&mut self) {
        self.transition(CastState::Invalid);
        self.cast = None;
    }

    fn transition(&mut self, next: CastState) {
        debug!(
            target: "ability::cast",
            ability = %self.definition.id,
            from = %self.state,
            to = %next,
            "state transition"
        );
        self.state = next;
    }

    /// Records `event` and delivers it to every component in order.
    fn notify(&mut self, event: AbilityEvent) {
        if let Some(cast) = &self.cast {
            let info = CastInfo {
                ability: &self.definition.id,
                actor: cast.actor,
                target: cast.target.as_ref(),
                level: self.definition.level,
            };
            for component in &mut self.components {
                event.dispatch(component.as_mut(), &info);
            }
        }
        self.events.push(event);
    }
}

impl Bindable for Ability {
    fn bind_all(&mut self, registry: &FormulaRegistry, report: &mut BindReport) {
        self.definition.bind_all(registry, report);
    }
}

impl std::fmt::Debug for Ability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ability")
            .field("id", &self.definition.id)
            .field("state", &self.state)
            .field("charges", &self.charges)
            .field("requirements", &self.requirements.len())
            .field("components", &self.components.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::ability::{CastPhases, Requirement, RequirementSpec};
    use crate::env::{NullEnv, StaticEnv};
    use crate::value::{ModifiableValue, ValueModifier};

    const CASTER: ActorId = ActorId(7);

    fn ability(def: AbilityDefinition) -> Ability {
        Ability::from_definition(def, &FormulaRegistry::with_builtins()).unwrap()
    }

    fn ctx() -> CastContext {
        CastContext::new(CASTER)
    }

    fn kinds(events: &[AbilityEvent]) -> Vec<&'static str> {
        events.iter().map(AbilityEvent::kind).collect()
    }

    #[derive(Clone, Default)]
    struct Log(Rc<RefCell<Vec<String>>>);

    impl AbilityComponent for Log {
        fn on_use(&mut self, _info: &CastInfo<'_>) {
            self.0.borrow_mut().push("use".into());
        }

        fn on_channel_tick(&mut self, _info: &CastInfo<'_>, tick: u32) {
            self.0.borrow_mut().push(format!("tick{tick}"));
        }

        fn on_cast_completed(&mut self, _info: &CastInfo<'_>) {
            self.0.borrow_mut().push("completed".into());
        }
    }

    #[test]
    fn instant_cast_completes_in_one_update() {
        let registry = FormulaRegistry::with_builtins();
        let mut bolt = ability(AbilityDefinition::new("bolt").with_cooldown(3.0));

        assert!(bolt.begin(&ctx(), &NullEnv).is_started());
        assert_eq!(bolt.state(), CastState::Targeting);

        let resolution = bolt.update(0.1, &NullEnv, &registry);
        assert_eq!(resolution, Some(CastResolution::Succeeded { instant: true }));
        assert_eq!(bolt.state(), CastState::Invalid);
        assert_eq!(bolt.available_charge_count(), 0);
        assert_eq!(
            kinds(&bolt.drain_events()),
            vec!["used", "started", "completed", "charge_consumed"]
        );
    }

    #[test]
    fn zero_ready_charges_rejects_and_stays_invalid() {
        let registry = FormulaRegistry::with_builtins();
        let mut bolt = ability(AbilityDefinition::new("bolt").with_cooldown(3.0));
        bolt.begin(&ctx(), &NullEnv);
        bolt.update(0.0, &NullEnv, &registry);

        let outcome = bolt.begin(&ctx(), &NullEnv);
        assert_eq!(outcome, UseOutcome::Rejected(Rejection::NoCharges));
        assert_eq!(bolt.state(), CastState::Invalid);
    }

    #[test]
    fn timed_cast_spends_dt_on_the_entry_tick() {
        let registry = FormulaRegistry::with_builtins();
        let mut fireball = ability(AbilityDefinition::timed("fireball", 2.0));
        fireball.begin(&ctx(), &NullEnv);

        assert_eq!(fireball.update(1.0, &NullEnv, &registry), None);
        assert_eq!(fireball.state(), CastState::Casting);
        assert!((fireball.progress_fraction() - 0.5).abs() < 1e-9);

        assert_eq!(
            fireball.update(1.0, &NullEnv, &registry),
            Some(CastResolution::Succeeded { instant: false })
        );
    }

    #[test]
    fn channel_fires_each_tick_once() {
        let registry = FormulaRegistry::with_builtins();
        let log = Log::default();
        let mut drain = ability(AbilityDefinition::channeled("drain", 3.0, 3).with_cooldown(5.0));
        drain.add_component(Box::new(log.clone()));
        drain.begin(&ctx(), &NullEnv);

        let mut resolution = None;
        for _ in 0..3 {
            resolution = drain.update(1.0, &NullEnv, &registry);
        }

        assert_eq!(resolution, Some(CastResolution::Succeeded { instant: false }));
        assert_eq!(
            *log.0.borrow(),
            vec!["use", "tick1", "tick2", "tick3", "completed"]
        );
        assert_eq!(drain.state(), CastState::Invalid);
        assert_eq!(drain.available_charge_count(), 0);
    }

    #[test]
    fn large_step_fires_all_remaining_ticks() {
        let registry = FormulaRegistry::with_builtins();
        let mut drain = ability(AbilityDefinition::channeled("drain", 2.0, 4));
        drain.begin(&ctx(), &NullEnv);
        drain.update(10.0, &NullEnv, &registry);

        let ticks: Vec<u32> = drain
            .drain_events()
            .into_iter()
            .filter_map(|event| match event {
                AbilityEvent::ChannelTick { tick, .. } => Some(tick),
                _ => None,
            })
            .collect();
        assert_eq!(ticks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn channel_time_decides_instantness() {
        let registry = FormulaRegistry::with_builtins();
        let mut def = AbilityDefinition::channeled("pulse", 0.0, 3);
        def.timings.cast_time = FormulaValue::from(5.0);
        let mut pulse = ability(def);

        assert!(pulse.is_instant(&registry));
        pulse.begin(&ctx(), &NullEnv);
        assert_eq!(
            pulse.update(0.1, &NullEnv, &registry),
            Some(CastResolution::Succeeded { instant: true })
        );
    }

    #[test]
    fn update_requirement_failure_cancels_without_consuming() {
        let registry = FormulaRegistry::with_builtins();
        let mut env = StaticEnv::new();
        let mut cast = ability(
            AbilityDefinition::timed("heal", 2.0)
                .with_requirement(Requirement::NotMoving)
                .with_cooldown(4.0),
        );
        cast.begin(&ctx(), &env);
        cast.update(0.5, &env, &registry);

        env.set_moving(CASTER, true);
        assert_eq!(cast.update(0.5, &env, &registry), Some(CastResolution::Failed));
        assert_eq!(cast.state(), CastState::Invalid);
        assert_eq!(cast.available_charge_count(), 1);

        let events = cast.drain_events();
        assert!(matches!(
            events.last(),
            Some(AbilityEvent::CastCancelled {
                reason: CancelReason::RequirementFailed { requirement },
                ..
            }) if requirement == "not_moving"
        ));
    }

    #[test]
    fn complete_requirement_failure_fails_the_cast() {
        let registry = FormulaRegistry::with_builtins();
        let mut env = StaticEnv::new();
        env.set_attribute(CASTER, "focus", 1.0);
        let spec = RequirementSpec::new(Requirement::AttributeAtLeast {
            attribute: "focus".into(),
            value: 1.0,
        })
        .in_phases(CastPhases::START | CastPhases::COMPLETE);
        let mut cast = ability(AbilityDefinition::timed("snipe", 1.0).with_requirement(spec));

        assert!(cast.begin(&ctx(), &env).is_started());
        env.set_attribute(CASTER, "focus", 0.0);
        assert_eq!(cast.update(1.0, &env, &registry), Some(CastResolution::Failed));
        assert_eq!(cast.available_charge_count(), 1);
    }

    #[test]
    fn start_requirement_failure_is_reported_by_name() {
        let env = StaticEnv::new();
        let mut cast = ability(AbilityDefinition::new("nova").with_requirement(
            Requirement::AttributeAtLeast {
                attribute: "mana".into(),
                value: 10.0,
            },
        ));
        assert_eq!(
            cast.begin(&ctx(), &env),
            UseOutcome::Rejected(Rejection::RequirementFailed {
                requirement: "attribute_at_least".into()
            })
        );
        assert_eq!(cast.state(), CastState::Invalid);
    }

    #[test]
    fn targeted_cast_waits_for_target() {
        let registry = FormulaRegistry::with_builtins();
        let mut cast = ability(AbilityDefinition::timed("blink", 1.0).targeting(TargetMode::Point));
        cast.begin(&ctx(), &NullEnv);

        assert_eq!(cast.update(1.0, &NullEnv, &registry), None);
        assert_eq!(cast.state(), CastState::Targeting);

        assert!(!cast.select_target(CastTarget::Actor(ActorId(2))));
        assert!(cast.select_target(CastTarget::Point { x: 1.0, y: 2.0 }));
        assert_eq!(
            cast.update(1.0, &NullEnv, &registry),
            Some(CastResolution::Succeeded { instant: false })
        );
    }

    #[test]
    fn cancel_and_interrupt_emit_distinct_events() {
        let mut cast = ability(AbilityDefinition::timed("a", 1.0));
        assert!(!cast.cancel(CancelReason::Requested));

        cast.begin(&ctx(), &NullEnv);
        assert!(cast.cancel(CancelReason::Requested));
        cast.begin(&ctx(), &NullEnv);
        assert!(cast.interrupt());

        assert_eq!(
            kinds(&cast.drain_events()),
            vec!["used", "cancelled", "used", "interrupted"]
        );
        assert_eq!(cast.available_charge_count(), 1);
    }

    #[test]
    fn timing_modifiers_and_level_formulas_apply() {
        let registry = FormulaRegistry::with_builtins();
        let def = AbilityDefinition::timed("bolt", 2.0)
            .with_timing(
                TimingKind::Cooldown,
                FormulaValue::with_formula(
                    ModifiableValue::new(10.0),
                    "float Builtin::level_reduced(float, int)",
                ),
            )
            .at_level(2);
        let mut bolt = ability(def);

        bolt.timing_mut(TimingKind::CastTime)
            .set_modifier(ValueModifier::percent("haste", -0.5));
        assert!((bolt.resolved_duration(&registry) - 1.0).abs() < 1e-9);
        assert!((bolt.evaluate(TimingKind::Cooldown, &registry) - 9.5).abs() < 1e-9);

        bolt.set_level(1);
        assert_eq!(bolt.level(), 1);
        assert!((bolt.evaluate(TimingKind::Cooldown, &registry) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn start_checks_see_only_a_target_of_the_right_kind() {
        let mut env = StaticEnv::new();
        env.set_position(CASTER, 0.0, 0.0);
        env.set_position(ActorId(2), 50.0, 0.0);

        let mut leap = ability(
            AbilityDefinition::timed("leap", 1.0)
                .targeting(TargetMode::Point)
                .with_requirement(Requirement::TargetInRange { range: 5.0 }),
        );

        // The far actor target is not a point, so it is dropped before the
        // range check rather than rejecting the cast.
        let far_actor = ctx().with_target(CastTarget::Actor(ActorId(2)));
        assert_eq!(leap.begin(&far_actor, &env), UseOutcome::Started);
        assert_eq!(leap.target(), None);
        assert_eq!(leap.state(), CastState::Targeting);
        leap.cancel(CancelReason::Requested);

        let far_point = ctx().with_target(CastTarget::Point { x: 50.0, y: 0.0 });
        assert_eq!(
            leap.begin(&far_point, &env),
            UseOutcome::Rejected(Rejection::RequirementFailed {
                requirement: "target_in_range".into()
            })
        );
    }
}
