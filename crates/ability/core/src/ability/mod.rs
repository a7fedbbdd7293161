//! Abilities: definitions, charges, requirements and the cast state machine.
//!
//! Everything in here operates on a single ability. Coordination across an
//! actor's abilities (one active cast, queueing, global cooldown) lives in
//! [`crate::manager`].

mod cast;
mod charge;
mod component;
mod definition;
mod requirement;
mod state;

pub use cast::Ability;
pub use charge::{Charge, ChargeSet};
pub use component::{AbilityComponent, AbilityEvent, CastInfo};
pub use definition::{AbilityDefinition, AbilityTimings, DefinitionError, TimingKind};
pub use requirement::{
    CastPhase, CastPhases, Requirement, RequirementCheck, RequirementContext, RequirementSpec,
    first_failure,
};
pub use state::{
    AbilityId, CancelReason, CastContext, CastMode, CastResolution, CastState, CastTarget,
    Rejection, TargetMode, UseOutcome,
};
