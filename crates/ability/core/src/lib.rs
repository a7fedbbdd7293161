//! Deterministic ability/skill engine.
//!
//! `ability-core` models time-gated abilities that consume cooldown charges,
//! pass through a requirement-checked cast state machine, and read their
//! timings from modifiable values that may be driven by registered formulas.
//! Callers own the game loop: every state change flows through
//! [`manager::AbilityManager::tick`] and the request methods next to it.
pub mod ability;
pub mod config;
pub mod env;
pub mod error;
pub mod formula;
pub mod manager;
pub mod value;
pub use ability::{
    Ability, AbilityComponent, AbilityDefinition, AbilityEvent, AbilityId, AbilityTimings,
    CancelReason, CastContext, CastInfo, CastMode, CastPhase, CastPhases, CastState, CastTarget,
    Charge, ChargeSet, DefinitionError, Rejection, Requirement, RequirementCheck,
    RequirementContext, RequirementSpec, TargetMode, TimingKind, UseOutcome,
};
pub use config::EngineConfig;
pub use env::{ActorId, CastEnv, NullEnv, StaticEnv};
pub use error::{EngineError, ErrorSeverity};
pub use formula::{
    BindReport, Bindable, BuiltinFormulas, FormulaArg, FormulaBinding, FormulaDecl,
    FormulaProvider, FormulaRegistry, FormulaShape, FormulaSignature, ModuleFilter,
    SignatureError, ValueType, Visibility,
};
pub use manager::{AbilityManager, AbilitySnapshot, CastOutcome, ManagerError, ManagerSnapshot};
pub use value::{BoundedModifiableValue, FormulaValue, ModifiableValue, ValueKind, ValueModifier};
