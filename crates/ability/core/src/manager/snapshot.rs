//! Persisted manager state.
//!
//! Snapshots hold plain data only: definitions (with their runtime
//! modifiers and formula signatures), charge cooldowns and grant counts.
//! Casts in flight, custom requirements and components are not captured;
//! a restored manager starts idle and re-binds every formula.

use crate::ability::{AbilityDefinition, ChargeSet};
use crate::config::EngineConfig;
use crate::env::ActorId;

/// One granted ability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilitySnapshot {
    pub definition: AbilityDefinition,
    pub charges: ChargeSet,
    pub grants: u32,
}

/// Everything needed to rebuild an [`AbilityManager`](super::AbilityManager).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManagerSnapshot {
    pub actor: ActorId,
    pub config: EngineConfig,
    pub global_cooldown: f64,
    pub abilities: Vec<AbilitySnapshot>,
}
