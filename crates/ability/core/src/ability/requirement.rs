//! Phase-gating predicates.
//!
//! Requirements run in list order and the first failure short-circuits the
//! rest. Each requirement declares the phases it participates in; a
//! requirement not registered for the current phase is skipped.

use bitflags::bitflags;

use crate::env::{ActorId, CastEnv};

use super::state::CastTarget;

bitflags! {
    /// Set of phases a requirement is evaluated in.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CastPhases: u8 {
        /// Checked by `use()` before entering Targeting.
        const START = 1 << 0;
        /// Checked on every update while Casting.
        const UPDATE = 1 << 1;
        /// Checked when the cast time has elapsed, before side effects fire.
        const COMPLETE = 1 << 2;
    }
}

/// The single phase currently being checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
pub enum CastPhase {
    Start,
    Update,
    Complete,
}

impl CastPhase {
    pub const fn flag(self) -> CastPhases {
        match self {
            Self::Start => CastPhases::START,
            Self::Update => CastPhases::UPDATE,
            Self::Complete => CastPhases::COMPLETE,
        }
    }
}

/// Everything a requirement may inspect.
pub struct RequirementContext<'a> {
    pub actor: ActorId,
    pub target: Option<&'a CastTarget>,
    pub phase: CastPhase,
    pub env: &'a dyn CastEnv,
}

/// A predicate that can veto a phase transition.
pub trait RequirementCheck {
    /// Name reported when the check fails.
    fn name(&self) -> &str;

    fn phases(&self) -> CastPhases {
        CastPhases::all()
    }

    fn check(&self, ctx: &RequirementContext<'_>) -> bool;
}

/// Runs `requirements` for `ctx.phase` in order.
///
/// Returns the name of the first failing requirement.
pub fn first_failure<'r>(
    requirements: &'r [Box<dyn RequirementCheck>],
    ctx: &RequirementContext<'_>,
) -> Option<&'r str> {
    requirements
        .iter()
        .filter(|r| r.phases().contains(ctx.phase.flag()))
        .find(|r| !r.check(ctx))
        .map(|r| r.name())
}

/// Built-in requirement kinds available to data-driven definitions.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Requirement {
    /// Caster attribute must be at least `value` (missing attribute fails).
    AttributeAtLeast { attribute: String, value: f64 },
    /// Caster must be standing still.
    NotMoving,
    /// Target must be within `range` of the caster.
    TargetInRange { range: f64 },
    /// Target actor must be alive. Point targets and untargeted casts pass.
    TargetAlive,
    /// Caster must be alive.
    Alive,
}

impl Requirement {
    /// Phases used when a definition does not override them.
    pub fn default_phases(&self) -> CastPhases {
        match self {
            Self::AttributeAtLeast { .. } => CastPhases::START,
            Self::NotMoving => CastPhases::START | CastPhases::UPDATE,
            Self::TargetInRange { .. } => CastPhases::START | CastPhases::COMPLETE,
            Self::TargetAlive | Self::Alive => CastPhases::all(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::AttributeAtLeast { .. } => "attribute_at_least",
            Self::NotMoving => "not_moving",
            Self::TargetInRange { .. } => "target_in_range",
            Self::TargetAlive => "target_alive",
            Self::Alive => "alive",
        }
    }

    fn check(&self, ctx: &RequirementContext<'_>) -> bool {
        match self {
            Self::AttributeAtLeast { attribute, value } => ctx
                .env
                .attribute(ctx.actor, attribute)
                .is_some_and(|current| current >= *value),
            Self::NotMoving => !ctx.env.is_moving(ctx.actor),
            // Untargeted casts have nothing to be out of range of.
            Self::TargetInRange { range } => match ctx.target {
                Some(target) => ctx
                    .env
                    .distance(ctx.actor, target)
                    .is_some_and(|d| d <= *range),
                None => true,
            },
            Self::TargetAlive => match ctx.target {
                Some(CastTarget::Actor(target)) => ctx.env.is_alive(*target),
                _ => true,
            },
            Self::Alive => ctx.env.is_alive(ctx.actor),
        }
    }
}

/// A built-in requirement plus optional phase override, as authored in content.
///
/// The override is written as flag text, e.g. `phases: Some("START | COMPLETE")`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequirementSpec {
    pub check: Requirement,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none", with = "phase_text")
    )]
    pub phases: Option<CastPhases>,
}

/// `Option<CastPhases>` as bare `bitflags` text instead of the newtype form.
#[cfg(feature = "serde")]
mod phase_text {
    use bitflags::parser;
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::CastPhases;

    pub fn serialize<S: Serializer>(
        phases: &Option<CastPhases>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match phases {
            Some(phases) => {
                let mut text = String::new();
                parser::to_writer(phases, &mut text).map_err(S::Error::custom)?;
                serializer.serialize_some(&text)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<CastPhases>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => parser::from_str(&text).map(Some).map_err(D::Error::custom),
            None => Ok(None),
        }
    }
}

impl RequirementSpec {
    pub fn new(check: Requirement) -> Self {
        Self {
            check,
            phases: None,
        }
    }

    #[must_use]
    pub fn in_phases(mut self, phases: CastPhases) -> Self {
        self.phases = Some(phases);
        self
    }
}

impl From<Requirement> for RequirementSpec {
    fn from(check: Requirement) -> Self {
        Self::new(check)
    }
}

impl RequirementCheck for RequirementSpec {
    fn name(&self) -> &str {
        self.check.name()
    }

    fn phases(&self) -> CastPhases {
        self.phases.unwrap_or_else(|| self.check.default_phases())
    }

    fn check(&self, ctx: &RequirementContext<'_>) -> bool {
        self.check.check(ctx)
    }
}
