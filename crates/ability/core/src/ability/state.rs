//! Cast states, modes and outcomes.

use core::borrow::Borrow;
use core::fmt;

use crate::env::ActorId;

/// Identifier of an ability definition (unique within a catalog).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct AbilityId(String);

impl AbilityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AbilityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AbilityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for AbilityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Phase of the cast state machine.
///
/// ```text
/// Invalid ──use──▶ Targeting ──target──▶ Casting ──elapsed──▶ Completed ──▶ Invalid
///    ▲                 │                    │
///    └──── cancel / interrupt / requirement failure ────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastState {
    /// Idle: both the initial state and the resting state between casts.
    #[default]
    Invalid,
    Targeting,
    Casting,
    Completed,
}

impl CastState {
    /// True while the ability occupies its actor's cast slot.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Targeting | Self::Casting | Self::Completed)
    }
}

/// How the Casting phase spends its time.
///
/// Either mode becomes instant when its resolved duration is `<= 0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastMode {
    /// One-shot: completes when the cast time elapses.
    #[default]
    Timed,
    /// Holds Casting for the channel time, firing evenly spaced ticks.
    Channeled,
}

/// What the ability needs before it can leave Targeting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetMode {
    /// No target; targeting completes immediately.
    #[default]
    None,
    Actor,
    Point,
}

/// A selected target.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastTarget {
    Actor(ActorId),
    Point { x: f64, y: f64 },
}

impl CastTarget {
    pub fn satisfies(&self, mode: TargetMode) -> bool {
        matches!(
            (mode, self),
            (TargetMode::None, _)
                | (TargetMode::Actor, CastTarget::Actor(_))
                | (TargetMode::Point, CastTarget::Point { .. })
        )
    }
}

/// Caller-supplied parameters of a cast request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CastContext {
    pub actor: ActorId,
    pub target: Option<CastTarget>,
}

impl CastContext {
    pub fn new(actor: ActorId) -> Self {
        Self {
            actor,
            target: None,
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: CastTarget) -> Self {
        self.target = Some(target);
        self
    }
}

/// Why a cast request was not started. These are ordinary outcomes, not errors.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rejection {
    /// Every charge is cooling down.
    NoCharges,
    /// A CastStart requirement failed.
    RequirementFailed { requirement: String },
    /// The shared instant-cast lockout is running.
    GlobalCooldown,
    /// The ability (or the actor's cast slot) is already in use.
    Busy,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCharges => f.write_str("no charges available"),
            Self::RequirementFailed { requirement } => {
                write!(f, "requirement {requirement} failed")
            }
            Self::GlobalCooldown => f.write_str("global cooldown active"),
            Self::Busy => f.write_str("already casting"),
        }
    }
}

/// Result of asking an ability to begin a cast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UseOutcome {
    Started,
    Rejected(Rejection),
}

impl UseOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started)
    }
}

/// Why an active cast was cancelled.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CancelReason {
    /// The caster asked to stop.
    Requested,
    /// A CastUpdate or CastComplete requirement failed.
    RequirementFailed { requirement: String },
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requested => f.write_str("requested"),
            Self::RequirementFailed { requirement } => {
                write!(f, "requirement {requirement} failed")
            }
        }
    }
}

/// How a cast left the active states during an update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastResolution {
    /// Completion side effects fired and a charge was consumed.
    Succeeded { instant: bool },
    /// The cast ended without effect (cancelled during update or completion).
    Failed,
}
