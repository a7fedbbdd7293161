//! Read-only view of the world that casts are checked against.
//!
//! The engine never owns actors, positions or attributes. Requirement checks
//! query them through [`CastEnv`], which the caller passes into every
//! [`AbilityManager`](crate::manager::AbilityManager) call that may evaluate
//! requirements.

use std::collections::{HashMap, HashSet};

use crate::ability::CastTarget;

/// Unique identifier for an actor that owns abilities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u32);

impl core::fmt::Display for ActorId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

/// World queries used by requirement checks.
///
/// Every method has a permissive default so an environment only implements
/// what its requirements actually read.
pub trait CastEnv {
    /// Named numeric attribute of an actor (e.g., `"mana"`).
    fn attribute(&self, _actor: ActorId, _name: &str) -> Option<f64> {
        None
    }

    fn is_alive(&self, _actor: ActorId) -> bool {
        true
    }

    fn is_moving(&self, _actor: ActorId) -> bool {
        false
    }

    /// Distance from `actor` to `target`, if both can be located.
    fn distance(&self, _actor: ActorId, _target: &CastTarget) -> Option<f64> {
        None
    }
}

/// Environment that answers every query with the trait defaults.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullEnv;

impl CastEnv for NullEnv {}

/// Table-backed environment for tools and tests.
#[derive(Clone, Debug, Default)]
pub struct StaticEnv {
    attributes: HashMap<(ActorId, String), f64>,
    positions: HashMap<ActorId, (f64, f64)>,
    moving: HashSet<ActorId>,
    dead: HashSet<ActorId>,
}

impl StaticEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_attribute(&mut self, actor: ActorId, name: impl Into<String>, value: f64) {
        self.attributes.insert((actor, name.into()), value);
    }

    pub fn set_position(&mut self, actor: ActorId, x: f64, y: f64) {
        self.positions.insert(actor, (x, y));
    }

    pub fn set_moving(&mut self, actor: ActorId, moving: bool) {
        if moving {
            self.moving.insert(actor);
        } else {
            self.moving.remove(&actor);
        }
    }

    pub fn set_alive(&mut self, actor: ActorId, alive: bool) {
        if alive {
            self.dead.remove(&actor);
        } else {
            self.dead.insert(actor);
        }
    }
}

impl CastEnv for StaticEnv {
    fn attribute(&self, actor: ActorId, name: &str) -> Option<f64> {
        self.attributes.get(&(actor, name.to_string())).copied()
    }

    fn is_alive(&self, actor: ActorId) -> bool {
        !self.dead.contains(&actor)
    }

    fn is_moving(&self, actor: ActorId) -> bool {
        self.moving.contains(&actor)
    }

    fn distance(&self, actor: ActorId, target: &CastTarget) -> Option<f64> {
        let (ax, ay) = *self.positions.get(&actor)?;
        let (tx, ty) = match *target {
            CastTarget::Actor(other) => *self.positions.get(&other)?,
            CastTarget::Point { x, y } => (x, y),
        };
        Some(((tx - ax).powi(2) + (ty - ay).powi(2)).sqrt())
    }
}
