//! Single-current, single-queued cast slot.

use crate::ability::{AbilityId, CastContext};

/// A cast request waiting for the current cast to finish.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingCast {
    pub ability: AbilityId,
    pub context: CastContext,
}

/// An actor's cast slot.
///
/// `current` is the ability in Targeting/Casting/Completed. `queued` holds at
/// most one follow-up request; a newer request replaces it.
#[derive(Clone, Debug, Default)]
pub struct CastQueue {
    current: Option<AbilityId>,
    queued: Option<PendingCast>,
}

impl CastQueue {
    pub fn current(&self) -> Option<&AbilityId> {
        self.current.as_ref()
    }

    pub fn queued(&self) -> Option<&PendingCast> {
        self.queued.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.current.is_some()
    }

    pub fn set_current(&mut self, ability: AbilityId) {
        self.current = Some(ability);
    }

    pub fn clear_current(&mut self) -> Option<AbilityId> {
        self.current.take()
    }

    /// Parks a request, returning the one it displaced.
    pub fn enqueue(&mut self, pending: PendingCast) -> Option<PendingCast> {
        self.queued.replace(pending)
    }

    pub fn take_queued(&mut self) -> Option<PendingCast> {
        self.queued.take()
    }

    /// Drops every reference to `ability` (used on revoke).
    pub fn forget(&mut self, ability: &AbilityId) {
        if self.current.as_ref() == Some(ability) {
            self.current = None;
        }
        if self.queued.as_ref().is_some_and(|p| &p.ability == ability) {
            self.queued = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ActorId;

    fn pending(id: &str) -> PendingCast {
        PendingCast {
            ability: AbilityId::new(id),
            context: CastContext::new(ActorId(1)),
        }
    }

    #[test]
    fn newer_request_replaces_queued_one() {
        let mut queue = CastQueue::default();
        assert!(queue.enqueue(pending("a")).is_none());
        let displaced = queue.enqueue(pending("b"));

        assert_eq!(displaced.map(|p| p.ability), Some(AbilityId::new("a")));
        assert_eq!(queue.queued().map(|p| p.ability.as_str()), Some("b"));
    }

    #[test]
    fn forget_clears_both_slots() {
        let mut queue = CastQueue::default();
        queue.set_current(AbilityId::new("a"));
        queue.enqueue(pending("a"));
        queue.forget(&AbilityId::new("a"));

        assert!(!queue.is_busy());
        assert!(queue.queued().is_none());
    }
}
