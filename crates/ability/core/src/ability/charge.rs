//! Cooldown-gated use slots.

use arrayvec::ArrayVec;

use crate::config::EngineConfig;

/// One rotating cooldown slot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Charge {
    pub cooldown_duration: f64,
    pub remaining: f64,
}

impl Charge {
    /// A charge that is ready immediately.
    pub fn ready() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Advances the cooldown, flooring at zero.
    pub fn tick(&mut self, dt: f64) {
        if self.remaining > 0.0 {
            self.remaining = (self.remaining - dt).max(0.0);
        }
    }

    /// Puts the charge on cooldown.
    ///
    /// # Panics
    ///
    /// Panics if the charge is not ready or `cooldown_duration` is negative.
    pub fn consume(&mut self, cooldown_duration: f64) {
        assert!(
            cooldown_duration >= 0.0,
            "negative charge cooldown {cooldown_duration}"
        );
        assert!(self.is_ready(), "consumed a charge that is still cooling down");
        self.cooldown_duration = cooldown_duration;
        self.remaining = cooldown_duration;
    }
}

/// Fixed-capacity charge array with a round-robin rotation pointer.
///
/// # Rotation
///
/// [`consume_next_ready`](Self::consume_next_ready) scans from the pointer,
/// wrapping, takes the first ready charge, and moves the pointer one past it.
/// Consecutive uses therefore spread across slots instead of always draining
/// slot 0 first.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChargeSet {
    charges: ArrayVec<Charge, { EngineConfig::MAX_CHARGES }>,
    next: usize,
}

impl ChargeSet {
    /// Creates `count` ready charges.
    ///
    /// # Panics
    ///
    /// Panics unless `1 <= count <= EngineConfig::MAX_CHARGES`.
    pub fn new(count: usize) -> Self {
        assert!(
            (1..=EngineConfig::MAX_CHARGES).contains(&count),
            "charge count {count} outside 1..={}",
            EngineConfig::MAX_CHARGES
        );
        Self {
            charges: (0..count).map(|_| Charge::ready()).collect(),
            next: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.charges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charges.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Charge> {
        self.charges.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Charge> + '_ {
        self.charges.iter()
    }

    /// Index the next scan starts from.
    pub fn rotation_index(&self) -> usize {
        self.next
    }

    pub fn available(&self) -> usize {
        self.charges.iter().filter(|c| c.is_ready()).count()
    }

    pub fn tick(&mut self, dt: f64) {
        for charge in &mut self.charges {
            charge.tick(dt);
        }
    }

    /// Consumes the first ready charge at or after the rotation pointer.
    ///
    /// Returns the consumed slot index, or `None` if every charge is cooling down.
    pub fn consume_next_ready(&mut self, cooldown_duration: f64) -> Option<usize> {
        let len = self.charges.len();
        let index = (0..len)
            .map(|offset| (self.next + offset) % len)
            .find(|&i| self.charges[i].is_ready())?;

        self.charges[index].consume(cooldown_duration);
        self.next = (index + 1) % len;
        Some(index)
    }

    /// Seconds until the soonest charge is ready (zero if one already is).
    pub fn time_until_ready(&self) -> f64 {
        self.charges
            .iter()
            .map(|c| c.remaining.max(0.0))
            .fold(f64::INFINITY, f64::min)
    }
}
