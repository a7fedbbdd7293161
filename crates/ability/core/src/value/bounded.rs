//! Modifiable value clamped between two modifiable bounds.

use super::modifiable::{ModifiableValue, ValueKind};
use super::modifier::ValueModifier;

/// A [`ModifiableValue`] whose current value lives between a `min` and a `max`
/// that are themselves modifiable.
///
/// The bounded value keeps a *current* value (think: a resource pool) in
/// addition to its own base and modifiers:
///
/// - Changing the base or the value's own modifiers recomputes current from
///   `(base + Σ flat) × (1 + Σ percent)` and clamps it to the range.
/// - Changing the range (a bound's base or modifiers) keeps the current value
///   at the same *normalized position* inside the range. Half full stays half
///   full. A range collapsed to `0..0` forces current to `0`.
///
/// After any operation the base is re-derived from current so that
/// `value()` always equals the clamped modified base.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "BoundedRepr", into = "BoundedRepr")
)]
pub struct BoundedModifiableValue {
    inner: ModifiableValue,
    min: ModifiableValue,
    max: ModifiableValue,
    current: f64,
}

impl BoundedModifiableValue {
    pub fn new(base: f64, min: f64, max: f64) -> Self {
        Self::from_parts(
            ModifiableValue::new(base),
            ModifiableValue::new(min),
            ModifiableValue::new(max),
        )
    }

    pub fn from_parts(inner: ModifiableValue, min: ModifiableValue, max: ModifiableValue) -> Self {
        let mut value = Self {
            inner,
            min,
            max,
            current: 0.0,
        };
        value.recompute_from_base();
        value
    }

    /// Current (clamped) value.
    #[inline]
    pub fn value(&self) -> f64 {
        self.current
    }

    pub fn base(&self) -> f64 {
        self.inner.base()
    }

    pub fn min(&self) -> &ModifiableValue {
        &self.min
    }

    pub fn max(&self) -> &ModifiableValue {
        &self.max
    }

    pub fn min_value(&self) -> f64 {
        self.min.value()
    }

    pub fn max_value(&self) -> f64 {
        self.max.value()
    }

    /// Position of the current value inside the range, `0.0..=1.0`.
    ///
    /// A degenerate range (`min >= max`) reads as full.
    pub fn fill_fraction(&self) -> f64 {
        let (lo, hi) = (self.min.value(), self.max.value());
        let span = hi - lo;
        if span <= 0.0 {
            1.0
        } else {
            ((self.current - lo) / span).clamp(0.0, 1.0)
        }
    }

    pub fn set_base(&mut self, base: f64) {
        self.inner.set_base(base);
        self.recompute_from_base();
    }

    /// Sets the current value directly (clamped), adjusting base to match.
    pub fn set_value(&mut self, value: f64) {
        self.current = self.clamp(value);
        self.sync_base_from_current();
    }

    pub fn set_modifier(&mut self, modifier: ValueModifier) {
        self.inner.set_modifier(modifier);
        self.recompute_from_base();
    }

    pub fn remove_modifier(&mut self, id: &str) -> Option<ValueModifier> {
        let removed = self.inner.remove_modifier(id);
        self.recompute_from_base();
        removed
    }

    pub fn set_min_base(&mut self, base: f64) {
        self.rescale(|bounds| bounds.min.set_base(base));
    }

    pub fn set_max_base(&mut self, base: f64) {
        self.rescale(|bounds| bounds.max.set_base(base));
    }

    pub fn set_min_modifier(&mut self, modifier: ValueModifier) {
        self.rescale(|bounds| bounds.min.set_modifier(modifier));
    }

    pub fn set_max_modifier(&mut self, modifier: ValueModifier) {
        self.rescale(|bounds| bounds.max.set_modifier(modifier));
    }

    pub fn remove_min_modifier(&mut self, id: &str) {
        self.rescale(|bounds| {
            bounds.min.remove_modifier(id);
        });
    }

    pub fn remove_max_modifier(&mut self, id: &str) {
        self.rescale(|bounds| {
            bounds.max.remove_modifier(id);
        });
    }

    fn rescale(&mut self, change: impl FnOnce(&mut Self)) {
        let fraction = self.fill_fraction();
        change(self);

        let (lo, hi) = (self.min.value(), self.max.value());
        let target = if lo == 0.0 && hi == 0.0 {
            0.0
        } else {
            lo + fraction * (hi - lo)
        };
        self.current = self.clamp(target);
        self.sync_base_from_current();
    }

    fn recompute_from_base(&mut self) {
        self.current = self.clamp(self.inner.value());
    }

    /// Never panics on an inverted range: the upper bound wins.
    fn clamp(&self, value: f64) -> f64 {
        let clamped = value.max(self.min.value()).min(self.max.value());
        match self.inner.kind() {
            ValueKind::Real => clamped,
            ValueKind::Integer => clamped.trunc(),
        }
    }

    fn sync_base_from_current(&mut self) {
        let scale = 1.0 + self.inner.percent_total();
        if scale != 0.0 {
            let base = self.current / scale - self.inner.flat_total();
            self.inner.set_base(base);
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct BoundedRepr {
    value: ModifiableValue,
    min: ModifiableValue,
    max: ModifiableValue,
}

#[cfg(feature = "serde")]
impl From<BoundedRepr> for BoundedModifiableValue {
    fn from(repr: BoundedRepr) -> Self {
        Self::from_parts(repr.value, repr.min, repr.max)
    }
}

#[cfg(feature = "serde")]
impl From<BoundedModifiableValue> for BoundedRepr {
    fn from(value: BoundedModifiableValue) -> Self {
        Self {
            value: value.inner,
            min: value.min,
            max: value.max,
        }
    }
}
