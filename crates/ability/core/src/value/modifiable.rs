//! Base value plus replace-by-id modifier set.

use std::collections::BTreeMap;

use super::modifier::ValueModifier;

/// Whether a value is read as a real number or truncated to an integer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ValueKind {
    #[default]
    Real,
    /// Truncated toward zero once, after all modifiers are applied.
    Integer,
}

/// A numeric attribute with a base value and a set of named modifiers.
///
/// # Formula
/// ```text
/// value = (base + Σ flat) × (1 + Σ percent)
/// ```
///
/// The running totals are maintained incrementally: every
/// [`set_modifier`](Self::set_modifier) first subtracts the contribution
/// previously stored under the same id, so the totals always equal the sum
/// over the *current* modifier set.
///
/// # Example
/// ```
/// # use ability_core::value::{ModifiableValue, ValueModifier};
/// let mut cast_time = ModifiableValue::new(2.0);
/// cast_time.set_modifier(ValueModifier::flat("talent", 0.5));
/// cast_time.set_modifier(ValueModifier::percent("haste", -0.2));
/// // (2.0 + 0.5) × 0.8 = 2.0
/// assert!((cast_time.value() - 2.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "ModifiableValueRepr", into = "ModifiableValueRepr")
)]
pub struct ModifiableValue {
    base: f64,
    kind: ValueKind,
    flat_total: f64,
    percent_total: f64,
    modifiers: BTreeMap<String, ValueModifier>,
}

impl ModifiableValue {
    pub fn new(base: f64) -> Self {
        Self::with_kind(base, ValueKind::Real)
    }

    /// Create an integer-valued attribute (e.g., a channel tick count).
    pub fn integer(base: f64) -> Self {
        Self::with_kind(base, ValueKind::Integer)
    }

    pub fn with_kind(base: f64, kind: ValueKind) -> Self {
        Self {
            base,
            kind,
            flat_total: 0.0,
            percent_total: 0.0,
            modifiers: BTreeMap::new(),
        }
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn set_base(&mut self, base: f64) {
        self.base = base;
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn flat_total(&self) -> f64 {
        self.flat_total
    }

    pub fn percent_total(&self) -> f64 {
        self.percent_total
    }

    /// Current value derived from the stored base.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value_with_base(self.base)
    }

    /// Applies the stored modifiers to an externally supplied base.
    ///
    /// Used when a formula computes the base for this attribute.
    #[inline]
    pub fn value_with_base(&self, base: f64) -> f64 {
        let raw = (base + self.flat_total) * (1.0 + self.percent_total);
        match self.kind {
            ValueKind::Real => raw,
            ValueKind::Integer => raw.trunc(),
        }
    }

    /// Inserts or replaces the modifier stored under `modifier.id`.
    pub fn set_modifier(&mut self, modifier: ValueModifier) {
        if let Some(previous) = self.modifiers.remove(&modifier.id) {
            self.flat_total -= previous.flat;
            self.percent_total -= previous.percent;
        }
        self.flat_total += modifier.flat;
        self.percent_total += modifier.percent;
        self.modifiers.insert(modifier.id.clone(), modifier);
    }

    /// Removes the modifier stored under `id`. Unknown ids are ignored.
    pub fn remove_modifier(&mut self, id: &str) -> Option<ValueModifier> {
        let removed = self.modifiers.remove(id)?;
        if self.modifiers.is_empty() {
            // Snap back to exact zero instead of carrying float residue.
            self.flat_total = 0.0;
            self.percent_total = 0.0;
        } else {
            self.flat_total -= removed.flat;
            self.percent_total -= removed.percent;
        }
        Some(removed)
    }

    pub fn clear_modifiers(&mut self) {
        self.modifiers.clear();
        self.flat_total = 0.0;
        self.percent_total = 0.0;
    }

    pub fn modifier(&self, id: &str) -> Option<&ValueModifier> {
        self.modifiers.get(id)
    }

    pub fn modifiers(&self) -> impl Iterator<Item = &ValueModifier> + '_ {
        self.modifiers.values()
    }

    pub fn modifier_count(&self) -> usize {
        self.modifiers.len()
    }
}

impl From<f64> for ModifiableValue {
    fn from(base: f64) -> Self {
        Self::new(base)
    }
}

/// Persisted shape: totals are derived, so only base, kind and modifiers are stored.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct ModifiableValueRepr {
    base: f64,
    #[serde(default)]
    kind: ValueKind,
    #[serde(default)]
    modifiers: Vec<ValueModifier>,
}

#[cfg(feature = "serde")]
impl From<ModifiableValueRepr> for ModifiableValue {
    fn from(repr: ModifiableValueRepr) -> Self {
        let mut value = Self::with_kind(repr.base, repr.kind);
        for modifier in repr.modifiers {
            value.set_modifier(modifier);
        }
        value
    }
}

#[cfg(feature = "serde")]
impl From<ModifiableValue> for ModifiableValueRepr {
    fn from(value: ModifiableValue) -> Self {
        Self {
            base: value.base,
            kind: value.kind,
            modifiers: value.modifiers.into_values().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn value_without_modifiers_is_base() {
        let value = ModifiableValue::new(3.5);
        assert!(approx(value.value(), 3.5));
    }

    #[test]
    fn flat_then_percent() {
        let mut value = ModifiableValue::new(10.0);
        value.set_modifier(ValueModifier::flat("gear", 5.0));
        value.set_modifier(ValueModifier::percent("buff", 0.2));
        value.set_modifier(ValueModifier::percent("aura", 0.1));

        // (10 + 5) × 1.3 = 19.5
        assert!(approx(value.value(), 19.5));
    }

    #[test]
    fn resetting_same_id_replaces_contribution() {
        let mut value = ModifiableValue::new(10.0);
        value.set_modifier(ValueModifier::new("gear", 5.0, 0.5));
        value.set_modifier(ValueModifier::new("gear", 2.0, 0.1));
        value.set_modifier(ValueModifier::new("gear", 1.0, 0.0));

        assert!(approx(value.flat_total(), 1.0));
        assert!(approx(value.percent_total(), 0.0));
        assert_eq!(value.modifier_count(), 1);
        assert!(approx(value.value(), 11.0));
    }

    #[test]
    fn arbitrary_sequence_matches_final_modifiers() {
        let mut value = ModifiableValue::new(0.0);
        value.set_modifier(ValueModifier::new("a", 1.0, 0.1));
        value.set_modifier(ValueModifier::new("b", 2.0, 0.2));
        value.remove_modifier("a");
        value.set_modifier(ValueModifier::new("b", 4.0, 0.4));
        value.set_modifier(ValueModifier::new("a", 8.0, 0.8));
        value.remove_modifier("missing");
        value.set_modifier(ValueModifier::new("c", 16.0, 0.0));
        value.remove_modifier("c");

        // Final set: a = (8, 0.8), b = (4, 0.4)
        assert!(approx(value.flat_total(), 12.0));
        assert!(approx(value.percent_total(), 1.2));
    }

    #[test]
    fn removing_unknown_id_is_noop() {
        let mut value = ModifiableValue::new(1.0);
        value.set_modifier(ValueModifier::flat("x", 1.0));
        assert!(value.remove_modifier("y").is_none());
        assert!(approx(value.value(), 2.0));
    }

    #[test]
    fn integer_kind_truncates_once_at_the_end() {
        let mut ticks = ModifiableValue::integer(3.0);
        ticks.set_modifier(ValueModifier::flat("a", 0.6));
        ticks.set_modifier(ValueModifier::flat("b", 0.6));

        // 4.2 truncated, not 3 + 0 + 0
        assert!(approx(ticks.value(), 4.0));
    }

    #[test]
    fn value_with_external_base_uses_stored_modifiers() {
        let mut value = ModifiableValue::new(100.0);
        value.set_modifier(ValueModifier::new("m", 1.0, 1.0));
        assert!(approx(value.value_with_base(4.0), 10.0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn persisted_form_rebuilds_totals() {
        let mut value = ModifiableValue::new(2.0);
        value.set_modifier(ValueModifier::new("a", 1.0, 0.5));
        value.set_modifier(ValueModifier::new("b", -0.5, 0.25));

        let json = serde_json::to_string(&value).expect("serialize");
        let restored: ModifiableValue = serde_json::from_str(&json).expect("deserialize");

        assert!(approx(restored.flat_total(), 0.5));
        assert!(approx(restored.percent_total(), 0.75));
        assert!(approx(restored.value(), value.value()));
    }

    #[test]
    fn clear_modifiers_restores_base() {
        let mut value = ModifiableValue::new(4.0);
        value.set_modifier(ValueModifier::new("gear", 2.0, 0.5));
        value.set_modifier(ValueModifier::percent("aura", 0.25));

        value.clear_modifiers();
        assert_eq!(value.modifier_count(), 0);
        assert_eq!(value.flat_total(), 0.0);
        assert_eq!(value.percent_total(), 0.0);
        assert!(approx(value.value(), 4.0));
    }
}
