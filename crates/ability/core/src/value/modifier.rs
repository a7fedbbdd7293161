//! Named flat/percent adjustments.

/// A single named adjustment applied to a [`ModifiableValue`](super::ModifiableValue).
///
/// Modifiers are value objects: to change one, build a new modifier with the
/// same `id` and set it again. The owner replaces the previous contribution
/// rather than stacking a second one.
///
/// - **flat**: added to the base before scaling (e.g., `+0.5` seconds)
/// - **percent**: summed with other percents, then applied as `× (1 + Σ)`;
///   stored as a fraction (`0.2` = +20%, `-0.3` = -30%)
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueModifier {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flat: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub percent: f64,
}

impl ValueModifier {
    pub fn new(id: impl Into<String>, flat: f64, percent: f64) -> Self {
        Self {
            id: id.into(),
            flat,
            percent,
        }
    }

    /// Create a purely additive modifier.
    pub fn flat(id: impl Into<String>, flat: f64) -> Self {
        Self::new(id, flat, 0.0)
    }

    /// Create a purely multiplicative modifier (`0.2` = +20%).
    pub fn percent(id: impl Into<String>, percent: f64) -> Self {
        Self::new(id, 0.0, percent)
    }
}
