//! Modifiable value model.
//!
//! Every timing number an ability reads (cast time, channel time, channel
//! tick count, cooldown) is a [`ModifiableValue`]: a base plus a replace-by-id
//! set of flat/percent [`ValueModifier`]s.
//!
//! ```text
//! value = (base + Σ flat) × (1 + Σ percent)      [truncate once if Integer]
//! ```
//!
//! [`BoundedModifiableValue`] adds a min/max pair that can carry modifiers of
//! their own, and [`FormulaValue`] lets an externally registered formula supply
//! the base before modifiers apply.

pub mod bounded;
pub mod formula_value;
pub mod modifiable;
pub mod modifier;

pub use bounded::BoundedModifiableValue;
pub use formula_value::FormulaValue;
pub use modifiable::{ModifiableValue, ValueKind};
pub use modifier::ValueModifier;
