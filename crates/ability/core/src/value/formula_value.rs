//! Modifiable value whose base may come from a registered formula.

use crate::formula::{
    BindReport, Bindable, FormulaArg, FormulaBinding, FormulaRegistry, FormulaShape,
};

use super::modifiable::ModifiableValue;
use super::modifier::ValueModifier;

/// A [`ModifiableValue`] optionally driven by a formula.
///
/// When the formula is bound, it receives `(authored base, level)` and its
/// result replaces the base before modifiers apply. When it is unbound (empty
/// signature, or a signature the registry does not know) the authored base is
/// used unchanged. A formula registered with any shape other than
/// [`FormulaShape::timing`] counts as unbound.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormulaValue {
    pub value: ModifiableValue,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "FormulaBinding::is_empty")
    )]
    pub formula: FormulaBinding,
}

impl FormulaValue {
    pub fn new(value: ModifiableValue) -> Self {
        Self {
            value,
            formula: FormulaBinding::none(),
        }
    }

    pub fn with_formula(value: ModifiableValue, signature: impl Into<String>) -> Self {
        Self {
            value,
            formula: FormulaBinding::new(signature),
        }
    }

    /// Evaluates with lazy resolution of a not-yet-bound formula.
    pub fn evaluate(&mut self, registry: &FormulaRegistry, level: u32) -> f64 {
        if !self.formula.is_bound() {
            self.formula.resolve_as(registry, &FormulaShape::timing());
        }
        self.current(level)
    }

    /// Evaluates with whatever binding state is present, without resolving.
    pub fn current(&self, level: u32) -> f64 {
        let base = self.value.base();
        if self.formula.has_shape(&FormulaShape::timing()) {
            let computed = self
                .formula
                .invoke(&[FormulaArg::Float(base), FormulaArg::Int(i64::from(level))]);
            self.value.value_with_base(computed)
        } else {
            self.value.value()
        }
    }

    pub fn set_modifier(&mut self, modifier: ValueModifier) {
        self.value.set_modifier(modifier);
    }

    pub fn remove_modifier(&mut self, id: &str) -> Option<ValueModifier> {
        self.value.remove_modifier(id)
    }
}

impl From<f64> for FormulaValue {
    fn from(base: f64) -> Self {
        Self::new(ModifiableValue::new(base))
    }
}

impl Bindable for FormulaValue {
    fn bind_all(&mut self, registry: &FormulaRegistry, report: &mut BindReport) {
        self.formula
            .bind_as(registry, Some(&FormulaShape::timing()), report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{FormulaDecl, FormulaSignature, ValueType};

    const HALF: &str = "float Spells::half(float)";

    fn half(args: &[FormulaArg]) -> f64 {
        args[0].as_f64() / 2.0
    }

    fn registry_with_half() -> FormulaRegistry {
        let mut registry = FormulaRegistry::with_builtins();
        registry.register(FormulaDecl::new(
            FormulaSignature::new(ValueType::Float, "Spells", "half", [ValueType::Float]),
            half,
        ));
        registry
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn unbound_formula_uses_base_value() {
        let registry = FormulaRegistry::with_builtins();
        let mut value = FormulaValue::from(2.0);
        assert!(approx(value.evaluate(&registry, 5), 2.0));
    }

    #[test]
    fn formula_supplies_base_before_modifiers() {
        let registry = FormulaRegistry::with_builtins();
        let mut value = FormulaValue::with_formula(
            ModifiableValue::new(2.0),
            "float Builtin::level_scaled(float, int)",
        );
        value.set_modifier(ValueModifier::new("gear", 0.6, -0.5));

        // level 3: 2.0 × 1.2 = 2.4, then (2.4 + 0.6) × 0.5
        assert!(approx(value.evaluate(&registry, 3), 1.5));
    }

    #[test]
    fn unknown_formula_degrades_to_base() {
        let registry = FormulaRegistry::with_builtins();
        let mut value =
            FormulaValue::with_formula(ModifiableValue::new(4.0), "float Gone::away(float, int)");
        assert!(approx(value.evaluate(&registry, 9), 4.0));
        assert!(!value.formula.is_bound());
    }

    #[test]
    fn current_does_not_resolve() {
        let value = FormulaValue::with_formula(
            ModifiableValue::new(2.0),
            "float Builtin::level_scaled(float, int)",
        );
        assert!(approx(value.current(3), 2.0));
    }

    #[test]
    fn formula_of_another_shape_degrades_to_base() {
        let registry = registry_with_half();
        assert!(registry.contains(HALF));

        let mut value = FormulaValue::with_formula(ModifiableValue::new(2.0), HALF);
        assert!(approx(value.evaluate(&registry, 1), 2.0));
        assert!(!value.formula.is_bound());

        let report = value.bind(&registry);
        assert_eq!(report.unresolved, vec![HALF]);
    }

    #[test]
    fn direct_resolve_of_another_shape_is_never_invoked() {
        let registry = registry_with_half();
        let mut value = FormulaValue::with_formula(ModifiableValue::new(3.0), HALF);
        assert!(value.formula.resolve(&registry));
        assert!(approx(value.current(2), 3.0));
    }
}
