//! Two-phase load: plain-data round trip, then rebinding formulas.
#![cfg(feature = "serde")]

use std::sync::Arc;

use ability_core::{
    AbilityDefinition, AbilityId, AbilityManager, ActorId, CastContext, EngineConfig, FormulaArg,
    FormulaBinding, FormulaRegistry, FormulaValue, ManagerSnapshot, ModifiableValue, NullEnv,
    TimingKind, ValueModifier,
};

const LEVEL_SCALED: &str = "float Builtin::level_scaled(float, int)";

#[test]
fn binding_round_trip_invokes_identically() {
    let registry = FormulaRegistry::with_builtins();
    let mut original = FormulaBinding::new(LEVEL_SCALED);
    original.resolve(&registry);

    let json = serde_json::to_string(&original).unwrap();
    assert_eq!(json, format!("{LEVEL_SCALED:?}"));

    let mut loaded: FormulaBinding = serde_json::from_str(&json).unwrap();
    assert!(!loaded.is_bound());
    assert!(loaded.resolve(&registry));

    let args = [FormulaArg::Float(2.0), FormulaArg::Int(4)];
    assert_eq!(original.invoke(&args), loaded.invoke(&args));
    assert_eq!(original, loaded);
}

#[test]
fn manager_snapshot_restores_charges_and_modifiers() {
    let registry = Arc::new(FormulaRegistry::with_builtins());
    let mut manager = AbilityManager::new(ActorId(3), registry.clone(), EngineConfig::new());
    let def = AbilityDefinition::timed("fireball", 2.0)
        .with_timing(
            TimingKind::Cooldown,
            FormulaValue::with_formula(ModifiableValue::new(8.0), LEVEL_SCALED),
        )
        .with_charges(2)
        .at_level(3);
    manager.grant(def.clone()).unwrap();
    manager.grant(def).unwrap();

    let id = AbilityId::new("fireball");
    manager
        .ability_mut(&id)
        .unwrap()
        .timing_mut(TimingKind::CastTime)
        .set_modifier(ValueModifier::percent("haste", -0.25));

    manager
        .try_cast(&id, CastContext::new(ActorId(3)), &NullEnv)
        .unwrap();
    manager.tick(1.5, &NullEnv);
    assert!(!manager.is_casting());

    let json = serde_json::to_string(&manager.snapshot()).unwrap();
    let snapshot: ManagerSnapshot = serde_json::from_str(&json).unwrap();
    let mut restored = AbilityManager::restore(snapshot, registry.clone()).unwrap();

    assert_eq!(restored.grants(&id), 2);
    let fireball = restored.ability_mut(&id).unwrap();
    assert_eq!(fireball.available_charge_count(), 1);
    assert!(fireball.timing(TimingKind::Cooldown).formula.is_bound());
    assert!((fireball.resolved_duration(&registry) - 1.5).abs() < 1e-9);

    // level 3: 8.0 × 1.2
    assert!((fireball.evaluate(TimingKind::Cooldown, &registry) - 9.6).abs() < 1e-9);
    let remaining = fireball.charges().get(0).unwrap().remaining;
    assert!((remaining - 9.6).abs() < 1e-9);
}

#[test]
fn unknown_signature_restores_to_base_value() {
    let registry = Arc::new(FormulaRegistry::with_builtins());
    let mut manager = AbilityManager::new(ActorId(1), registry.clone(), EngineConfig::new());
    manager
        .grant(AbilityDefinition::timed("old", 1.0).with_timing(
            TimingKind::CastTime,
            FormulaValue::with_formula(ModifiableValue::new(4.0), "float Retired::f(float, int)"),
        ))
        .unwrap();

    let snapshot = manager.snapshot();
    let mut restored = AbilityManager::restore(snapshot, registry.clone()).unwrap();
    let old = restored.ability_mut(&AbilityId::new("old")).unwrap();
    assert!(!old.timing(TimingKind::CastTime).formula.is_bound());
    assert!((old.resolved_duration(&registry) - 4.0).abs() < 1e-9);
}
