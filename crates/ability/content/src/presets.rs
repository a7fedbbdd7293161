//! Built-in starter abilities.
//!
//! A small, hand-written set used when no catalog file is supplied. It covers
//! every cast shape: timed, channeled, instant with charges, and targeted.

use ability_core::{
    AbilityDefinition, CastPhases, FormulaValue, ModifiableValue, Requirement, RequirementSpec,
    TargetMode, TimingKind,
};

/// Cooldown that shrinks 5% per level past the first.
const LEVEL_REDUCED: &str = "float Builtin::level_reduced(float, int)";
/// Adds one channel tick every other level.
const EXTRA_TICKS: &str = "float Builtin::extra_tick_every_other_level(float, int)";

pub fn starter_definitions() -> Vec<AbilityDefinition> {
    vec![
        AbilityDefinition::timed("fireball", 2.0)
            .named("Fireball")
            .with_timing(
                TimingKind::Cooldown,
                FormulaValue::with_formula(ModifiableValue::new(8.0), LEVEL_REDUCED),
            )
            .with_requirement(Requirement::NotMoving)
            .with_requirement(Requirement::AttributeAtLeast {
                attribute: "mana".into(),
                value: 20.0,
            }),
        AbilityDefinition::channeled("drain_life", 3.0, 3)
            .named("Drain Life")
            .with_timing(
                TimingKind::ChannelTicks,
                FormulaValue::with_formula(ModifiableValue::integer(3.0), EXTRA_TICKS),
            )
            .with_cooldown(12.0)
            .targeting(TargetMode::Actor)
            .with_requirement(
                RequirementSpec::new(Requirement::TargetInRange { range: 20.0 })
                    .in_phases(CastPhases::START | CastPhases::UPDATE),
            ),
        AbilityDefinition::new("blink")
            .named("Blink")
            .with_charges(2)
            .with_cooldown(6.0)
            .targeting(TargetMode::Point)
            .ignoring_global_cooldown(),
        AbilityDefinition::new("shield_bash")
            .named("Shield Bash")
            .with_cooldown(4.0)
            .targeting(TargetMode::Actor)
            .with_requirement(Requirement::TargetAlive),
    ]
}
