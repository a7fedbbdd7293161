//! Built-in timing formulas.
//!
//! Every formula here has the timing shape `float (float base, int level)`.
//! Level 1 always reproduces the authored base.

use super::registry::{FormulaArg, FormulaDecl, FormulaProvider};
use super::signature::{FormulaSignature, ValueType};

/// Tag for formulas that make sense on cast/channel durations.
pub const TAG_DURATION: &str = "duration";
/// Tag for formulas that make sense on cooldowns.
pub const TAG_COOLDOWN: &str = "cooldown";
/// Tag for formulas that make sense on channel tick counts.
pub const TAG_TICKS: &str = "ticks";

const DECLARING_TYPE: &str = "Builtin";

/// Provider for the built-in formula library.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFormulas;

impl FormulaProvider for BuiltinFormulas {
    fn module_path(&self) -> &str {
        "ability_core::formula::builtin"
    }

    fn declarations(&self) -> Vec<FormulaDecl> {
        vec![
            timing("identity", identity)
                .tagged(TAG_DURATION)
                .tagged(TAG_COOLDOWN)
                .tagged(TAG_TICKS),
            timing("level_scaled", level_scaled).tagged(TAG_DURATION),
            timing("level_reduced", level_reduced)
                .tagged(TAG_DURATION)
                .tagged(TAG_COOLDOWN),
            timing("extra_tick_every_other_level", extra_tick_every_other_level)
                .tagged(TAG_TICKS),
        ]
    }
}

fn timing(method: &'static str, func: fn(&[FormulaArg]) -> f64) -> FormulaDecl {
    FormulaDecl::new(
        FormulaSignature::new(
            ValueType::Float,
            DECLARING_TYPE,
            method,
            [ValueType::Float, ValueType::Int],
        ),
        func,
    )
}

fn base_and_level(args: &[FormulaArg]) -> (f64, f64) {
    (args[0].as_f64(), args[1].as_f64().max(1.0))
}

fn identity(args: &[FormulaArg]) -> f64 {
    args[0].as_f64()
}

/// +10% per level above 1.
fn level_scaled(args: &[FormulaArg]) -> f64 {
    let (base, level) = base_and_level(args);
    base * (1.0 + 0.1 * (level - 1.0))
}

/// -5% compounding per level above 1.
fn level_reduced(args: &[FormulaArg]) -> f64 {
    let (base, level) = base_and_level(args);
    base * 0.95_f64.powf(level - 1.0)
}

fn extra_tick_every_other_level(args: &[FormulaArg]) -> f64 {
    let (base, level) = base_and_level(args);
    base + ((level - 1.0) / 2.0).floor()
}
