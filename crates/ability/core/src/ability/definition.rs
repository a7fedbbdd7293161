//! Plain-data ability descriptions.
//!
//! A definition is what content files author and what snapshots persist. It
//! carries no resolved formula handles; an [`Ability`](super::Ability) built
//! from it binds its timings against a registry.

use crate::config::EngineConfig;
use crate::error::{EngineError, ErrorSeverity};
use crate::formula::{BindReport, Bindable, FormulaRegistry, FormulaSignature, SignatureError};
use crate::value::{FormulaValue, ModifiableValue};

use super::requirement::RequirementSpec;
use super::state::{AbilityId, CastMode, TargetMode};

/// Selects one of an ability's timing values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TimingKind {
    CastTime,
    ChannelTime,
    ChannelTicks,
    Cooldown,
}

/// The four timing numbers of an ability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AbilityTimings {
    /// Seconds spent in Casting for timed abilities.
    pub cast_time: FormulaValue,
    /// Seconds spent in Casting for channeled abilities.
    pub channel_time: FormulaValue,
    /// Evenly spaced channel ticks; read as an integer, at least one.
    pub channel_ticks: FormulaValue,
    /// Cooldown applied to the charge consumed on completion.
    pub cooldown: FormulaValue,
}

impl Default for AbilityTimings {
    fn default() -> Self {
        Self {
            cast_time: FormulaValue::from(0.0),
            channel_time: FormulaValue::from(0.0),
            channel_ticks: FormulaValue::new(ModifiableValue::integer(1.0)),
            cooldown: FormulaValue::from(0.0),
        }
    }
}

impl AbilityTimings {
    pub fn get(&self, kind: TimingKind) -> &FormulaValue {
        match kind {
            TimingKind::CastTime => &self.cast_time,
            TimingKind::ChannelTime => &self.channel_time,
            TimingKind::ChannelTicks => &self.channel_ticks,
            TimingKind::Cooldown => &self.cooldown,
        }
    }

    pub fn get_mut(&mut self, kind: TimingKind) -> &mut FormulaValue {
        match kind {
            TimingKind::CastTime => &mut self.cast_time,
            TimingKind::ChannelTime => &mut self.channel_time,
            TimingKind::ChannelTicks => &mut self.channel_ticks,
            TimingKind::Cooldown => &mut self.cooldown,
        }
    }

    fn iter(&self) -> impl Iterator<Item = (TimingKind, &FormulaValue)> + '_ {
        [
            TimingKind::CastTime,
            TimingKind::ChannelTime,
            TimingKind::ChannelTicks,
            TimingKind::Cooldown,
        ]
        .into_iter()
        .map(move |kind| (kind, self.get(kind)))
    }
}

impl Bindable for AbilityTimings {
    fn bind_all(&mut self, registry: &FormulaRegistry, report: &mut BindReport) {
        self.cast_time.bind_all(registry, report);
        self.channel_time.bind_all(registry, report);
        self.channel_ticks.bind_all(registry, report);
        self.cooldown.bind_all(registry, report);
    }
}

const fn default_level() -> u32 {
    1
}

const fn default_charges() -> usize {
    1
}

/// Authored description of one ability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityDefinition {
    pub id: AbilityId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default = "default_level"))]
    pub level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cast_mode: CastMode,
    #[cfg_attr(feature = "serde", serde(default))]
    pub target_mode: TargetMode,
    #[cfg_attr(feature = "serde", serde(default))]
    pub timings: AbilityTimings,
    #[cfg_attr(feature = "serde", serde(default = "default_charges"))]
    pub charges: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub requirements: Vec<RequirementSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ignores_global_cooldown: bool,
}

impl AbilityDefinition {
    /// An instant, untargeted, single-charge ability with no cooldown.
    pub fn new(id: impl Into<AbilityId>) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            level: default_level(),
            cast_mode: CastMode::Timed,
            target_mode: TargetMode::None,
            timings: AbilityTimings::default(),
            charges: default_charges(),
            requirements: Vec::new(),
            ignores_global_cooldown: false,
        }
    }

    pub fn timed(id: impl Into<AbilityId>, cast_time: f64) -> Self {
        let mut def = Self::new(id);
        def.timings.cast_time = FormulaValue::from(cast_time);
        def
    }

    pub fn channeled(id: impl Into<AbilityId>, channel_time: f64, ticks: u32) -> Self {
        let mut def = Self::new(id);
        def.cast_mode = CastMode::Channeled;
        def.timings.channel_time = FormulaValue::from(channel_time);
        def.timings.channel_ticks = FormulaValue::new(ModifiableValue::integer(f64::from(ticks)));
        def
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_cooldown(mut self, cooldown: f64) -> Self {
        self.timings.cooldown = FormulaValue::from(cooldown);
        self
    }

    /// Replaces one timing wholesale (e.g., to attach a formula).
    #[must_use]
    pub fn with_timing(mut self, kind: TimingKind, value: FormulaValue) -> Self {
        *self.timings.get_mut(kind) = value;
        self
    }

    #[must_use]
    pub fn with_charges(mut self, charges: usize) -> Self {
        self.charges = charges;
        self
    }

    #[must_use]
    pub fn with_requirement(mut self, requirement: impl Into<RequirementSpec>) -> Self {
        self.requirements.push(requirement.into());
        self
    }

    #[must_use]
    pub fn ignoring_global_cooldown(mut self) -> Self {
        self.ignores_global_cooldown = true;
        self
    }

    #[must_use]
    pub fn targeting(mut self, mode: TargetMode) -> Self {
        self.target_mode = mode;
        self
    }

    #[must_use]
    pub fn at_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Checks the structural constraints an [`Ability`](super::Ability) relies on.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.id.as_str().trim().is_empty() {
            return Err(DefinitionError::EmptyId);
        }
        if !(1..=EngineConfig::MAX_CHARGES).contains(&self.charges) {
            return Err(DefinitionError::ChargeCount {
                id: self.id.clone(),
                count: self.charges,
            });
        }
        for (kind, timing) in self.timings.iter() {
            let base = timing.value.base();
            if base < 0.0 || !base.is_finite() {
                return Err(DefinitionError::InvalidTiming {
                    id: self.id.clone(),
                    timing: kind,
                    value: base,
                });
            }
            if !timing.formula.is_empty() {
                FormulaSignature::parse(timing.formula.signature()).map_err(|source| {
                    DefinitionError::Signature {
                        id: self.id.clone(),
                        timing: kind,
                        source,
                    }
                })?;
            }
        }
        Ok(())
    }
}

impl Bindable for AbilityDefinition {
    fn bind_all(&mut self, registry: &FormulaRegistry, report: &mut BindReport) {
        self.timings.bind_all(registry, report);
    }
}

/// Structural problems in an [`AbilityDefinition`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DefinitionError {
    #[error("ability id is empty")]
    EmptyId,

    #[error("ability {id}: charge count {count} outside 1..={max}", max = EngineConfig::MAX_CHARGES)]
    ChargeCount { id: AbilityId, count: usize },

    #[error("ability {id}: {timing} base {value} must be finite and non-negative")]
    InvalidTiming {
        id: AbilityId,
        timing: TimingKind,
        value: f64,
    },

    #[error("ability {id}: {timing} formula: {source}")]
    Signature {
        id: AbilityId,
        timing: TimingKind,
        #[source]
        source: SignatureError,
    },
}

impl EngineError for DefinitionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyId => "DEFINITION_EMPTY_ID",
            Self::ChargeCount { .. } => "DEFINITION_CHARGE_COUNT",
            Self::InvalidTiming { .. } => "DEFINITION_INVALID_TIMING",
            Self::Signature { .. } => "DEFINITION_SIGNATURE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_fill_expected_fields() {
        let def = AbilityDefinition::channeled("drain", 3.0, 3)
            .with_cooldown(8.0)
            .with_charges(2)
            .at_level(4);

        assert_eq!(def.cast_mode, CastMode::Channeled);
        assert_eq!(def.timings.channel_ticks.value.value(), 3.0);
        assert_eq!(def.timings.cooldown.value.base(), 8.0);
        assert_eq!(def.charges, 2);
        assert_eq!(def.level, 4);
        assert_eq!(def.name, "drain");
        assert!(def.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_charge_counts() {
        let err = AbilityDefinition::new("x").with_charges(0).validate().unwrap_err();
        assert_eq!(err.error_code(), "DEFINITION_CHARGE_COUNT");

        let too_many = EngineConfig::MAX_CHARGES + 1;
        assert!(AbilityDefinition::new("x").with_charges(too_many).validate().is_err());
    }

    #[test]
    fn validate_rejects_negative_cooldown() {
        let err = AbilityDefinition::new("x").with_cooldown(-1.0).validate().unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::InvalidTiming {
                timing: TimingKind::Cooldown,
                ..
            }
        ));
    }

    #[test]
    fn validate_rejects_malformed_signature_but_not_unknown_one() {
        let malformed = AbilityDefinition::timed("x", 1.0).with_timing(
            TimingKind::CastTime,
            FormulaValue::with_formula(ModifiableValue::new(1.0), "not a signature"),
        );
        assert_eq!(
            malformed.validate().unwrap_err().error_code(),
            "DEFINITION_SIGNATURE"
        );

        // Well-formed but unregistered signatures degrade at bind time instead.
        let unknown = AbilityDefinition::timed("x", 1.0).with_timing(
            TimingKind::CastTime,
            FormulaValue::with_formula(ModifiableValue::new(1.0), "float Nowhere::f(float, int)"),
        );
        assert!(unknown.validate().is_ok());
    }

    #[test]
    fn bind_reports_unresolved_timings() {
        let registry = FormulaRegistry::with_builtins();
        let mut def = AbilityDefinition::timed("x", 1.0)
            .with_timing(
                TimingKind::CastTime,
                FormulaValue::with_formula(
                    ModifiableValue::new(1.0),
                    "float Builtin::level_scaled(float, int)",
                ),
            )
            .with_timing(
                TimingKind::Cooldown,
                FormulaValue::with_formula(ModifiableValue::new(1.0), "float Gone::f(float, int)"),
            );

        let report = def.bind(&registry);
        assert_eq!(report.bound, 1);
        assert_eq!(report.unresolved, vec!["float Gone::f(float, int)".to_string()]);
    }
}
