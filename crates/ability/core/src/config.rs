/// Engine configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Shared lockout (seconds) applied after a successful instant cast.
    /// Abilities flagged with `ignores_global_cooldown` neither trigger nor
    /// respect it.
    pub global_cooldown: f64,

    /// When true, a cast request made while another cast is in progress is
    /// parked in the single queued slot. When false it is rejected as busy.
    pub queue_while_casting: bool,
}

impl EngineConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of charges a single ability may carry.
    pub const MAX_CHARGES: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_GLOBAL_COOLDOWN: f64 = 1.0;

    pub fn new() -> Self {
        Self {
            global_cooldown: Self::DEFAULT_GLOBAL_COOLDOWN,
            queue_while_casting: true,
        }
    }

    pub fn with_global_cooldown(global_cooldown: f64) -> Self {
        Self {
            global_cooldown,
            ..Self::new()
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
