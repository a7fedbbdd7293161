//! Simulation settings read from the environment.
use std::env;

/// Stepping parameters for the simulation loop.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Overrides the engine config's global cooldown when set.
    pub global_cooldown: Option<f64>,
    /// Steps per simulated second.
    pub tick_rate: f64,
    /// Upper bound on the number of steps.
    pub ticks: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            global_cooldown: None,
            tick_rate: 10.0,
            ticks: 200,
        }
    }
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ABILITY_GLOBAL_COOLDOWN` - Global cooldown override in seconds
    /// - `ABILITY_TICK_RATE` - Steps per second (default: 10)
    /// - `ABILITY_TICKS` - Maximum steps to simulate (default: 200)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.global_cooldown = read_env::<f64>("ABILITY_GLOBAL_COOLDOWN").map(|v| v.max(0.0));

        if let Some(rate) = read_env::<f64>("ABILITY_TICK_RATE") {
            config.tick_rate = rate;
        }

        if let Some(ticks) = read_env::<u32>("ABILITY_TICKS") {
            config.ticks = ticks.max(1);
        }

        config
    }

    /// Seconds per step.
    pub fn dt(&self) -> f64 {
        if self.tick_rate > 0.0 {
            1.0 / self.tick_rate
        } else {
            1.0 / Self::default().tick_rate
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
