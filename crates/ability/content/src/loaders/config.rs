//! Engine configuration loader.

use std::path::Path;

use ability_core::EngineConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`EngineConfig::default`].
    pub fn load(path: &Path) -> LoadResult<EngineConfig> {
        let content = read_file(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> LoadResult<EngineConfig> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if !config.global_cooldown.is_finite() || config.global_cooldown < 0.0 {
            anyhow::bail!(
                "global_cooldown must be finite and non-negative, got {}",
                config.global_cooldown
            );
        }
        Ok(config)
    }
}
