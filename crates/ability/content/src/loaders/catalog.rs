//! Ability catalog loader.

use std::collections::BTreeSet;
use std::path::Path;

use ability_core::{AbilityDefinition, AbilityId, BindReport, Bindable, FormulaRegistry};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::loaders::{LoadResult, read_file};

/// Ability catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbilityCatalog {
    pub abilities: Vec<AbilityDefinition>,
}

impl AbilityCatalog {
    pub fn new(abilities: Vec<AbilityDefinition>) -> Self {
        Self { abilities }
    }

    /// Checks every definition and rejects duplicate ids.
    pub fn validate(&self) -> LoadResult<()> {
        let mut seen = BTreeSet::new();
        for def in &self.abilities {
            def.validate()
                .map_err(|e| anyhow::anyhow!("Invalid ability in catalog: {}", e))?;
            if !seen.insert(&def.id) {
                anyhow::bail!("Duplicate ability id in catalog: {}", def.id);
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &AbilityId) -> Option<&AbilityDefinition> {
        self.abilities.iter().find(|def| &def.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &AbilityId> + '_ {
        self.abilities.iter().map(|def| &def.id)
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    /// Dry-run bind of every formula signature in the catalog.
    ///
    /// The catalog itself is left untouched; this only reports which
    /// signatures the registry cannot resolve.
    pub fn bind_report(&self, registry: &FormulaRegistry) -> BindReport {
        let mut report = BindReport::default();
        for def in &self.abilities {
            def.clone().bind_all(registry, &mut report);
        }
        report
    }
}

/// Loader for ability catalogs from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load and validate an ability catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<AbilityCatalog> {
        let content = read_file(path)?;
        let catalog = Self::from_str(&content)?;
        debug!(
            target: "ability::content",
            path = %path.display(),
            abilities = catalog.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_str(content: &str) -> LoadResult<AbilityCatalog> {
        let catalog: AbilityCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ability catalog RON: {}", e))?;
        catalog.validate()?;
        Ok(catalog)
    }
}
