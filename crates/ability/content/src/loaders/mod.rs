//! Content loaders for reading ability data from files.
//!
//! RON holds ability catalogs, TOML holds engine configuration.

pub mod catalog;
pub mod config;
pub mod factory;

pub use catalog::{AbilityCatalog, CatalogLoader};
pub use config::ConfigLoader;
pub use factory::ContentFactory;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
