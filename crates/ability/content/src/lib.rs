//! Data-driven ability content and loaders.
//!
//! This crate houses authored ability data and provides loaders for RON/TOML
//! data files:
//! - Ability catalogs (data-driven via RON)
//! - Engine configuration (data-driven via TOML)
//! - A built-in starter set for tools and demos
//!
//! All loaders deserialize ability-core types directly and validate them
//! before they reach the engine, so malformed formula signatures and bad
//! charge counts surface as load errors rather than panics.

pub mod presets;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use presets::starter_definitions;

#[cfg(feature = "loaders")]
pub use loaders::{AbilityCatalog, CatalogLoader, ConfigLoader, ContentFactory, LoadResult};
