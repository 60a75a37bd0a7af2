//! Content loaders for reading combat data from files.
//!
//! Every loader offers `load(path)` for files on disk, `parse(text)` for
//! in-memory data and `builtin()` for the data embedded in this crate.

pub mod affixes;
pub mod auras;
pub mod config;
pub mod factory;
pub mod roster;
pub mod talents;

pub use affixes::AffixCatalogLoader;
pub use auras::{AuraCatalog, AuraCatalogLoader};
pub use config::ConfigLoader;
pub use factory::{ContentFactory, ContentLibrary};
pub use roster::{
    AttackKindSpec, AttackSpec, ClipSpec, FighterSpec, HitEffectSpec, ItemSpec, LimiterSpec, Roster,
    RosterLoader,
};
pub use talents::TalentCatalogLoader;

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
}

/// Parse a RON document, naming `what` in the error.
pub(crate) fn parse_ron<T: serde::de::DeserializeOwned>(text: &str, what: &str) -> LoadResult<T> {
    ron::from_str(text).with_context(|| format!("Failed to parse {what} RON"))
}
