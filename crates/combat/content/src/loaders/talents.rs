//! Talent tree catalog loader.

use std::path::Path;

use anyhow::Context;
use combat_core::{TalentDefinition, TalentTree};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Talent catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TalentCatalog {
    pub talents: Vec<TalentDefinition>,
}

/// Loader for talent trees from RON files.
pub struct TalentCatalogLoader;

impl TalentCatalogLoader {
    /// Load a talent tree from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing a TalentCatalog
    ///
    /// # Returns
    ///
    /// Returns an empty (nothing learned) TalentTree built from the definitions.
    pub fn load(path: &Path) -> LoadResult<TalentTree> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("Invalid talent catalog {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<TalentTree> {
        let catalog: TalentCatalog = parse_ron(content, "talent catalog")?;
        let tree = TalentTree::new(catalog.talents)?;
        tracing::debug!(count = tree.len(), "talent tree loaded");
        Ok(tree)
    }

    pub fn builtin() -> LoadResult<TalentTree> {
        Self::parse(include_str!("../../data/talents.ron"))
    }
}
