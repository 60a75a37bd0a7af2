//! Item affix catalog loader.

use std::path::Path;

use anyhow::{Context, bail};
use combat_core::{Affix, AffixRegistry};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Affix catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffixCatalog {
    pub affixes: Vec<Affix>,
}

/// Loader for affix registries from RON files.
pub struct AffixCatalogLoader;

impl AffixCatalogLoader {
    /// Load an affix registry from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing an AffixCatalog
    ///
    /// # Returns
    ///
    /// Returns an AffixRegistry holding every affix in file order.
    pub fn load(path: &Path) -> LoadResult<AffixRegistry> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("Invalid affix catalog {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<AffixRegistry> {
        let catalog: AffixCatalog = parse_ron(content, "affix catalog")?;
        let mut registry = AffixRegistry::default();
        for affix in catalog.affixes {
            if registry.get(&affix.name).is_some() {
                bail!("Duplicate affix '{}'", affix.name);
            }
            if affix.slots.is_empty() {
                bail!("Affix '{}' fits no item slot", affix.name);
            }
            registry.register(affix);
        }
        tracing::debug!(count = registry.len(), "affix registry loaded");
        Ok(registry)
    }

    pub fn builtin() -> LoadResult<AffixRegistry> {
        Self::parse(include_str!("../../data/affixes.ron"))
    }
}
