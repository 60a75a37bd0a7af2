//! Content factory for loading a whole content set from a data directory.

use std::path::{Path, PathBuf};

use combat_core::{AffixRegistry, CombatConfig, TalentTree};

use crate::loaders::{
    AffixCatalogLoader, AuraCatalog, AuraCatalogLoader, ConfigLoader, LoadResult, Roster,
    RosterLoader, TalentCatalogLoader,
};

/// Everything fighters are resolved against: tunables plus the catalogs
/// their auras, affixes and talents are looked up in.
#[derive(Debug, Clone)]
pub struct ContentLibrary {
    pub config: CombatConfig,
    pub auras: AuraCatalog,
    pub affixes: AffixRegistry,
    /// Template tree with nothing learned; fighters learn on a clone.
    pub talents: TalentTree,
}

impl ContentLibrary {
    /// The data shipped inside this crate.
    pub fn builtin() -> LoadResult<Self> {
        Ok(Self {
            config: ConfigLoader::builtin()?,
            auras: AuraCatalogLoader::builtin()?,
            affixes: AffixCatalogLoader::builtin()?,
            talents: TalentCatalogLoader::builtin()?,
        })
    }
}

/// Content factory that loads combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── combat.toml
/// ├── auras.ron
/// ├── talents.ron
/// ├── affixes.ron
/// └── roster.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Path to the directory containing data files
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat configuration from `combat.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        ConfigLoader::load(&self.data_dir.join("combat.toml"))
    }

    /// Load aura templates from `auras.ron`.
    pub fn load_auras(&self) -> LoadResult<AuraCatalog> {
        AuraCatalogLoader::load(&self.data_dir.join("auras.ron"))
    }

    /// Load the talent tree from `talents.ron`.
    pub fn load_talents(&self) -> LoadResult<TalentTree> {
        TalentCatalogLoader::load(&self.data_dir.join("talents.ron"))
    }

    /// Load the affix registry from `affixes.ron`.
    pub fn load_affixes(&self) -> LoadResult<AffixRegistry> {
        AffixCatalogLoader::load(&self.data_dir.join("affixes.ron"))
    }

    /// Load fighters from `roster.ron`.
    pub fn load_roster(&self) -> LoadResult<Roster> {
        RosterLoader::load(&self.data_dir.join("roster.ron"))
    }

    /// Load config and every catalog.
    pub fn load_library(&self) -> LoadResult<ContentLibrary> {
        Ok(ContentLibrary {
            config: self.load_config()?,
            auras: self.load_auras()?,
            affixes: self.load_affixes()?,
            talents: self.load_talents()?,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
