//! Combat configuration loader.

use std::path::Path;

use anyhow::Context;
use combat_core::CombatConfig;
use tracing::debug;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing CombatConfig
    ///
    /// # Returns
    ///
    /// Returns a validated CombatConfig. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig =
            toml::from_str(content).context("Failed to parse config TOML")?;
        config.validate()?;
        debug!(?config, "combat config loaded");
        Ok(config)
    }

    pub fn builtin() -> LoadResult<CombatConfig> {
        Self::parse(include_str!("../../data/combat.toml"))
    }
}
