//! Aura template catalog loader.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, bail};
use combat_core::{Aura, AuraTemplate, EntityId};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Aura catalog structure for RON files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuraCatalog {
    pub auras: Vec<AuraTemplate>,
}

impl AuraCatalog {
    pub fn get(&self, name: &str) -> Option<&AuraTemplate> {
        self.auras.iter().find(|t| t.name == name)
    }

    /// Instantiate the template called `name`.
    pub fn instantiate(&self, name: &str, source: Option<EntityId>) -> LoadResult<Aura> {
        self.get(name)
            .map(|template| template.instantiate(source))
            .with_context(|| format!("Unknown aura '{name}'"))
    }

    pub fn len(&self) -> usize {
        self.auras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.auras.is_empty()
    }
}

/// Loader for aura catalogs from RON files.
pub struct AuraCatalogLoader;

impl AuraCatalogLoader {
    /// Load an aura catalog from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing an AuraCatalog
    ///
    /// # Returns
    ///
    /// Returns the catalog. Duplicate aura names are rejected.
    pub fn load(path: &Path) -> LoadResult<AuraCatalog> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("Invalid aura catalog {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<AuraCatalog> {
        let catalog: AuraCatalog = parse_ron(content, "aura catalog")?;

        let mut seen = HashSet::new();
        for template in &catalog.auras {
            if !seen.insert(template.name.as_str()) {
                bail!("Duplicate aura '{}'", template.name);
            }
            if let Some(duration) = template.duration
                && !(duration >= 0.0)
            {
                bail!("Aura '{}' has negative duration {duration}", template.name);
            }
            if let Some(periodic) = template.periodic
                && !(periodic.interval > 0.0)
            {
                bail!("Aura '{}' has a non-positive tick interval", template.name);
            }
        }
        tracing::debug!(count = catalog.len(), "aura catalog loaded");
        Ok(catalog)
    }

    pub fn builtin() -> LoadResult<AuraCatalog> {
        Self::parse(include_str!("../../data/auras.ron"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{EffectKind, ManipulationType, PowerType, Scope, StackPolicy, StatKind};
    use std::io::Write;

    const CATALOG: &str = r#"(
        auras: [
            (
                name: "Haste",
                duration: Some(8.0),
                effects: [
                    (kind: Stat(Only(AttackSpeed)), manipulation: Percental, value: 25.0),
                ],
            ),
            (
                name: "Poison",
                duration: Some(6.0),
                max_stacks: Some(5),
                periodic: Some((interval: 1.0, power: Life, amount: -3)),
            ),
            (
                name: "Ward",
            ),
        ],
    )"#;

    #[test]
    fn parses_templates_with_defaults() {
        let catalog = AuraCatalogLoader::parse(CATALOG).unwrap();
        assert_eq!(catalog.len(), 3);

        let haste = catalog.get("Haste").unwrap();
        assert_eq!(haste.effects[0].kind, EffectKind::Stat(Scope::Only(StatKind::AttackSpeed)));
        assert_eq!(haste.effects[0].manipulation, ManipulationType::Percental);

        let poison = catalog.instantiate("Poison", Some(EntityId(4))).unwrap();
        assert_eq!(poison.stack_policy(), StackPolicy::Stack { max_stacks: 5 });
        assert_eq!(poison.periodic().unwrap().power, PowerType::Life);
        assert_eq!(poison.source(), Some(EntityId(4)));

        let ward = catalog.instantiate("Ward", None).unwrap();
        assert!(ward.is_permanent());
        assert!(ward.effects().is_empty());
    }

    #[test]
    fn unknown_aura_is_an_error() {
        let catalog = AuraCatalogLoader::parse(CATALOG).unwrap();
        assert!(catalog.instantiate("Missing", None).is_err());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = AuraCatalogLoader::parse(r#"(auras: [(name: "A"), (name: "A")])"#).unwrap_err();
        assert!(err.to_string().contains("Duplicate aura 'A'"));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let text = r#"(auras: [(
            name: "Odd",
            effects: [(kind: Stat(Only(Luck)), manipulation: Fixed, value: 1.0)],
        )])"#;
        assert!(AuraCatalogLoader::parse(text).is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auras.ron");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();

        let catalog = AuraCatalogLoader::load(&path).unwrap();
        assert!(catalog.get("Poison").is_some());
    }

    #[test]
    fn builtin_catalog_parses() {
        let catalog = AuraCatalogLoader::builtin().unwrap();
        assert!(!catalog.is_empty());
    }
}
