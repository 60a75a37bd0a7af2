//! Data-driven combat content and its loaders.
//!
//! Everything a fight needs that is data rather than rules lives here:
//! - Combat tunables (TOML)
//! - Aura templates (RON)
//! - Talent trees (RON)
//! - Item affixes (RON)
//! - Fighter rosters with their attacks (RON)
//!
//! Each loader reads a file into `combat-core` types. The same data ships
//! embedded in the crate so tools work without any files on disk.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AffixCatalogLoader, AttackKindSpec, AttackSpec, AuraCatalog, AuraCatalogLoader, ConfigLoader,
    ContentFactory, ContentLibrary, FighterSpec, HitEffectSpec, ItemSpec, LimiterSpec, LoadResult,
    Roster, RosterLoader, TalentCatalogLoader,
};
