mod catalog;
mod duel;
mod inspect;

pub use catalog::Catalog;
pub use duel::Duel;
pub use inspect::InspectAuras;

use std::path::Path;

use anyhow::Result;
use combat_content::{ContentFactory, ContentLibrary};

/// Output format shared by the reporting commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Summary,
    /// Pretty-printed JSON
    Json,
}

/// Library from `data_dir` when given, otherwise the built-in content.
fn load_library(data_dir: Option<&Path>) -> Result<ContentLibrary> {
    match data_dir {
        Some(dir) => ContentFactory::new(dir).load_library(),
        None => ContentLibrary::builtin(),
    }
}
