//! Decode aura lists written by `duel --save-auras`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use combat_core::{AuraList, Persist};

use super::OutputFormat;

/// Decode a saved aura list
#[derive(Parser)]
pub struct InspectAuras {
    /// File written by `duel --save-auras`
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

impl InspectAuras {
    pub fn execute(self) -> Result<()> {
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let auras = AuraList::load(&bytes)
            .with_context(|| format!("Failed to decode aura list {}", self.path.display()))?;

        match self.format {
            OutputFormat::Summary => print!("{}", render(&auras)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&auras)?),
        }
        Ok(())
    }
}

fn render(auras: &AuraList) -> String {
    if auras.is_empty() {
        return "no auras\n".to_string();
    }
    let mut out = String::new();
    for aura in auras.iter() {
        let remaining = aura
            .remaining()
            .map_or_else(|| "permanent".to_string(), |s| format!("{s:.2}s left"));
        out.push_str(&format!("{} ({remaining}, x{})\n", aura.name(), aura.stacks()));
        for effect in aura.effects() {
            out.push_str(&format!("    {}\n", effect.description()));
        }
    }
    out
}
