//! List the content a fight can draw from.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use combat_content::ContentLibrary;
use combat_core::{AffixKind, EffectTemplate};

use super::{OutputFormat, load_library};

/// List auras, talents and affixes of a content set
#[derive(Parser)]
pub struct Catalog {
    /// Directory with the content files (defaults to the built-in content)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

impl Catalog {
    pub fn execute(self) -> Result<()> {
        let library = load_library(self.data_dir.as_deref())?;
        match self.format {
            OutputFormat::Summary => print!("{}", render(&library)),
            OutputFormat::Json => {
                let talents: Vec<_> = library.talents.iter().map(|(d, _)| d).collect();
                let affixes: Vec<_> = library.affixes.iter().collect();
                let value = serde_json::json!({
                    "config": library.config,
                    "auras": library.auras.auras,
                    "talents": talents,
                    "affixes": affixes,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
        }
        Ok(())
    }
}

fn describe(effects: &[EffectTemplate]) -> String {
    if effects.is_empty() {
        return "-".to_string();
    }
    effects
        .iter()
        .map(|e| e.instantiate(1).description())
        .collect::<Vec<_>>()
        .join(", ")
}

fn render(library: &ContentLibrary) -> String {
    let mut out = String::new();

    out.push_str("Auras:\n");
    for aura in &library.auras.auras {
        let duration = aura
            .duration
            .map_or_else(|| "permanent".to_string(), |s| format!("{s}s"));
        out.push_str(&format!(
            "  {:<18} {:<10} {}\n",
            aura.name,
            duration,
            describe(&aura.effects)
        ));
    }

    out.push_str("Talents:\n");
    for (talent, _) in library.talents.iter() {
        out.push_str(&format!(
            "  {:<18} max {:<3} per level: {}\n",
            talent.name,
            talent.max_level,
            describe(&talent.effects_per_level)
        ));
    }

    out.push_str("Affixes:\n");
    for affix in library.affixes.iter() {
        let kind = match affix.kind {
            AffixKind::Prefix => "prefix",
            AffixKind::Suffix => "suffix",
        };
        out.push_str(&format!(
            "  {:<18} {:<7} lvl {:<3} {}\n",
            affix.name,
            kind,
            affix.required_level,
            describe(&affix.effects)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_lists_every_section() {
        let library = ContentLibrary::builtin().unwrap();
        let text = render(&library);
        assert!(text.contains("Auras:"));
        assert!(text.contains("Battle Shout"));
        assert!(text.contains("Swordsmanship"));
        assert!(text.contains("of the Bear"));
    }
}
