//! Fight two roster entries against each other.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use combat_content::{
    AuraCatalogLoader, ConfigLoader, ContentFactory, ContentLibrary, Roster, RosterLoader,
};
use combat_core::{Arena, ArenaTick, EntityId, FrameAnimator, PcgRng, Persist, RngOracle};
use tracing::{debug, info};

use super::{OutputFormat, load_library};
use crate::summary::DuelSummary;

/// Fight the first two fighters of a roster against each other
#[derive(Parser)]
pub struct Duel {
    /// Directory with combat.toml, auras.ron, talents.ron, affixes.ron and roster.ron
    /// (defaults to the built-in content)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Combat tunables (TOML), overriding the data directory's
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Aura catalog (RON), overriding the data directory's
    #[arg(long, value_name = "FILE")]
    auras: Option<PathBuf>,

    /// Fighter roster (RON), overriding the data directory's
    #[arg(long, value_name = "FILE")]
    roster: Option<PathBuf>,

    /// Seed for the random source
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Maximum number of arena updates
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Seconds per update
    #[arg(long, default_value_t = 0.05)]
    dt: f32,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,

    /// Write each fighter's final aura list to DIR/<name>.auras.bin
    #[arg(long, value_name = "DIR")]
    save_auras: Option<PathBuf>,
}

impl Duel {
    pub fn execute(self) -> Result<()> {
        if !(self.dt > 0.0) {
            bail!("--dt must be positive, got {}", self.dt);
        }

        let library = self.library()?;
        let roster = self.load_roster()?;
        let summary = run_duel(
            &library,
            &roster,
            self.seed,
            self.ticks,
            self.dt,
            self.save_auras.as_deref(),
        )?;

        match self.format {
            OutputFormat::Summary => println!("{summary}"),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        }
        Ok(())
    }

    fn library(&self) -> Result<ContentLibrary> {
        let mut library = load_library(self.data_dir.as_deref())?;
        if let Some(path) = &self.config {
            library.config = ConfigLoader::load(path)?;
        }
        if let Some(path) = &self.auras {
            library.auras = AuraCatalogLoader::load(path)?;
        }
        Ok(library)
    }

    fn load_roster(&self) -> Result<Roster> {
        match (&self.roster, &self.data_dir) {
            (Some(path), _) => RosterLoader::load(path),
            (None, Some(dir)) => ContentFactory::new(dir).load_roster(),
            (None, None) => RosterLoader::builtin(),
        }
    }
}

/// Run the duel to a decision or until `ticks` updates have passed.
pub(crate) fn run_duel(
    library: &ContentLibrary,
    roster: &Roster,
    seed: u64,
    ticks: u32,
    dt: f32,
    save_auras: Option<&Path>,
) -> Result<DuelSummary> {
    let mut rng = PcgRng::seeded(seed);
    let mut stage = Stage::new(library, roster, &mut rng)?;
    stage.arena.events_mut().entity_died.subscribe(|died| {
        info!(entity = %died.entity, killer = ?died.killer, "fighter down");
    });

    let mut summary = DuelSummary::new(seed, stage.fighters.clone());
    info!(
        seed,
        first = %stage.fighters[0].1,
        second = %stage.fighters[1].1,
        "duel started"
    );

    for _ in 0..ticks {
        let tick = stage.step(dt, &mut rng);
        for report in &tick.reports {
            debug!(
                attacker = %report.attacker,
                defender = %report.defender,
                receive = ?report.result.receive,
                damage = report.result.total(),
                "strike"
            );
        }
        summary.record(&tick);
        if stage.arena.survivors().len() < 2 {
            break;
        }
    }
    summary.finish(&stage.arena);
    info!(winner = ?summary.winner, ticks = summary.ticks, "duel finished");

    if let Some(dir) = save_auras {
        save_aura_lists(&stage.arena, dir)?;
    }
    Ok(summary)
}

/// The first two roster fighters placed in an arena, facing each other.
struct Stage {
    arena: Arena,
    animator: FrameAnimator,
    fighters: [(EntityId, String); 2],
}

impl Stage {
    fn new(library: &ContentLibrary, roster: &Roster, rng: &mut dyn RngOracle) -> Result<Self> {
        let [first, second, ..] = roster.fighters.as_slice() else {
            bail!(
                "A duel needs at least two fighters, roster has {}",
                roster.fighters.len()
            );
        };

        let mut arena = Arena::new(library.config.clone());
        let (a, b) = (EntityId(1), EntityId(2));
        arena.spawn(first.build(a, library, rng)?.with_target(b));
        arena.spawn(second.build(b, library, rng)?.with_target(a));

        Ok(Self {
            arena,
            animator: roster.animator(),
            fighters: [(a, first.name.clone()), (b, second.name.clone())],
        })
    }

    /// One arena update, then the clips move on by the same `dt`.
    fn step(&mut self, dt: f32, rng: &mut dyn RngOracle) -> ArenaTick {
        let tick = self.arena.update(dt, rng, &mut self.animator);
        self.animator.advance(dt);
        tick
    }
}

fn save_aura_lists(arena: &Arena, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    for combatant in arena.combatants() {
        let Some(statable) = combatant.statable.as_ref() else {
            continue;
        };
        let path = dir.join(format!("{}.auras.bin", combatant.name.to_lowercase()));
        let bytes = statable.auras().save()?;
        std::fs::write(&path, bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), auras = statable.auras().len(), "aura list saved");
    }
    Ok(())
}
