//! Fighter roster loader.
//!
//! A roster lists fighters by their base stats, attacks, starting auras,
//! equipped items and learned talents. Auras, affixes and talents are
//! referenced by name/id and resolved against a [`ContentLibrary`] when the
//! fighter is built.

use std::path::Path;

use anyhow::{Context, bail};
use combat_core::{
    AttackBuilder, AttackLimiter, AttackSlot, BaseChances, CombatEvents, Combatant, CoreStats,
    DamageMethod, DamageRange, EntityId, Facing, FrameAnimator, HitEffect, Item, ItemSlots,
    ProjectileSpec, RaceType, Rect, RngOracle, Statable, TalentId, Vec2,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{ContentLibrary, LoadResult, parse_ron, read_file};

/// How often an attack may fire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LimiterSpec {
    /// Fixed seconds between uses.
    Cooldown(f32),
    /// Base seconds between swings, scaled by the wielder's attack speed.
    AttackSpeed(f32),
}

impl LimiterSpec {
    pub fn build(self) -> AttackLimiter {
        match self {
            LimiterSpec::Cooldown(seconds) => AttackLimiter::timed(seconds),
            LimiterSpec::AttackSpeed(seconds) => AttackLimiter::attack_speed(seconds),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttackKindSpec {
    Melee {
        #[serde(default)]
        reach: Option<f32>,
    },
    Ranged {
        #[serde(default)]
        projectile: ProjectileSpec,
    },
    Whirlwind {
        frame_regions: Vec<Rect>,
    },
}

/// Side effect of a clean hit. Auras are named from the aura catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HitEffectSpec {
    ApplyAura(String),
    Pushback(f32),
    DrainMana(i32),
}

impl HitEffectSpec {
    fn resolve(&self, library: &ContentLibrary) -> LoadResult<HitEffect> {
        Ok(match self {
            HitEffectSpec::ApplyAura(name) => {
                let template = library
                    .auras
                    .get(name)
                    .with_context(|| format!("Unknown aura '{name}' in hit effect"))?;
                HitEffect::ApplyAura(template.clone())
            }
            HitEffectSpec::Pushback(distance) => HitEffect::Pushback {
                distance: *distance,
            },
            HitEffectSpec::DrainMana(amount) => HitEffect::DrainMana { amount: *amount },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackSpec {
    pub name: String,
    pub kind: AttackKindSpec,
    pub damage: DamageMethod,
    pub limiter: LimiterSpec,
    #[serde(default)]
    pub animation: Option<String>,
    #[serde(default)]
    pub sound: Option<String>,
    #[serde(default)]
    pub hit_effects: Vec<HitEffectSpec>,
}

impl AttackSpec {
    pub fn build(&self, library: &ContentLibrary) -> LoadResult<AttackSlot> {
        let mut builder = AttackBuilder::new(self.name.clone())
            .damage_method(self.damage)
            .limiter(self.limiter.build());
        if let Some(animation) = &self.animation {
            builder = builder.animation(animation.clone());
        }
        if let Some(sound) = &self.sound {
            builder = builder.sound(sound.clone());
        }
        for effect in &self.hit_effects {
            builder = builder.hit_effect(effect.resolve(library)?);
        }

        let slot = match &self.kind {
            AttackKindSpec::Melee { reach } => {
                let mut melee = builder.melee()?;
                if let Some(reach) = reach {
                    melee = melee.with_reach(*reach);
                }
                melee.into()
            }
            AttackKindSpec::Ranged { projectile } => builder.ranged(projectile.clone())?.into(),
            AttackKindSpec::Whirlwind { frame_regions } => {
                builder.whirlwind(frame_regions.clone())?.into()
            }
        };
        Ok(slot)
    }
}

/// An item worn from the start. Named affixes are always attached;
/// `roll_affixes` additionally rolls a random prefix and suffix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSpec {
    pub name: String,
    pub slot: ItemSlots,
    pub level: u8,
    #[serde(default)]
    pub affixes: Vec<String>,
    #[serde(default)]
    pub roll_affixes: bool,
}

impl ItemSpec {
    pub fn build(
        &self,
        library: &ContentLibrary,
        rng: &mut dyn RngOracle,
        max_tries: u32,
    ) -> LoadResult<Item> {
        let mut item = Item::new(self.name.clone(), self.slot, self.level);
        for name in &self.affixes {
            let affix = library
                .affixes
                .get(name)
                .with_context(|| format!("Unknown affix '{name}' on item '{}'", self.name))?;
            item = item.with_affix(affix.clone());
        }
        if self.roll_affixes {
            item.roll_affixes(&library.affixes, rng, max_tries);
        }
        Ok(item)
    }
}

fn default_level() -> u8 {
    1
}

fn default_race() -> RaceType {
    RaceType::Human
}

fn default_attack_speed() -> f32 {
    100.0
}

fn default_size() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterSpec {
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u8,
    #[serde(default = "default_race")]
    pub race: RaceType,
    pub life: i32,
    #[serde(default)]
    pub mana: i32,
    pub weapon: DamageRange,
    #[serde(default)]
    pub chances: BaseChances,
    #[serde(default = "default_attack_speed")]
    pub attack_speed: f32,
    pub position: Vec2,
    #[serde(default = "default_size")]
    pub size: f32,
    #[serde(default)]
    pub facing: Facing,
    pub attacks: Vec<AttackSpec>,
    #[serde(default)]
    pub auras: Vec<String>,
    #[serde(default)]
    pub items: Vec<ItemSpec>,
    /// One entry per talent point, learned in order.
    #[serde(default)]
    pub talents: Vec<TalentId>,
}

impl FighterSpec {
    /// Build the combatant with every aura, item and talent applied and
    /// resources topped up to the resulting maximums.
    pub fn build(
        &self,
        id: EntityId,
        library: &ContentLibrary,
        rng: &mut dyn RngOracle,
    ) -> LoadResult<Combatant> {
        let context = || format!("Failed to build fighter '{}'", self.name);
        let core = CoreStats::new(self.level, self.race)
            .with_life(self.life)
            .with_mana(self.mana)
            .with_weapon(self.weapon)
            .with_chances(self.chances)
            .with_attack_speed(self.attack_speed);
        let mut statable = Statable::new(core, &library.config);

        for name in &self.auras {
            let aura = library.auras.instantiate(name, Some(id)).with_context(context)?;
            statable.add_aura(aura);
        }
        for spec in &self.items {
            let item = spec
                .build(library, rng, library.config.affix_max_tries)
                .with_context(context)?;
            item.equip(&mut statable);
        }

        let mut tree = library.talents.clone();
        let mut events = CombatEvents::default();
        for &talent in &self.talents {
            tree.learn(talent, &mut statable, &mut events)
                .with_context(context)?;
        }

        statable.restore_life(statable.maximum_life());
        statable.restore_mana(statable.maximum_mana());

        let bounds = Rect::new(self.position.x, self.position.y, self.size, self.size);
        let mut combatant = Combatant::new(id, self.name.clone(), bounds)
            .with_statable(statable)
            .with_facing(self.facing);
        for attack in &self.attacks {
            combatant = combatant.with_attack(attack.build(library).with_context(context)?);
        }
        Ok(combatant)
    }
}

/// Frame timing of one animation token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipSpec {
    pub token: String,
    pub frames: u32,
    pub frame_time: f32,
}

/// Roster structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub fighters: Vec<FighterSpec>,
    #[serde(default)]
    pub clips: Vec<ClipSpec>,
}

impl Roster {
    /// Headless animator knowing every clip in this roster.
    pub fn animator(&self) -> FrameAnimator {
        self.clips
            .iter()
            .fold(FrameAnimator::new(), |animator, clip| {
                animator.with_clip(clip.token.clone(), clip.frames, clip.frame_time)
            })
    }
}

/// Loader for fighter rosters from RON files.
pub struct RosterLoader;

impl RosterLoader {
    /// Load a fighter roster from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing a Roster
    ///
    /// # Returns
    ///
    /// Returns the roster with fighters in file order.
    pub fn load(path: &Path) -> LoadResult<Roster> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("Invalid roster {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<Roster> {
        let roster: Roster = parse_ron(content, "roster")?;
        for fighter in &roster.fighters {
            if fighter.life <= 0 {
                bail!("Fighter '{}' needs positive life", fighter.name);
            }
            if fighter.attacks.is_empty() {
                bail!("Fighter '{}' has no attacks", fighter.name);
            }
        }
        for clip in &roster.clips {
            if clip.frames == 0 || !(clip.frame_time > 0.0) {
                bail!("Clip '{}' needs frames and a positive frame time", clip.token);
            }
        }
        Ok(roster)
    }

    pub fn builtin() -> LoadResult<Roster> {
        Self::parse(include_str!("../../data/roster.ron"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{Attack, PcgRng, PresentationSink, ScriptedRng};

    const ROSTER: &str = r#"(
        fighters: [
            (
                name: "Duelist",
                level: 4,
                life: 120,
                weapon: (min: 6, max: 9),
                position: (x: 0.0, y: 0.0),
                facing: Right,
                auras: ["Battle Shout"],
                items: [
                    (name: "Helm", slot: "HEAD", level: 6, affixes: ["of the Bear"]),
                ],
                talents: [TalentId(4), TalentId(4)],
                attacks: [
                    (
                        name: "Rapier",
                        kind: Melee(reach: Some(1.5)),
                        damage: (
                            base: Weapon(percent: 100.0),
                            tags: (school: Physical, source: Melee, element: None, power: Life),
                        ),
                        limiter: AttackSpeed(1.2),
                        sound: Some("rapier"),
                        hit_effects: [ApplyAura("Hamstring"), Pushback(0.5)],
                    ),
                ],
            ),
        ],
    )"#;

    #[test]
    fn builds_fighter_with_everything_applied() {
        let library = ContentLibrary::builtin().unwrap();
        let roster = RosterLoader::parse(ROSTER).unwrap();
        let mut rng = PcgRng::seeded(1);
        let fighter = roster.fighters[0].build(EntityId(7), &library, &mut rng).unwrap();

        let statable = fighter.statable.as_ref().unwrap();
        // 120 base + 25 from the helm + 2 x 10 from Toughness
        assert_eq!(statable.maximum_life(), 165);
        assert_eq!(statable.life(), 165);
        assert!(statable.auras().contains("Battle Shout"));
        assert!(statable.auras().contains("item:Helm"));
        assert!(statable.auras().contains("talent:Toughness"));

        assert_eq!(fighter.attacks.len(), 1);
        assert_eq!(fighter.attacks[0].name(), "Rapier");
        assert_eq!(fighter.facing, Facing::Right);
    }

    #[test]
    fn unknown_references_fail_with_fighter_name() {
        let library = ContentLibrary::builtin().unwrap();
        let roster = RosterLoader::parse(&ROSTER.replace("Battle Shout", "Nope")).unwrap();
        let mut rng = ScriptedRng::constant(0.5);
        let err = roster.fighters[0].build(EntityId(1), &library, &mut rng).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Duelist"));
        assert!(message.contains("Nope"));
    }

    #[test]
    fn fighter_without_attacks_is_rejected() {
        let text = r#"(fighters: [(
            name: "Pacifist", life: 10, weapon: (min: 1, max: 1),
            position: (x: 0.0, y: 0.0), attacks: [],
        )])"#;
        assert!(RosterLoader::parse(text).is_err());
    }

    #[test]
    fn clips_feed_the_animator() {
        let clips = r#"clips: [(token: "spin", frames: 4, frame_time: 0.25)], fighters:"#;
        let text = ROSTER.replacen("fighters:", clips, 1);
        let roster = RosterLoader::parse(&text).unwrap();
        let mut animator = roster.animator();
        animator.play_animation(EntityId(1), "spin");
        animator.advance(0.5);
        let state = animator.animation_state(EntityId(1)).unwrap();
        assert_eq!(state.frame, 2);
        assert!(!state.done);
    }

    #[test]
    fn builtin_roster_builds() {
        let library = ContentLibrary::builtin().unwrap();
        let mut rng = PcgRng::seeded(3);
        let roster = RosterLoader::builtin().unwrap();
        assert!(roster.fighters.len() >= 2);
        for (index, spec) in roster.fighters.iter().enumerate() {
            spec.build(EntityId(index as u32 + 1), &library, &mut rng).unwrap();
        }
    }
}
