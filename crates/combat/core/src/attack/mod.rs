//! Attacks: limiter-gated strikes against arena entities.
//!
//! Every attack follows the same cycle:
//!
//! ```text
//! Idle ──(limiter ready ∧ usable ∧ precondition)──▶ Firing ──(done)──▶ Idle
//! ```
//!
//! Instant attacks ([`MeleeAttack`], [`RangedAttack`]) pass through `Firing`
//! inside a single [`Attack::fire`] call. [`WhirlwindAttack`] stays in it across
//! updates while its animation plays.

pub mod cooldown;
pub mod hit_effect;
pub mod limiter;
pub mod melee;
pub mod projectile;
pub mod ranged;
pub mod whirlwind;

pub use cooldown::Cooldown;
pub use hit_effect::HitEffect;
pub use limiter::AttackLimiter;
pub use melee::MeleeAttack;
pub use projectile::{Projectile, ProjectileMeleeAttack, ProjectileSpec};
pub use ranged::RangedAttack;
pub use whirlwind::WhirlwindAttack;

use tracing::debug;

use crate::combat::{AttackDamageResult, AttackReceiveType, DamageMethod};
use crate::config::CombatConfig;
use crate::env::{PresentationSink, RngOracle};
use crate::error::{CombatError, ErrorSeverity};
use crate::stats::{Statable, StatableFlags};
use crate::status::AuraAddOutcome;
use crate::world::{Combatant, EntityId, Rect, Vec2};

/// Invalid attack construction.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AttackError {
    #[error("attack `{attack}` has no damage method")]
    MissingDamageMethod { attack: String },

    #[error("attack `{attack}` has no limiter")]
    MissingLimiter { attack: String },

    #[error("whirlwind attack `{attack}` needs at least one frame region")]
    MissingFrameRegions { attack: String },
}

impl CombatError for AttackError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingDamageMethod { .. } => "ATTACK_MISSING_DAMAGE_METHOD",
            Self::MissingLimiter { .. } => "ATTACK_MISSING_LIMITER",
            Self::MissingFrameRegions { .. } => "ATTACK_MISSING_FRAME_REGIONS",
        }
    }
}

/// One resolved strike of an attacker against one entity.
#[derive(Clone, Debug, PartialEq)]
pub struct AttackReport {
    pub attacker: EntityId,
    pub defender: EntityId,
    pub result: AttackDamageResult,
    /// True if this strike killed the defender.
    pub killed: bool,
    /// Names of auras the hit effects applied.
    pub applied_auras: Vec<String>,
}

/// Everything an attack may touch while updating or firing.
///
/// The attacker's own attacks are taken out of `combatants` for the duration,
/// so an attack can mutate any combatant without aliasing itself.
pub struct AttackContext<'a> {
    pub combatants: &'a mut [Combatant],
    /// Index of the attacking entity in `combatants`.
    pub attacker: usize,
    pub rng: &'a mut dyn RngOracle,
    pub config: &'a CombatConfig,
    pub presentation: &'a mut dyn PresentationSink,
    pub projectiles: &'a mut Vec<Projectile>,
    pub reports: &'a mut Vec<AttackReport>,
}

impl AttackContext<'_> {
    pub fn attacker(&self) -> &Combatant {
        &self.combatants[self.attacker]
    }

    pub fn attacker_mut(&mut self) -> &mut Combatant {
        &mut self.combatants[self.attacker]
    }

    pub fn attacker_statable(&self) -> Option<&Statable> {
        self.attacker().statable.as_ref()
    }

    /// Index of the attacker's current target, if it is still in the arena.
    pub fn target_index(&self) -> Option<usize> {
        let target = self.attacker().target?;
        self.combatants.iter().position(|c| c.id == target)
    }

    /// Target that can currently be damaged and shares the attacker's floor.
    pub fn attackable_target(&self) -> Option<&Combatant> {
        let target = &self.combatants[self.target_index()?];
        (target.floor == self.attacker().floor && target.is_attackable()).then_some(target)
    }

    /// Usability checks shared by every attack.
    pub fn attacker_can_act(&self) -> bool {
        self.attacker_statable().is_some_and(|s| {
            !s.is_dead()
                && !s.has_flag(StatableFlags::SWIMMING)
                && !s.has_flag(StatableFlags::IN_SPECIAL_ANIMATION)
        })
    }

    /// Fire-and-forget animation and sound for the attacker.
    pub fn announce(&mut self, animation: Option<&str>, sound: Option<&str>) {
        let id = self.attacker().id;
        let position = self.attacker().center();
        if let Some(token) = animation {
            self.presentation.play_animation(id, token);
        }
        if let Some(name) = sound {
            self.presentation.play_sound(name, position);
        }
    }

    /// Strike every entity on the attacker's floor overlapping `region`.
    ///
    /// Returns the number of entities struck.
    pub fn strike_region(
        &mut self,
        region: &Rect,
        method: &DamageMethod,
        hit_effects: &[HitEffect],
    ) -> usize {
        let attacker = &self.combatants[self.attacker];
        let direction = attacker.facing.unit();
        let targets = targets_in_region(self.combatants, Some(self.attacker), attacker.floor, region);

        let mut struck = 0;
        for target in targets {
            if let Some(report) = strike(
                self.combatants,
                self.attacker,
                target,
                direction,
                method,
                hit_effects,
                self.rng,
                self.config,
            ) {
                self.reports.push(report);
                struck += 1;
            }
        }
        struck
    }
}

/// Indices of entities on `floor` whose bounds overlap `region`.
pub fn targets_in_region(
    combatants: &[Combatant],
    exclude: Option<usize>,
    floor: i32,
    region: &Rect,
) -> Vec<usize> {
    combatants
        .iter()
        .enumerate()
        .filter(|(index, c)| Some(*index) != exclude && c.floor == floor && c.bounds.intersects(region))
        .map(|(index, _)| index)
        .collect()
}

/// Resolve one strike of `combatants[attacker]` against `combatants[target]`.
///
/// Entities without stats get a zero-damage report. Dead or invincible
/// defenders are skipped without touching the random source.
#[allow(clippy::too_many_arguments)]
pub fn strike(
    combatants: &mut [Combatant],
    attacker: usize,
    target: usize,
    direction: Vec2,
    method: &DamageMethod,
    hit_effects: &[HitEffect],
    rng: &mut dyn RngOracle,
    config: &CombatConfig,
) -> Option<AttackReport> {
    if attacker == target {
        return None;
    }
    let attacker_id = combatants[attacker].id;
    let defender = &combatants[target];
    let defender_id = defender.id;

    let Some(defender_stats) = defender.statable.as_ref() else {
        return Some(AttackReport {
            attacker: attacker_id,
            defender: defender_id,
            result: AttackDamageResult::empty(AttackReceiveType::Hit, method.tags),
            killed: false,
            applied_auras: Vec::new(),
        });
    };
    if defender_stats.is_dead() || defender_stats.is_invincible() {
        return None;
    }
    let attacker_stats = combatants[attacker].statable.as_ref()?;
    let result = method.get_damage_done(attacker_stats, defender_stats, rng, config);

    let defender = &mut combatants[target];
    let killed = defender
        .statable
        .as_mut()
        .is_some_and(|s| s.take_damage(&result));

    let mut applied_auras = Vec::new();
    let mut killed = killed;
    if result.receive.is_clean() && !killed {
        for effect in hit_effects {
            let applied = effect
                .apply(attacker_id, direction, defender)
                .is_some_and(AuraAddOutcome::is_applied);
            match effect {
                HitEffect::ApplyAura(template) if applied => {
                    applied_auras.push(template.name.clone());
                }
                _ => {}
            }
        }
        // An aura can cut maximum life down to nothing; death clears timed ones
        if let Some(statable) = defender.statable.as_ref().filter(|s| s.is_dead()) {
            killed = true;
            applied_auras.retain(|name| statable.auras().contains(name));
        }
    }

    debug!(
        attacker = %attacker_id,
        defender = %defender_id,
        receive = ?result.receive,
        life = result.life_damage,
        mana = result.mana_damage,
        killed,
        "strike resolved"
    );
    Some(AttackReport {
        attacker: attacker_id,
        defender: defender_id,
        result,
        killed,
        applied_auras,
    })
}

/// Attack behaviour driven by the arena.
pub trait Attack {
    fn name(&self) -> &str;

    fn limiter(&self) -> &AttackLimiter;

    /// Per-frame bookkeeping: tick the limiter and any in-flight sequence.
    fn update(&mut self, dt: f32, ctx: &mut AttackContext<'_>);

    /// Limiter ready, attacker usable and attack-specific preconditions met.
    fn should_fire(&self, ctx: &AttackContext<'_>) -> bool;

    /// Fire at the attacker's target. Returns `false` without consuming the
    /// limiter when the attack could not fire.
    fn fire(&mut self, ctx: &mut AttackContext<'_>) -> bool;
}

/// Attack stored on a combatant.
#[derive(Clone, Debug)]
pub enum AttackSlot {
    Melee(MeleeAttack),
    Ranged(RangedAttack),
    Whirlwind(WhirlwindAttack),
}

impl AttackSlot {
    fn as_attack(&self) -> &dyn Attack {
        match self {
            AttackSlot::Melee(attack) => attack,
            AttackSlot::Ranged(attack) => attack,
            AttackSlot::Whirlwind(attack) => attack,
        }
    }

    fn as_attack_mut(&mut self) -> &mut dyn Attack {
        match self {
            AttackSlot::Melee(attack) => attack,
            AttackSlot::Ranged(attack) => attack,
            AttackSlot::Whirlwind(attack) => attack,
        }
    }
}

impl Attack for AttackSlot {
    fn name(&self) -> &str {
        self.as_attack().name()
    }

    fn limiter(&self) -> &AttackLimiter {
        self.as_attack().limiter()
    }

    fn update(&mut self, dt: f32, ctx: &mut AttackContext<'_>) {
        self.as_attack_mut().update(dt, ctx);
    }

    fn should_fire(&self, ctx: &AttackContext<'_>) -> bool {
        self.as_attack().should_fire(ctx)
    }

    fn fire(&mut self, ctx: &mut AttackContext<'_>) -> bool {
        self.as_attack_mut().fire(ctx)
    }
}

impl From<MeleeAttack> for AttackSlot {
    fn from(attack: MeleeAttack) -> Self {
        AttackSlot::Melee(attack)
    }
}

impl From<RangedAttack> for AttackSlot {
    fn from(attack: RangedAttack) -> Self {
        AttackSlot::Ranged(attack)
    }
}

impl From<WhirlwindAttack> for AttackSlot {
    fn from(attack: WhirlwindAttack) -> Self {
        AttackSlot::Whirlwind(attack)
    }
}

/// Parts shared by every attack kind.
#[derive(Clone, Debug, PartialEq)]
pub struct AttackCore {
    pub name: String,
    pub method: DamageMethod,
    pub limiter: AttackLimiter,
    pub animation: Option<String>,
    pub sound: Option<String>,
    pub hit_effects: Vec<HitEffect>,
}

/// Builder for every attack kind.
///
/// A damage method and a limiter are required; building without either is a
/// configuration error.
#[derive(Clone, Debug, Default)]
pub struct AttackBuilder {
    name: String,
    method: Option<DamageMethod>,
    limiter: Option<AttackLimiter>,
    animation: Option<String>,
    sound: Option<String>,
    hit_effects: Vec<HitEffect>,
}

impl AttackBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn damage_method(mut self, method: DamageMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn limiter(mut self, limiter: AttackLimiter) -> Self {
        self.limiter = Some(limiter);
        self
    }

    pub fn animation(mut self, token: impl Into<String>) -> Self {
        self.animation = Some(token.into());
        self
    }

    pub fn sound(mut self, name: impl Into<String>) -> Self {
        self.sound = Some(name.into());
        self
    }

    pub fn hit_effect(mut self, effect: HitEffect) -> Self {
        self.hit_effects.push(effect);
        self
    }

    pub(crate) fn build_core(self) -> Result<AttackCore, AttackError> {
        let Some(method) = self.method else {
            return Err(AttackError::MissingDamageMethod { attack: self.name });
        };
        let Some(limiter) = self.limiter else {
            return Err(AttackError::MissingLimiter { attack: self.name });
        };
        Ok(AttackCore {
            name: self.name,
            method,
            limiter,
            animation: self.animation,
            sound: self.sound,
            hit_effects: self.hit_effects,
        })
    }

    /// Reach defaults to [`CombatConfig::melee_reach`].
    pub fn melee(self) -> Result<MeleeAttack, AttackError> {
        Ok(MeleeAttack::from_core(self.build_core()?))
    }

    pub fn ranged(self, projectile: ProjectileSpec) -> Result<RangedAttack, AttackError> {
        Ok(RangedAttack::from_core(self.build_core()?, projectile))
    }

    /// `frame_regions` holds one hit region offset per animation frame,
    /// relative to the attacker's center.
    pub fn whirlwind(
        self,
        frame_regions: Vec<Rect>,
    ) -> Result<WhirlwindAttack, AttackError> {
        if frame_regions.is_empty() {
            return Err(AttackError::MissingFrameRegions { attack: self.name });
        }
        Ok(WhirlwindAttack::from_core(self.build_core()?, frame_regions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ScriptedRng;
    use crate::stats::{BaseChances, CoreStats, DamageRange};
    use crate::status::{Aura, AuraTemplate, EffectKind, EffectTemplate, Scope, StatKind};

    fn duelists() -> Vec<Combatant> {
        let core = CoreStats::default()
            .with_life(100)
            .with_weapon(DamageRange::fixed(10))
            .with_chances(BaseChances::certain());
        let config = CombatConfig::default();
        vec![
            Combatant::new(EntityId(1), "attacker", Rect::new(0.0, 0.0, 1.0, 1.0))
                .with_statable(Statable::new(core.clone(), &config)),
            Combatant::new(EntityId(2), "defender", Rect::new(1.0, 0.0, 1.0, 1.0))
                .with_statable(Statable::new(core, &config)),
        ]
    }

    fn strike_with(combatants: &mut [Combatant], effects: &[HitEffect]) -> AttackReport {
        strike(
            combatants,
            0,
            1,
            Vec2::new(1.0, 0.0),
            &DamageMethod::melee_weapon(),
            effects,
            &mut ScriptedRng::constant(0.5),
            &CombatConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn strike_lists_only_auras_that_landed() {
        let mut combatants = duelists();
        let defender = combatants[1].statable.as_mut().unwrap();
        for i in 0..CombatConfig::MAX_AURAS {
            defender.add_aura(Aura::permanent(format!("ward{i}")));
        }

        let chill = HitEffect::ApplyAura(AuraTemplate::timed("Chill", 3.0));
        let report = strike_with(&mut combatants, &[chill]);

        assert_eq!(report.result.life_damage, 10);
        assert!(report.applied_auras.is_empty());
        assert!(!combatants[1].statable.as_ref().unwrap().auras().contains("Chill"));
    }

    #[test]
    fn strike_lists_applied_auras() {
        let mut combatants = duelists();
        let chill = HitEffect::ApplyAura(AuraTemplate::timed("Chill", 3.0));
        let report = strike_with(&mut combatants, &[chill]);
        assert_eq!(report.applied_auras, vec!["Chill".to_string()]);
    }

    #[test]
    fn aura_that_empties_life_counts_as_kill() {
        let mut combatants = duelists();
        let wither = AuraTemplate::timed("Wither", 5.0).with_effect(EffectTemplate::percental(
            EffectKind::Stat(Scope::Only(StatKind::MaximumLife)),
            -100.0,
        ));
        let report = strike_with(&mut combatants, &[HitEffect::ApplyAura(wither)]);

        let defender = combatants[1].statable.as_ref().unwrap();
        assert!(report.killed);
        assert!(defender.is_dead());
        assert!(report.applied_auras.is_empty());
        assert!(!defender.auras().contains("Wither"));
    }

    #[test]
    fn missing_damage_method_is_fatal() {
        let err = AttackBuilder::new("Slash")
            .limiter(AttackLimiter::timed(1.0))
            .melee()
            .unwrap_err();
        assert_eq!(
            err,
            AttackError::MissingDamageMethod {
                attack: "Slash".into()
            }
        );
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
        assert_eq!(err.error_code(), "ATTACK_MISSING_DAMAGE_METHOD");
    }

    #[test]
    fn missing_limiter_is_rejected() {
        let err = AttackBuilder::new("Shot")
            .damage_method(DamageMethod::melee_weapon())
            .ranged(ProjectileSpec::default())
            .unwrap_err();
        assert!(matches!(err, AttackError::MissingLimiter { .. }));
    }

    #[test]
    fn whirlwind_requires_frame_regions() {
        let err = AttackBuilder::new("Spin")
            .damage_method(DamageMethod::melee_weapon())
            .limiter(AttackLimiter::timed(4.0))
            .whirlwind(Vec::new())
            .unwrap_err();
        assert!(matches!(err, AttackError::MissingFrameRegions { .. }));
    }

    #[test]
    fn targets_in_region_filters_floor_and_self() {
        let make = |id, floor, x| {
            Combatant::new(EntityId(id), "e", Rect::new(x, 0.0, 1.0, 1.0)).with_floor(floor)
        };
        let combatants = vec![make(1, 0, 0.0), make(2, 0, 0.5), make(3, 1, 0.5), make(4, 0, 5.0)];
        let region = Rect::new(0.0, 0.0, 2.0, 1.0);
        assert_eq!(targets_in_region(&combatants, Some(0), 0, &region), vec![1]);
        assert_eq!(targets_in_region(&combatants, None, 0, &region), vec![0, 1]);
    }
}
