//! Side effects applied to a defender after a clean hit.

use tracing::debug;

use crate::status::{AuraAddOutcome, AuraTemplate};
use crate::world::{Combatant, EntityId, Vec2};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitEffect {
    /// Add a fresh instance of the aura to the defender's own aura list.
    ApplyAura(AuraTemplate),
    /// Shove the defender along the attack direction.
    Pushback { distance: f32 },
    /// Burn mana on top of the damage.
    DrainMana { amount: i32 },
}

impl HitEffect {
    /// Apply to `defender`. `direction` is the unit vector of the attack.
    ///
    /// Returns how the defender's aura list took the aura for
    /// [`HitEffect::ApplyAura`] on an entity with stats, `None` otherwise.
    pub fn apply(
        &self,
        attacker: EntityId,
        direction: Vec2,
        defender: &mut Combatant,
    ) -> Option<AuraAddOutcome> {
        match self {
            HitEffect::ApplyAura(template) => {
                let statable = defender.statable.as_mut()?;
                let outcome = statable.add_aura(template.instantiate(Some(attacker)));
                debug!(aura = %template.name, target = %defender.id, ?outcome, "hit effect aura");
                Some(outcome)
            }
            HitEffect::Pushback { distance } => {
                defender.bounds.translate(direction.scale(*distance));
                None
            }
            HitEffect::DrainMana { amount } => {
                if let Some(statable) = defender.statable.as_mut() {
                    statable.drain_mana(*amount);
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CombatConfig;
    use crate::stats::{CoreStats, Statable};
    use crate::status::{Aura, EffectKind, EffectTemplate, Scope, StatKind};
    use crate::world::Rect;

    fn defender() -> Combatant {
        Combatant::new(EntityId(2), "dummy", Rect::new(0.0, 0.0, 1.0, 1.0))
            .with_statable(Statable::new(CoreStats::default().with_mana(30), &CombatConfig::default()))
    }

    #[test]
    fn apply_aura_tags_source() {
        let mut target = defender();
        let chill = AuraTemplate::timed("Chill", 3.0).with_effect(EffectTemplate::percental(
            EffectKind::Stat(Scope::Only(StatKind::MovementSpeed)),
            -50.0,
        ));
        let outcome = HitEffect::ApplyAura(chill).apply(EntityId(1), Vec2::new(1.0, 0.0), &mut target);
        assert_eq!(outcome, Some(AuraAddOutcome::Added));

        let statable = target.statable.as_ref().unwrap();
        let aura = statable.auras().get("Chill").unwrap();
        assert_eq!(aura.source(), Some(EntityId(1)));
        assert_eq!(statable.movement_speed(), 2.0);
    }

    #[test]
    fn apply_aura_on_full_list_is_rejected() {
        let mut target = defender();
        let statable = target.statable.as_mut().unwrap();
        for i in 0..CombatConfig::MAX_AURAS {
            statable.add_aura(Aura::permanent(format!("ward{i}")));
        }

        let chill = HitEffect::ApplyAura(AuraTemplate::timed("Chill", 3.0));
        let outcome = chill.apply(EntityId(1), Vec2::new(1.0, 0.0), &mut target);

        assert_eq!(outcome, Some(AuraAddOutcome::Rejected));
        assert!(!target.statable.as_ref().unwrap().auras().contains("Chill"));
    }

    #[test]
    fn apply_aura_without_stats_does_nothing() {
        let mut lever = Combatant::new(EntityId(3), "lever", Rect::new(0.0, 0.0, 1.0, 1.0));
        let chill = HitEffect::ApplyAura(AuraTemplate::timed("Chill", 3.0));
        assert_eq!(chill.apply(EntityId(1), Vec2::ZERO, &mut lever), None);
    }

    #[test]
    fn pushback_moves_along_direction() {
        let mut target = defender();
        HitEffect::Pushback { distance: 2.0 }.apply(EntityId(1), Vec2::new(0.0, -1.0), &mut target);
        assert_eq!(target.bounds, Rect::new(0.0, -2.0, 1.0, 1.0));
    }

    #[test]
    fn drain_mana_stops_at_zero() {
        let mut target = defender();
        HitEffect::DrainMana { amount: 50 }.apply(EntityId(1), Vec2::ZERO, &mut target);
        assert_eq!(target.statable.as_ref().unwrap().mana(), 0);
    }
}
