//! Cached per-category aggregate of active effect values.
//!
//! Every table follows the same calculation order:
//! `fixed additive first, then percentage multiplier, truncate to int on apply`.

use core::marker::PhantomData;

use tracing::trace;

use crate::status::{AuraList, Category, EffectId, Scope};

/// One `(fixed, multiplier)` pair per member of category `C`.
///
/// Values are a derived view of the owner's [`AuraList`]; they are only
/// ever written by [`ModifierTable::refresh`].
#[derive(Clone, Debug, PartialEq)]
pub struct ModifierTable<C> {
    prefix: &'static str,
    base_multiplier: f32,
    fixed: Vec<f32>,
    multipliers: Vec<f32>,
    _category: PhantomData<C>,
}

impl<C: Category> ModifierTable<C> {
    /// Create a table reading effects whose identifiers start with `prefix`.
    ///
    /// `base_multiplier` is the multiplier of a member with no percental effects.
    pub fn new(prefix: &'static str, base_multiplier: f32) -> Self {
        Self {
            prefix,
            base_multiplier,
            fixed: vec![0.0; C::COUNT],
            multipliers: vec![base_multiplier; C::COUNT],
            _category: PhantomData,
        }
    }

    /// Total multiplier for `category`.
    #[inline]
    pub fn get(&self, category: C) -> f32 {
        self.multipliers[category.index()]
    }

    /// Total fixed value for `category`.
    #[inline]
    pub fn get_fixed(&self, category: C) -> f32 {
        self.fixed[category.index()]
    }

    /// Multiply `damage` by the category multiplier, truncating toward zero.
    pub fn apply(&self, damage: i32, category: C) -> i32 {
        (damage as f32 * self.get(category)) as i32
    }

    /// Add the category's fixed value to `damage`, truncating toward zero.
    pub fn apply_fixed(&self, damage: i32, category: C) -> i32 {
        (damage as f32 + self.get_fixed(category)) as i32
    }

    /// Fixed then multiplicative pass on a fractional value (stats).
    pub fn apply_value(&self, base: f32, category: C) -> f32 {
        (base + self.get_fixed(category)) * self.get(category)
    }

    /// Recompute from `auras`. `Scope::All` fans out to every concrete member.
    pub fn refresh(&mut self, scope: Scope<C>, auras: &AuraList) {
        match scope {
            Scope::All => {
                for category in C::iter() {
                    self.refresh_member(category, auras);
                }
            }
            Scope::Only(category) => self.refresh_member(category, auras),
        }
    }

    fn refresh_member(&mut self, category: C, auras: &AuraList) {
        let specific = EffectId::new(self.prefix, category.name());
        let all = EffectId::new(self.prefix, Scope::<C>::All.name());
        let totals = auras.percental_and_rating_values(&specific, &all);

        let index = category.index();
        self.fixed[index] = totals.rating;
        self.multipliers[index] = self.base_multiplier + totals.percent / 100.0;

        trace!(
            identifier = %specific,
            fixed = self.fixed[index],
            multiplier = self.multipliers[index],
            "modifier refreshed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CombatConfig;
    use crate::modifiers::ModifierContainers;
    use crate::status::{Aura, DamageSchool, EffectKind, StatusEffect};

    const PREFIX: &str = EffectKind::SCHOOL_PREFIX;

    fn physical() -> EffectKind {
        EffectKind::DamageDoneWithSchool(Scope::Only(DamageSchool::Physical))
    }

    #[test]
    fn empty_table_is_neutral() {
        let table = ModifierTable::<DamageSchool>::new(PREFIX, 1.0);
        assert_eq!(table.apply(100, DamageSchool::Physical), 100);
        assert_eq!(table.apply_fixed(100, DamageSchool::Magical), 100);
    }

    #[test]
    fn refresh_reads_specific_and_all() {
        let mut list = AuraList::new();
        let mut mods = ModifierContainers::new(&CombatConfig::default());
        list.add(
            Aura::permanent("a")
                .with_effect(StatusEffect::fixed(physical(), 5.0))
                .with_effect(StatusEffect::percental(
                    EffectKind::DamageDoneWithSchool(Scope::All),
                    20.0,
                )),
            &mut mods,
        );

        let mut table = ModifierTable::<DamageSchool>::new(PREFIX, 1.0);
        table.refresh(Scope::All, &list);

        assert_eq!(table.get_fixed(DamageSchool::Physical), 5.0);
        assert_eq!(table.get_fixed(DamageSchool::Magical), 0.0);
        assert_eq!(table.get(DamageSchool::Physical), 1.2);
        assert_eq!(table.get(DamageSchool::Magical), 1.2);
    }

    #[test]
    fn refresh_is_idempotent() {
        let mut list = AuraList::new();
        let mut mods = ModifierContainers::new(&CombatConfig::default());
        list.add(
            Aura::permanent("a").with_effect(StatusEffect::percental(physical(), 12.5)),
            &mut mods,
        );

        let mut table = ModifierTable::<DamageSchool>::new(PREFIX, 1.0);
        table.refresh(Scope::Only(DamageSchool::Physical), &list);
        let once = table.clone();
        table.refresh(Scope::Only(DamageSchool::Physical), &list);
        assert_eq!(table, once);
    }

    #[test]
    fn apply_truncates() {
        let mut list = AuraList::new();
        let mut mods = ModifierContainers::new(&CombatConfig::default());
        list.add(
            Aura::permanent("a").with_effect(StatusEffect::percental(physical(), 10.0)),
            &mut mods,
        );
        let mut table = ModifierTable::<DamageSchool>::new(PREFIX, 1.0);
        table.refresh(Scope::All, &list);

        // 19 * 1.1 = 20.9
        assert_eq!(table.apply(19, DamageSchool::Physical), 20);
    }
}
