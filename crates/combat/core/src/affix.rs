//! Item affixes and the registry they are rolled from.
//!
//! The registry is an ordinary value built by whoever composes the game and
//! passed to the code that rolls items, so tests can build their own.

use bitflags::bitflags;
use tracing::{debug, trace};

use crate::env::RngOracle;
use crate::stats::Statable;
use crate::status::{Aura, AuraAddOutcome, EffectTemplate};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AffixKind {
    Prefix,
    Suffix,
}

bitflags! {
    /// Equipment slots an affix may roll on.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct ItemSlots: u16 {
        const WEAPON   = 1 << 0;
        const OFF_HAND = 1 << 1;
        const HEAD     = 1 << 2;
        const CHEST    = 1 << 3;
        const HANDS    = 1 << 4;
        const FEET     = 1 << 5;
        const RING     = 1 << 6;
        const AMULET   = 1 << 7;

        const ARMOR    = Self::HEAD.bits() | Self::CHEST.bits() | Self::HANDS.bits() | Self::FEET.bits();
        const JEWELRY  = Self::RING.bits() | Self::AMULET.bits();
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Affix {
    pub name: String,
    pub kind: AffixKind,
    /// Minimum item level this affix rolls on.
    #[cfg_attr(feature = "serde", serde(default))]
    pub required_level: u8,
    pub slots: ItemSlots,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Vec<EffectTemplate>,
}

impl Affix {
    pub fn new(name: impl Into<String>, kind: AffixKind, slots: ItemSlots) -> Self {
        Self {
            name: name.into(),
            kind,
            required_level: 0,
            slots,
            effects: Vec::new(),
        }
    }

    pub fn with_required_level(mut self, level: u8) -> Self {
        self.required_level = level;
        self
    }

    pub fn with_effect(mut self, effect: EffectTemplate) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn applies_to(&self, item_level: u8, slot: ItemSlots, kind: AffixKind) -> bool {
        self.kind == kind && item_level >= self.required_level && self.slots.intersects(slot)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AffixRegistry {
    affixes: Vec<Affix>,
}

impl AffixRegistry {
    pub fn new(affixes: Vec<Affix>) -> Self {
        Self { affixes }
    }

    pub fn register(&mut self, affix: Affix) {
        self.affixes.push(affix);
    }

    pub fn len(&self) -> usize {
        self.affixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.affixes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Affix> {
        self.affixes.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Affix> {
        self.affixes.iter().find(|a| a.name == name)
    }

    /// Draw uniformly until an affix fits, at most `max_tries` times.
    ///
    /// Returns `None` once the draws are used up, even if a fitting affix
    /// exists; every call consumes at most `max_tries` random values.
    pub fn roll(
        &self,
        rng: &mut dyn RngOracle,
        item_level: u8,
        slot: ItemSlots,
        kind: AffixKind,
        max_tries: u32,
    ) -> Option<&Affix> {
        if self.affixes.is_empty() {
            return None;
        }
        let last = self.affixes.len() as i32 - 1;
        for attempt in 0..max_tries {
            let affix = &self.affixes[rng.random_range_i32(0, last) as usize];
            if affix.applies_to(item_level, slot, kind) {
                trace!(affix = %affix.name, attempt, "affix rolled");
                return Some(affix);
            }
        }
        debug!(item_level, ?slot, ?kind, max_tries, "no affix found");
        None
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub name: String,
    pub slot: ItemSlots,
    pub level: u8,
    pub affixes: Vec<Affix>,
}

impl Item {
    pub fn new(name: impl Into<String>, slot: ItemSlots, level: u8) -> Self {
        Self {
            name: name.into(),
            slot,
            level,
            affixes: Vec::new(),
        }
    }

    pub fn with_affix(mut self, affix: Affix) -> Self {
        self.affixes.push(affix);
        self
    }

    /// Roll one prefix and one suffix; either may come up empty.
    pub fn roll_affixes(&mut self, registry: &AffixRegistry, rng: &mut dyn RngOracle, max_tries: u32) {
        for kind in [AffixKind::Prefix, AffixKind::Suffix] {
            if let Some(affix) = registry.roll(rng, self.level, self.slot, kind, max_tries) {
                self.affixes.push(affix.clone());
            }
        }
    }

    /// Name with affixes, e.g. `Flaming Sword of the Bear`.
    pub fn display_name(&self) -> String {
        let mut parts: Vec<&str> = self
            .affixes
            .iter()
            .filter(|a| a.kind == AffixKind::Prefix)
            .map(|a| a.name.as_str())
            .collect();
        parts.push(&self.name);
        parts.extend(
            self.affixes
                .iter()
                .filter(|a| a.kind == AffixKind::Suffix)
                .map(|a| a.name.as_str()),
        );
        parts.join(" ")
    }

    pub fn aura_name(&self) -> String {
        format!("item:{}", self.name)
    }

    /// Permanent aura carrying every affix effect.
    pub fn equip_aura(&self) -> Aura {
        Aura::permanent(self.aura_name()).with_effects(
            self.affixes
                .iter()
                .flat_map(|a| a.effects.iter())
                .map(|e| e.instantiate(1)),
        )
    }

    pub fn equip(&self, statable: &mut Statable) -> AuraAddOutcome {
        statable.add_aura(self.equip_aura())
    }

    pub fn unequip(&self, statable: &mut Statable) -> bool {
        statable.remove_aura(&self.aura_name()).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CombatConfig;
    use crate::env::ScriptedRng;
    use crate::stats::CoreStats;
    use crate::status::{ElementalSchool, EffectKind, Scope, StatKind};

    fn registry() -> AffixRegistry {
        AffixRegistry::new(vec![
            Affix::new("Flaming", AffixKind::Prefix, ItemSlots::WEAPON).with_effect(
                EffectTemplate::percental(
                    EffectKind::DamageDoneWithElement(Scope::Only(ElementalSchool::Fire)),
                    15.0,
                ),
            ),
            Affix::new("Sturdy", AffixKind::Prefix, ItemSlots::ARMOR).with_required_level(10),
            Affix::new("of the Bear", AffixKind::Suffix, ItemSlots::all()).with_effect(
                EffectTemplate::fixed(EffectKind::Stat(Scope::Only(StatKind::MaximumLife)), 20.0),
            ),
        ])
    }

    #[test]
    fn roll_returns_first_fitting_draw() {
        // Draws land on index 1 (Sturdy, wrong slot) then index 0 (Flaming)
        let registry = registry();
        let mut rng = ScriptedRng::new([0.5, 0.0]);
        let affix = registry.roll(&mut rng, 5, ItemSlots::WEAPON, AffixKind::Prefix, 8);
        assert_eq!(affix.map(|a| a.name.as_str()), Some("Flaming"));
        assert_eq!(rng.draws(), 2);
    }

    #[test]
    fn roll_gives_up_after_max_tries() {
        let registry = registry();
        let mut rng = ScriptedRng::constant(0.5);
        let affix = registry.roll(&mut rng, 5, ItemSlots::HEAD, AffixKind::Prefix, 4);
        assert!(affix.is_none());
        assert_eq!(rng.draws(), 4);
    }

    #[test]
    fn empty_registry_never_draws() {
        let mut rng = ScriptedRng::constant(0.5);
        assert!(AffixRegistry::default()
            .roll(&mut rng, 1, ItemSlots::WEAPON, AffixKind::Suffix, 8)
            .is_none());
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn equip_grants_affix_effects() {
        let registry = registry();
        let item = Item::new("Sword", ItemSlots::WEAPON, 5)
            .with_affix(registry.get("Flaming").unwrap().clone())
            .with_affix(registry.get("of the Bear").unwrap().clone());
        assert_eq!(item.display_name(), "Flaming Sword of the Bear");

        let mut statable = Statable::new(CoreStats::default().with_life(100), &CombatConfig::default());
        assert!(item.equip(&mut statable).is_applied());
        assert_eq!(statable.maximum_life(), 120);
        assert!((statable.modifiers().element().get(ElementalSchool::Fire) - 1.15).abs() < 1e-6);

        assert!(item.unequip(&mut statable));
        assert_eq!(statable.maximum_life(), 100);
        assert!(!item.unequip(&mut statable));
    }

    #[test]
    fn roll_affixes_fills_both_kinds() {
        let mut item = Item::new("Sword", ItemSlots::WEAPON, 5);
        // 0.0 → Flaming, 0.9 → of the Bear
        let mut rng = ScriptedRng::new([0.0, 0.9]);
        item.roll_affixes(&registry(), &mut rng, 3);
        assert_eq!(item.display_name(), "Flaming Sword of the Bear");
    }
}
