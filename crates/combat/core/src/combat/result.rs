//! Outcome of one attack resolution.

use super::damage::DamageTags;
use crate::status::PowerType;

/// How the defender received an attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackReceiveType {
    /// Clean hit.
    Hit,
    /// Clean hit with the critical multiplier applied.
    Crit,
    /// Attacker failed its accuracy roll.
    Miss,
    Dodge,
    /// Melee only.
    Parry,
    /// Magical damage partially shrugged off.
    Resisted,
}

impl AttackReceiveType {
    /// True for outcomes that deal damage.
    pub fn lands(self) -> bool {
        matches!(self, Self::Hit | Self::Crit | Self::Resisted)
    }

    /// True for outcomes that trigger on-hit effects.
    pub fn is_clean(self) -> bool {
        matches!(self, Self::Hit | Self::Crit)
    }

    pub fn is_critical(self) -> bool {
        self == Self::Crit
    }
}

/// Damage done by one attack, per power type.
///
/// Produced fresh by every resolution and consumed once by the defender.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackDamageResult {
    pub receive: AttackReceiveType,
    pub life_damage: i32,
    pub mana_damage: i32,
    pub tags: DamageTags,
}

impl AttackDamageResult {
    /// A result that deals nothing, e.g. a miss or a swing at an interactable.
    pub fn empty(receive: AttackReceiveType, tags: DamageTags) -> Self {
        Self {
            receive,
            life_damage: 0,
            mana_damage: 0,
            tags,
        }
    }

    /// A landed result whose `amount` goes to the pool named by `tags.power`.
    pub fn landed(receive: AttackReceiveType, amount: i32, tags: DamageTags) -> Self {
        let amount = amount.max(0);
        let (life_damage, mana_damage) = match tags.power {
            PowerType::Life => (amount, 0),
            PowerType::Mana => (0, amount),
        };
        Self {
            receive,
            life_damage,
            mana_damage,
            tags,
        }
    }

    pub fn total(&self) -> i32 {
        self.life_damage + self.mana_damage
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landed_routes_damage_by_power() {
        let life = AttackDamageResult::landed(AttackReceiveType::Hit, 12, DamageTags::melee());
        assert_eq!((life.life_damage, life.mana_damage), (12, 0));

        let mana_tags = DamageTags {
            power: PowerType::Mana,
            ..DamageTags::spell()
        };
        let mana = AttackDamageResult::landed(AttackReceiveType::Crit, 7, mana_tags);
        assert_eq!((mana.life_damage, mana.mana_damage), (0, 7));
    }

    #[test]
    fn negative_amounts_clamp_to_zero() {
        let result = AttackDamageResult::landed(AttackReceiveType::Hit, -20, DamageTags::melee());
        assert!(result.is_empty());
    }

    #[test]
    fn receive_type_classification() {
        assert!(AttackReceiveType::Resisted.lands());
        assert!(!AttackReceiveType::Resisted.is_clean());
        assert!(!AttackReceiveType::Parry.lands());
        assert!(AttackReceiveType::Crit.is_critical());
    }
}
