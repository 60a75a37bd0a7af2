//! Attack table: one percentage roll decides how an attack is received.

use super::result::AttackReceiveType;
use crate::status::{DamageSchool, DamageSource};

/// Effective chances (percent) feeding one attack table roll.
///
/// Attacker chances are `hit` and `crit`; the rest belong to the defender.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct AttackTable {
    pub hit: f32,
    pub crit: f32,
    pub dodge: f32,
    pub parry: f32,
    pub resist: f32,
}

impl AttackTable {
    /// Resolve a single roll in `[0, 100)` against stacked bands.
    ///
    /// Bands in order: miss (`100 - hit`), dodge, parry (melee only),
    /// resist (spells and magical school), crit. Whatever remains is a hit.
    ///
    /// # Arguments
    ///
    /// * `roll` - Percentage roll from the injected random source
    /// * `source` - Delivery of the attack; gates the parry band
    /// * `school` - Gates the resist band together with `source`
    pub fn resolve(&self, roll: f32, source: DamageSource, school: DamageSchool) -> AttackReceiveType {
        let mut ceiling = 0.0;

        ceiling += band(100.0 - self.hit);
        if roll < ceiling {
            return AttackReceiveType::Miss;
        }

        ceiling += band(self.dodge);
        if roll < ceiling {
            return AttackReceiveType::Dodge;
        }

        if source == DamageSource::Melee {
            ceiling += band(self.parry);
            if roll < ceiling {
                return AttackReceiveType::Parry;
            }
        }

        if source == DamageSource::Spell || school == DamageSchool::Magical {
            ceiling += band(self.resist);
            if roll < ceiling {
                return AttackReceiveType::Resisted;
            }
        }

        ceiling += band(self.crit);
        if roll < ceiling {
            return AttackReceiveType::Crit;
        }

        AttackReceiveType::Hit
    }
}

fn band(chance: f32) -> f32 {
    chance.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> AttackTable {
        AttackTable {
            hit: 90.0,
            crit: 10.0,
            dodge: 5.0,
            parry: 5.0,
            resist: 20.0,
        }
    }

    #[test]
    fn melee_bands_in_order() {
        let t = table();
        let melee = |roll| t.resolve(roll, DamageSource::Melee, DamageSchool::Physical);

        assert_eq!(melee(0.0), AttackReceiveType::Miss);
        assert_eq!(melee(9.9), AttackReceiveType::Miss);
        assert_eq!(melee(10.0), AttackReceiveType::Dodge);
        assert_eq!(melee(15.0), AttackReceiveType::Parry);
        assert_eq!(melee(20.0), AttackReceiveType::Crit);
        assert_eq!(melee(30.0), AttackReceiveType::Hit);
        assert_eq!(melee(99.9), AttackReceiveType::Hit);
    }

    #[test]
    fn ranged_physical_cannot_be_parried_or_resisted() {
        let t = table();
        assert_eq!(
            t.resolve(15.0, DamageSource::Ranged, DamageSchool::Physical),
            AttackReceiveType::Crit
        );
        assert_eq!(
            t.resolve(25.0, DamageSource::Ranged, DamageSchool::Physical),
            AttackReceiveType::Hit
        );
    }

    #[test]
    fn spells_can_be_resisted() {
        let t = table();
        assert_eq!(
            t.resolve(15.0, DamageSource::Spell, DamageSchool::Magical),
            AttackReceiveType::Resisted
        );
        assert_eq!(
            t.resolve(35.0, DamageSource::Spell, DamageSchool::Magical),
            AttackReceiveType::Crit
        );
    }

    #[test]
    fn chances_outside_range_are_clamped() {
        let t = AttackTable {
            hit: 150.0,
            crit: -10.0,
            ..AttackTable::default()
        };
        assert_eq!(
            t.resolve(0.0, DamageSource::Melee, DamageSchool::Physical),
            AttackReceiveType::Hit
        );
    }
}
