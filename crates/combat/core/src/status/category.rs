//! Classification axes damage and stats are tagged with.
//!
//! Each axis is an enum whose members own one slot in the matching modifier
//! container. The `All` selector is not a member: it lives in [`Scope`] and
//! is folded into every concrete slot when the container refreshes.

use core::fmt;

use strum::{EnumCount, EnumIter, IntoEnumIterator, IntoStaticStr};

/// A category axis backed by a fixed set of enum members.
pub trait Category: Copy + Eq + fmt::Debug + IntoEnumIterator + 'static {
    /// Number of concrete members (size of the container table).
    const COUNT: usize;

    /// Dense index of this member, `0..COUNT`.
    fn index(self) -> usize;

    /// Stable name used when building effect identifiers.
    fn name(self) -> &'static str;
}

macro_rules! impl_category {
    ($ty:ty) => {
        impl Category for $ty {
            const COUNT: usize = <$ty as EnumCount>::COUNT;

            #[inline]
            fn index(self) -> usize {
                self as usize
            }

            fn name(self) -> &'static str {
                self.into()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(Category::name(*self))
            }
        }
    };
}

/// Physical or magical origin of damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumCount, EnumIter, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageSchool {
    Physical,
    Magical,
}

/// Delivery of damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumCount, EnumIter, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageSource {
    Melee,
    Ranged,
    Spell,
}

/// Element carried by damage. `None` is a real member with its own slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumCount, EnumIter, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementalSchool {
    None,
    Fire,
    Ice,
    Nature,
    Shadow,
    Light,
}

/// Creature family of a defender.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumCount, EnumIter, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RaceType {
    Human,
    Undead,
    Demon,
    Beast,
    Elemental,
    Plant,
}

/// Entity stats that status effects can modify.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumCount, EnumIter, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatKind {
    MovementSpeed,
    AttackSpeed,
    ChanceToHit,
    ChanceToCrit,
    ChanceToDodge,
    ChanceToParry,
    ChanceToResist,
    MaximumLife,
    MaximumMana,
}

/// Resource pool damage is subtracted from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PowerType {
    Life,
    Mana,
}

impl_category!(DamageSchool);
impl_category!(DamageSource);
impl_category!(ElementalSchool);
impl_category!(RaceType);
impl_category!(StatKind);

/// Either every member of a category axis or exactly one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scope<C> {
    All,
    Only(C),
}

impl<C: Category> Scope<C> {
    /// Returns true if an effect scoped like this contributes to `category`.
    pub fn covers(self, category: C) -> bool {
        match self {
            Scope::All => true,
            Scope::Only(own) => own == category,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Scope::All => "All",
            Scope::Only(c) => c.name(),
        }
    }
}

impl<C> From<C> for Scope<C> {
    fn from(category: C) -> Self {
        Scope::Only(category)
    }
}

impl<C: Category> fmt::Display for Scope<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
