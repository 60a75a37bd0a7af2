//! Arena entities.

use super::geometry::{EntityId, Facing, Rect, Vec2};
use crate::attack::AttackSlot;
use crate::stats::Statable;

/// Anything an arena tracks: fighters, and interactables without stats.
///
/// Entities without a [`Statable`] can still be struck; they receive
/// zero-damage attack reports (doors, levers, breakables).
#[derive(Clone, Debug)]
pub struct Combatant {
    pub id: EntityId,
    pub name: String,
    /// Floor/layer index; only entities on the same floor interact.
    pub floor: i32,
    pub bounds: Rect,
    pub facing: Facing,
    pub statable: Option<Statable>,
    pub attacks: Vec<AttackSlot>,
    /// Entity this combatant attacks, if any.
    pub target: Option<EntityId>,
}

impl Combatant {
    pub fn new(id: EntityId, name: impl Into<String>, bounds: Rect) -> Self {
        Self {
            id,
            name: name.into(),
            floor: 0,
            bounds,
            facing: Facing::default(),
            statable: None,
            attacks: Vec::new(),
            target: None,
        }
    }

    pub fn with_statable(mut self, statable: Statable) -> Self {
        self.statable = Some(statable);
        self
    }

    pub fn with_attack(mut self, attack: impl Into<AttackSlot>) -> Self {
        self.attacks.push(attack.into());
        self
    }

    pub fn with_floor(mut self, floor: i32) -> Self {
        self.floor = floor;
        self
    }

    pub fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    pub fn with_target(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }

    /// Alive entities with stats; interactables never count as alive.
    pub fn is_alive(&self) -> bool {
        self.statable.as_ref().is_some_and(|s| !s.is_dead())
    }

    /// Can receive damage right now.
    pub fn is_attackable(&self) -> bool {
        self.statable
            .as_ref()
            .is_some_and(|s| !s.is_dead() && !s.is_invincible())
    }

    /// Turn to face `point`.
    pub fn face_towards(&mut self, point: Vec2) {
        self.facing = Facing::towards(self.center(), point);
    }

    /// Region in front of this entity reaching `reach` units.
    pub fn front_region(&self, reach: f32) -> Rect {
        self.facing.region_in_front(&self.bounds, reach)
    }
}
