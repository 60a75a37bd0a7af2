//! Typed publish/subscribe channels for combat events.
//!
//! Each event kind has its own [`EventChannel`]. Subscribing returns a
//! [`SubscriptionToken`]; handing the token back to `unsubscribe` is the only
//! way a callback is released.

use core::fmt;

use crate::attack::AttackReport;
use crate::talent::TalentId;
use crate::world::EntityId;

/// Handle identifying one subscription on one channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

type Callback<T> = Box<dyn FnMut(&T)>;

/// Single-threaded observer list for events of type `T`.
pub struct EventChannel<T> {
    next_token: u64,
    subscribers: Vec<(SubscriptionToken, Callback<T>)>,
}

impl<T> Default for EventChannel<T> {
    fn default() -> Self {
        Self {
            next_token: 0,
            subscribers: Vec::new(),
        }
    }
}

impl<T> fmt::Debug for EventChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<T> EventChannel<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> SubscriptionToken {
        let token = SubscriptionToken(self.next_token);
        self.next_token += 1;
        self.subscribers.push((token, Box::new(callback)));
        token
    }

    /// Returns false if `token` was not subscribed here.
    pub fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(t, _)| *t != token);
        self.subscribers.len() != before
    }

    /// Deliver `event` to every subscriber in subscription order.
    pub fn publish(&mut self, event: &T) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AuraApplied {
    pub entity: EntityId,
    pub aura: String,
    pub source: Option<EntityId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AuraExpired {
    pub entity: EntityId,
    pub aura: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityDied {
    pub entity: EntityId,
    /// Entity that dealt the killing blow, if it was a strike.
    pub killer: Option<EntityId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TalentChanged {
    pub talent: TalentId,
    pub level: u8,
}

/// Every channel the combat engine publishes on.
#[derive(Debug, Default)]
pub struct CombatEvents {
    pub attack_resolved: EventChannel<AttackReport>,
    pub aura_applied: EventChannel<AuraApplied>,
    pub aura_expired: EventChannel<AuraExpired>,
    pub entity_died: EventChannel<EntityDied>,
    pub talent_learned: EventChannel<TalentChanged>,
    pub talent_unlearned: EventChannel<TalentChanged>,
    pub talent_level_changed: EventChannel<TalentChanged>,
}

impl CombatEvents {
    pub fn new() -> Self {
        Self::default()
    }
}
