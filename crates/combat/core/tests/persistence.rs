//! Saving mid-fight state and resuming from it.
#![cfg(feature = "serde")]

use combat_core::{
    AttackLimiter, Aura, AuraList, CombatConfig, CombatEvents, CoreStats, Cooldown, EffectKind,
    EffectTemplate, ModifierContainers, Persist, PersistError, PeriodicTick, PowerType, Scope,
    StatKind, Statable, StatusEffect, TalentDefinition, TalentId, TalentLevels, TalentTree,
};

fn hero(config: &CombatConfig) -> Statable {
    Statable::new(CoreStats::default().with_life(200), config)
}

#[test]
fn aura_list_resumes_with_identical_modifiers() {
    let config = CombatConfig::default();
    let mut before = hero(&config);
    before.add_aura(
        Aura::timed("Haste", 10.0)
            .with_effect(StatusEffect::percental(EffectKind::Stat(Scope::Only(StatKind::AttackSpeed)), 25.0)),
    );
    before.add_aura(
        Aura::permanent("Fortitude")
            .with_effect(StatusEffect::fixed(EffectKind::Stat(Scope::Only(StatKind::MaximumLife)), 50.0)),
    );
    before.add_aura(
        Aura::timed("Poison", 6.0)
            .stacking(5)
            .with_periodic(PeriodicTick {
                interval: 1.0,
                power: PowerType::Life,
                amount: -3,
            }),
    );
    before.add_aura(Aura::timed("Poison", 6.0).stacking(5).with_periodic(PeriodicTick {
        interval: 1.0,
        power: PowerType::Life,
        amount: -3,
    }));
    before.update(2.5);

    let bytes = before.auras().save().unwrap();
    let restored = AuraList::load(&bytes).unwrap();
    assert_eq!(&restored, before.auras());

    let mut after = hero(&config);
    after.restore_auras(restored);
    assert_eq!(after.attack_speed(), before.attack_speed());
    assert_eq!(after.maximum_life(), before.maximum_life());
    assert_eq!(after.auras().get("Poison").unwrap().stacks(), 2);
    assert_eq!(
        after.auras().get("Haste").unwrap().remaining(),
        before.auras().get("Haste").unwrap().remaining()
    );

    // Both sides keep ticking identically.
    let before_tick = before.update(1.0);
    let after_tick = after.update(1.0);
    assert_eq!(before_tick.periodic_damage, after_tick.periodic_damage);
    assert_eq!(before_tick.periodic_damage, 6);
}

#[test]
fn restored_list_rebuilds_containers_from_scratch() {
    let config = CombatConfig::default();
    let mut containers = ModifierContainers::new(&config);
    let mut list = AuraList::new();
    list.add(
        Aura::permanent("Swift")
            .with_effect(StatusEffect::percental(EffectKind::Stat(Scope::All), 10.0)),
        &mut containers,
    );

    let restored = AuraList::load(&list.save().unwrap()).unwrap();
    let mut rebuilt = ModifierContainers::new(&config);
    rebuilt.refresh_all(&restored);
    assert_eq!(rebuilt, containers);
}

#[test]
fn limiter_resumes_mid_cooldown() {
    let mut limiter = AttackLimiter::timed(2.0);
    limiter.reset();
    limiter.update(0.5);

    let restored = AttackLimiter::load(&limiter.save().unwrap()).unwrap();
    assert_eq!(restored, limiter);
    assert_eq!(restored.cooldown().time_left(), 1.5);
    assert!(!restored.is_ready());
}

#[test]
fn wrong_type_is_rejected() {
    let bytes = Cooldown::new(1.0).save().unwrap();
    let err = AttackLimiter::load(&bytes).unwrap_err();
    assert!(matches!(err, PersistError::TypeMismatch { .. }));
}

#[test]
fn truncated_payload_fails_to_decode() {
    let bytes = Cooldown::new(1.0).save().unwrap();
    let err = Cooldown::load(&bytes[..bytes.len() / 2]).unwrap_err();
    assert!(matches!(err, PersistError::Decode { .. }));
}

#[test]
fn talent_levels_resume_with_auras() {
    let config = CombatConfig::default();
    let definitions = || {
        vec![
            TalentDefinition::new(TalentId(1), "Brutality", 3).with_effect(EffectTemplate::percental(
                EffectKind::DamageDoneWithSchool(Scope::All),
                5.0,
            )),
        ]
    };
    let mut events = CombatEvents::default();
    let mut statable = hero(&config);
    let mut tree = TalentTree::new(definitions()).unwrap();
    tree.learn(TalentId(1), &mut statable, &mut events).unwrap();
    tree.learn(TalentId(1), &mut statable, &mut events).unwrap();

    let saved = TalentLevels::load(&tree.snapshot().save().unwrap()).unwrap();

    let mut fresh_statable = hero(&config);
    let mut fresh_tree = TalentTree::new(definitions()).unwrap();
    fresh_tree.restore(&saved, &mut fresh_statable).unwrap();

    assert_eq!(fresh_tree.level(TalentId(1)), 2);
    assert_eq!(fresh_statable.modifiers(), statable.modifiers());
}
