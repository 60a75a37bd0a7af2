//! Aura lifecycle as seen through an entity's effective stats.

use combat_core::{
    Aura, AuraAddOutcome, AuraTemplate, CombatConfig, CoreStats, DamageSource, DamageTags,
    EffectKind, EffectTemplate, PeriodicTick, PowerType, Scope, StatKind, Statable, StatusEffect,
    apply_damage_modifiers,
};

fn statable() -> Statable {
    Statable::new(CoreStats::default().with_life(100), &CombatConfig::default())
}

fn attack_speed_buff(name: &str, percent: f32, seconds: f32) -> Aura {
    Aura::timed(name, seconds).with_effect(StatusEffect::percental(
        EffectKind::Stat(Scope::Only(StatKind::AttackSpeed)),
        percent,
    ))
}

#[test]
fn same_name_refreshes_instead_of_stacking() {
    let mut s = statable();
    assert_eq!(s.add_aura(attack_speed_buff("Frenzy", 25.0, 5.0)), AuraAddOutcome::Added);
    s.update(3.0);
    assert_eq!(s.add_aura(attack_speed_buff("Frenzy", 25.0, 5.0)), AuraAddOutcome::Refreshed);

    assert_eq!(s.auras().len(), 1);
    assert_eq!(s.attack_speed(), 125.0);
    assert_eq!(s.auras().get("Frenzy").unwrap().remaining(), Some(5.0));
}

#[test]
fn different_names_aggregate() {
    let mut s = statable();
    s.add_aura(attack_speed_buff("Frenzy", 25.0, 5.0));
    s.add_aura(attack_speed_buff("Bloodlust", 25.0, 5.0));
    assert_eq!(s.attack_speed(), 150.0);
}

#[test]
fn enable_then_disable_restores_every_container() {
    let mut s = statable();
    let pristine = s.modifiers().clone();

    s.add_aura(
        Aura::permanent("Everything")
            .with_effect(StatusEffect::percental(EffectKind::DamageDoneWithSchool(Scope::All), 15.0))
            .with_effect(StatusEffect::fixed(EffectKind::DamageDoneWithSource(Scope::Only(DamageSource::Melee)), 4.0))
            .with_effect(StatusEffect::percental(EffectKind::CriticalDamageBonus(Scope::All), 50.0))
            .with_effect(StatusEffect::fixed(EffectKind::Stat(Scope::All), 3.0)),
    );
    assert_ne!(s.modifiers(), &pristine);

    s.remove_aura("Everything");
    assert_eq!(s.modifiers(), &pristine);
}

#[test]
fn expiry_reverts_modifiers_and_reports_name() {
    let mut s = statable();
    s.add_aura(attack_speed_buff("Frenzy", 50.0, 1.0));
    assert_eq!(s.attack_speed(), 150.0);

    let update = s.update(1.0);
    let expired: Vec<&str> = update.auras.expired.iter().map(|a| a.name()).collect();
    assert_eq!(expired, vec!["Frenzy"]);
    assert_eq!(s.attack_speed(), 100.0);
    assert!(s.auras().is_empty());
}

#[test]
fn stacking_dot_scales_with_stacks_up_to_cap() {
    let mut s = statable();
    let poison = AuraTemplate::timed("Poison", 10.0)
        .with_max_stacks(3)
        .with_periodic(PeriodicTick {
            interval: 1.0,
            power: PowerType::Life,
            amount: -2,
        });

    for expected in [
        AuraAddOutcome::Added,
        AuraAddOutcome::Stacked(2),
        AuraAddOutcome::Stacked(3),
        AuraAddOutcome::Stacked(3),
    ] {
        assert_eq!(s.add_aura(poison.instantiate(None)), expected);
    }

    let update = s.update(1.0);
    assert_eq!(update.periodic_damage, 6);
    assert_eq!(s.life(), 94);
}

#[test]
fn damage_modifiers_follow_aura_state() {
    let mut s = statable();
    let tags = DamageTags::melee();
    let base = apply_damage_modifiers(s.modifiers(), combat_core::RaceType::Human, &tags, 100, false);
    assert_eq!(base, 100);

    s.add_aura(
        AuraTemplate::permanent("Might")
            .with_effect(EffectTemplate::percental(EffectKind::DamageDoneWithSource(Scope::All), 10.0))
            .instantiate(None),
    );
    assert_eq!(
        apply_damage_modifiers(s.modifiers(), combat_core::RaceType::Human, &tags, 100, false),
        110
    );

    s.remove_aura("Might");
    assert_eq!(
        apply_damage_modifiers(s.modifiers(), combat_core::RaceType::Human, &tags, 100, false),
        100
    );
}
