use crate::battle::state::{BattleAction, BattleEvent};
use crate::battle::tests::common::{
    ability, create_test_battle, status_effect, test_engine, TestCombatantBuilder,
};
use crate::combatant::CombatantId;
use crate::formulas::Effectiveness;
use crate::rng::ScriptedRng;
use pretty_assertions::assert_eq;
use schema::{AbilityCategory, AbilityData, Element, StatusEffectKind, TargetType};

fn use_ability(actor: &str, ability_id: &str, target: Option<&str>) -> BattleAction {
    BattleAction::Ability {
        actor: CombatantId::from(actor),
        ability_id: ability_id.to_string(),
        target: target.map(CombatantId::from),
    }
}

fn heal(power: u32, target_type: TargetType) -> AbilityData {
    let mut heal = ability("cure", Element::Light, AbilityCategory::Healing, power);
    heal.target_type = target_type;
    heal.mp_cost = 4;
    heal
}

#[test]
fn test_miss_still_spends_mp_and_turn() {
    let engine = test_engine();
    let mut wild_swing = ability("wild_swing", Element::Neutral, AbilityCategory::Physical, 90);
    wild_swing.accuracy = 50;
    wild_swing.mp_cost = 6;

    let battle = create_test_battle(
        vec![TestCombatantBuilder::new("hero").with_ability(wild_swing).build()],
        vec![TestCombatantBuilder::new("slime").enemy().build()],
    );

    let mut rng = ScriptedRng::new_for_test(vec![0.9]);
    let result = engine.execute_action(&battle, &use_ability("hero", "wild_swing", None), &mut rng);
    let hero = result.battle.combatant(&CombatantId::from("hero")).unwrap();

    assert_eq!(result.damage, 0);
    assert_eq!(result.message, "Hero's wild_swing missed!");
    assert_eq!(hero.stats.current_mp, 44);
    assert_eq!(result.battle.current_turn_index, 1);
    assert_eq!(
        result
            .battle
            .combatant(&CombatantId::from("slime"))
            .unwrap()
            .stats
            .current_hp,
        100
    );
}

#[test]
fn test_heal_reports_actual_amount() {
    let engine = test_engine();
    let battle = create_test_battle(
        vec![TestCombatantBuilder::new("cleric")
            .with_hp(90, 100)
            .with_ability(heal(30, TargetType::SelfTarget))
            .build()],
        vec![TestCombatantBuilder::new("slime").enemy().build()],
    );

    let mut rng = ScriptedRng::new_for_test(vec![]);
    let result = engine.execute_action(&battle, &use_ability("cleric", "cure", None), &mut rng);

    assert_eq!(result.message, "Cleric used cure! Cleric recovered 10 HP!");
    assert!(result.events.events().contains(&BattleEvent::Healed {
        target: CombatantId::from("cleric"),
        amount: 10,
        new_hp: 100,
    }));
}

#[test]
fn test_single_ally_heal_without_target_heals_nobody() {
    let engine = test_engine();
    let battle = create_test_battle(
        vec![TestCombatantBuilder::new("cleric")
            .with_hp(50, 100)
            .with_ability(heal(30, TargetType::SingleAlly))
            .build()],
        vec![TestCombatantBuilder::new("slime").enemy().build()],
    );

    let mut rng = ScriptedRng::new_for_test(vec![]);
    let result = engine.execute_action(&battle, &use_ability("cleric", "cure", None), &mut rng);
    let cleric = result.battle.combatant(&CombatantId::from("cleric")).unwrap();

    assert_eq!(cleric.stats.current_hp, 50);
    assert_eq!(cleric.stats.current_mp, 46);
}

#[test]
fn test_party_heal_hits_every_living_ally() {
    let engine = test_engine();
    let battle = create_test_battle(
        vec![
            TestCombatantBuilder::new("cleric")
                .with_hp(70, 100)
                .with_ability(heal(20, TargetType::AllAllies))
                .build(),
            TestCombatantBuilder::new("knight").with_hp(60, 100).build(),
            TestCombatantBuilder::new("fallen").with_hp(0, 100).build(),
        ],
        vec![TestCombatantBuilder::new("slime").enemy().build()],
    );

    let mut rng = ScriptedRng::new_for_test(vec![]);
    let result = engine.execute_action(&battle, &use_ability("cleric", "cure", None), &mut rng);
    let hp = |id: &str| {
        result
            .battle
            .combatant(&CombatantId::from(id))
            .unwrap()
            .stats
            .current_hp
    };

    assert_eq!((hp("cleric"), hp("knight"), hp("fallen")), (90, 80, 0));
    assert_eq!(result.message, "Cleric used cure! The party recovered 40 HP!");
}

#[test]
fn test_status_ability_applies_with_full_duration() {
    let engine = test_engine();
    let mut venom = ability("venom", Element::Dark, AbilityCategory::Status, 0);
    venom.status_effect = Some(status_effect(StatusEffectKind::Poison, 3, 1.0));

    let battle = create_test_battle(
        vec![TestCombatantBuilder::new("witch").with_ability(venom).build()],
        vec![TestCombatantBuilder::new("slime").enemy().build()],
    );

    let mut rng = ScriptedRng::new_for_test(vec![]);
    let result = engine.execute_action(
        &battle,
        &use_ability("witch", "venom", Some("slime")),
        &mut rng,
    );
    let slime = result.battle.combatant(&CombatantId::from("slime")).unwrap();

    assert_eq!(result.status_applied, Some(StatusEffectKind::Poison));
    assert_eq!(slime.status(StatusEffectKind::Poison).unwrap().turns_remaining, 3);
    assert_eq!(
        slime.status(StatusEffectKind::Poison).unwrap().applied_by,
        CombatantId::from("witch")
    );
}

#[test]
fn test_same_status_kind_is_rejected() {
    let engine = test_engine();
    let mut venom = ability("venom", Element::Dark, AbilityCategory::Status, 0);
    venom.status_effect = Some(status_effect(StatusEffectKind::Poison, 3, 1.0));
    venom.mp_cost = 5;

    let battle = create_test_battle(
        vec![TestCombatantBuilder::new("witch").with_ability(venom).build()],
        vec![TestCombatantBuilder::new("slime")
            .enemy()
            .with_status(status_effect(StatusEffectKind::Poison, 1, 1.0))
            .build()],
    );

    let mut rng = ScriptedRng::new_for_test(vec![]);
    let result = engine.execute_action(
        &battle,
        &use_ability("witch", "venom", Some("slime")),
        &mut rng,
    );
    let slime = result.battle.combatant(&CombatantId::from("slime")).unwrap();

    assert_eq!(result.message, "Slime is already affected by poison!");
    assert_eq!(result.status_applied, None);
    assert_eq!(slime.status_effects.len(), 1);
    assert_eq!(slime.status(StatusEffectKind::Poison).unwrap().turns_remaining, 1);
    assert_eq!(
        result
            .battle
            .combatant(&CombatantId::from("witch"))
            .unwrap()
            .stats
            .current_mp,
        45
    );
}

#[test]
fn test_self_buff_targets_the_caster() {
    let engine = test_engine();
    let mut focus = ability("focus", Element::Neutral, AbilityCategory::Status, 0);
    focus.target_type = TargetType::SelfTarget;
    focus.status_effect = Some(status_effect(StatusEffectKind::AttackUp, 3, 1.5));

    let battle = create_test_battle(
        vec![TestCombatantBuilder::new("knight").with_ability(focus).build()],
        vec![TestCombatantBuilder::new("slime").enemy().build()],
    );

    let mut rng = ScriptedRng::new_for_test(vec![]);
    let result = engine.execute_action(
        &battle,
        &use_ability("knight", "focus", Some("slime")),
        &mut rng,
    );
    let knight = result.battle.combatant(&CombatantId::from("knight")).unwrap();

    assert!(knight.has_status(StatusEffectKind::AttackUp));
    assert_eq!(knight.effective_attack(AbilityCategory::Physical), 30);
}

#[test]
fn test_super_effective_hit_can_attach_status() {
    let engine = test_engine();
    let mut ember = ability("ember", Element::Fire, AbilityCategory::Magical, 40);
    ember.status_effect = Some(status_effect(StatusEffectKind::Poison, 2, 1.0));

    let battle = create_test_battle(
        vec![TestCombatantBuilder::new("mage").with_ability(ember).build()],
        vec![TestCombatantBuilder::new("sprite")
            .enemy()
            .with_hp(1000, 1000)
            .with_ability(ability("gust", Element::Air, AbilityCategory::Magical, 30))
            .build()],
    );

    // variance, crit (miss), status proc (hit)
    let mut rng = ScriptedRng::new_for_test(vec![0.5, 0.9, 0.1]);
    let result = engine.execute_action(
        &battle,
        &use_ability("mage", "ember", Some("sprite")),
        &mut rng,
    );

    assert_eq!(result.effectiveness, Some(Effectiveness::Super));
    assert_eq!(result.status_applied, Some(StatusEffectKind::Poison));
    assert!(result.message.contains("It's super effective!"));
    assert!(result.damage > 200);
}

#[test]
fn test_resisted_hit_is_classified_weak() {
    let engine = test_engine();
    let battle = create_test_battle(
        vec![TestCombatantBuilder::new("mage")
            .with_ability(ability("ember", Element::Fire, AbilityCategory::Magical, 40))
            .build()],
        vec![TestCombatantBuilder::new("naiad")
            .enemy()
            .with_hp(1000, 1000)
            .with_ability(ability("splash", Element::Water, AbilityCategory::Magical, 30))
            .build()],
    );

    let mut rng = ScriptedRng::new_for_test(vec![0.5, 0.9]);
    let result = engine.execute_action(
        &battle,
        &use_ability("mage", "ember", Some("naiad")),
        &mut rng,
    );

    assert_eq!(result.effectiveness, Some(Effectiveness::Weak));
    assert_eq!(result.status_applied, None);
}

#[test]
fn test_area_damage_hits_each_enemy_at_reduced_power() {
    let engine = test_engine();
    let mut quake = ability("quake", Element::Neutral, AbilityCategory::Physical, 40);
    quake.target_type = TargetType::AllEnemies;
    quake.status_effect = Some(status_effect(StatusEffectKind::Slow, 2, 0.5));

    let battle = create_test_battle(
        vec![TestCombatantBuilder::new("golem").with_ability(quake).build()],
        vec![
            TestCombatantBuilder::new("a").enemy().with_hp(500, 500).build(),
            TestCombatantBuilder::new("b").enemy().with_hp(500, 500).build(),
            TestCombatantBuilder::new("c").enemy().with_hp(500, 500).build(),
        ],
    );

    // Per enemy: variance at the top of the band, no crit.
    // 20 * 40 / 5 = 160 -> 159 after variance -> 119 after the 0.75 penalty
    let mut rng = ScriptedRng::new_for_test(vec![0.999_999, 0.99].repeat(3));
    let result = engine.execute_action(&battle, &use_ability("golem", "quake", None), &mut rng);

    assert_eq!(result.damage, 119 * 3);
    assert_eq!(result.effectiveness, None);
    assert_eq!(result.status_applied, None);
    for id in ["a", "b", "c"] {
        let enemy = result.battle.combatant(&CombatantId::from(id)).unwrap();
        assert_eq!(enemy.stats.current_hp, 381);
        assert!(enemy.status_effects.is_empty());
    }
}

#[test]
fn test_adjacent_ability_spares_the_far_enemy() {
    let engine = test_engine();
    let mut cleave = ability("cleave", Element::Neutral, AbilityCategory::Physical, 40);
    cleave.target_type = TargetType::AdjacentEnemies;

    let battle = create_test_battle(
        vec![TestCombatantBuilder::new("knight").with_ability(cleave).build()],
        vec![
            TestCombatantBuilder::new("a").enemy().with_hp(500, 500).build(),
            TestCombatantBuilder::new("b").enemy().with_hp(500, 500).build(),
            TestCombatantBuilder::new("c").enemy().with_hp(500, 500).build(),
        ],
    );

    let mut rng = ScriptedRng::new_for_test(vec![0.5, 0.9].repeat(2));
    let result = engine.execute_action(
        &battle,
        &use_ability("knight", "cleave", Some("a")),
        &mut rng,
    );
    let hp = |id: &str| {
        result
            .battle
            .combatant(&CombatantId::from(id))
            .unwrap()
            .stats
            .current_hp
    };

    assert!(hp("a") < 500);
    assert!(hp("b") < 500);
    assert_eq!(hp("c"), 500);
}
