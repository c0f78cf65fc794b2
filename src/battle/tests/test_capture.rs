use crate::battle::catch::{attempt_capture, attempt_capture_with_roll, CaptureDevice};
use crate::battle::state::{BattleAction, BattleEvent, BattleState};
use crate::battle::tests::common::{
    create_test_battle, predictable_rng, status_effect, test_engine, TestCombatantBuilder,
};
use crate::combatant::CombatantId;
use crate::config::BattleConfig;
use crate::rng::ScriptedRng;
use pretty_assertions::assert_eq;
use schema::StatusEffectKind;

fn orb() -> CaptureDevice {
    CaptureDevice {
        item_id: "capture_orb".to_string(),
        name: "Capture Orb".to_string(),
        multiplier: 1.0,
    }
}

fn capture_action() -> BattleAction {
    BattleAction::Capture {
        actor: CombatantId::from("tamer"),
        target: Some(CombatantId::from("wisp")),
        item_id: Some("capture_orb".to_string()),
    }
}

fn weakened_wild_battle() -> crate::battle::state::Battle {
    create_test_battle(
        vec![TestCombatantBuilder::new("tamer").with_speed(20).build()],
        vec![
            TestCombatantBuilder::new("wisp").enemy().with_hp(10, 100).build(),
            TestCombatantBuilder::new("slime").enemy().with_hp(0, 100).build(),
        ],
    )
}

#[test]
fn test_successful_capture_ends_the_battle() {
    let engine = test_engine();
    let battle = weakened_wild_battle();
    let config = BattleConfig::default();

    let mut rng = predictable_rng();
    let readied = engine.execute_action(&battle, &capture_action(), &mut rng);
    assert_eq!(readied.battle.state, BattleState::CaptureAttempt);

    let wisp = readied.battle.combatant(&CombatantId::from("wisp")).unwrap();
    let attempt = attempt_capture_with_roll(wisp, &orb(), 0, 0.0, 0.1, &config);
    assert!((attempt.final_rate - 0.9).abs() < 1e-9);
    assert!(attempt.succeeded);

    let result = engine.resolve_capture(&readied.battle, &attempt, &mut rng);

    assert_eq!(result.message, "Gotcha! Wisp was captured!");
    assert_eq!(result.battle.state, BattleState::Victory);
    assert!(result.battle.combatant(&CombatantId::from("wisp")).is_none());
    assert_eq!(result.battle.enemy_ids(), &[CombatantId::from("slime")]);

    let rewards = result.battle.rewards.as_ref().unwrap();
    assert_eq!(rewards.captured.len(), 1);
    assert_eq!(rewards.captured[0].id, CombatantId::from("wisp"));
    // Only the fainted slime counts toward experience.
    assert_eq!(rewards.experience, 23);
    assert!(result.events.events().contains(&BattleEvent::CaptureResolved {
        target: CombatantId::from("wisp"),
        succeeded: true,
        shakes: 3,
    }));
}

#[test]
fn test_failed_capture_costs_the_turn() {
    let engine = test_engine();
    let battle = weakened_wild_battle();
    let config = BattleConfig::default();

    let mut rng = predictable_rng();
    let readied = engine.execute_action(&battle, &capture_action(), &mut rng);
    let wisp = readied.battle.combatant(&CombatantId::from("wisp")).unwrap();
    let attempt = attempt_capture_with_roll(wisp, &orb(), 0, 0.0, 0.95, &config);
    assert!(!attempt.succeeded);

    let result = engine.resolve_capture(&readied.battle, &attempt, &mut rng);

    assert_eq!(result.message, "Wisp broke free!");
    assert_eq!(result.battle.state, BattleState::EnemyTurn);
    assert!(result.battle.combatant(&CombatantId::from("wisp")).is_some());
    assert!(result.battle.rewards.is_none());
}

#[test]
fn test_capture_rejected_for_unowned_targets() {
    let engine = test_engine();
    let battle = create_test_battle(
        vec![TestCombatantBuilder::new("tamer").with_speed(20).build()],
        vec![TestCombatantBuilder::new("boss").enemy().not_capturable().build()],
    );
    let config = BattleConfig::default();
    let boss = battle.combatant(&CombatantId::from("boss")).unwrap();
    let attempt = attempt_capture_with_roll(boss, &orb(), 0, 0.0, 0.0, &config);

    let mut rng = ScriptedRng::new_for_test(vec![]);
    let result = engine.resolve_capture(&battle, &attempt, &mut rng);

    assert!(result.message.starts_with("Capture not possible"));
    assert_eq!(result.battle, battle);
}

#[test]
fn test_sleep_and_luck_raise_the_rate() {
    let config = BattleConfig::default();
    let awake = TestCombatantBuilder::new("wisp").enemy().with_hp(50, 100).build();
    let asleep = TestCombatantBuilder::new("wisp")
        .enemy()
        .with_hp(50, 100)
        .with_status(status_effect(StatusEffectKind::Sleep, 2, 1.0))
        .build();

    let plain = attempt_capture_with_roll(&awake, &orb(), 0, 0.2, 1.0, &config);
    let sleepy = attempt_capture_with_roll(&asleep, &orb(), 0, 0.2, 1.0, &config);
    let lucky = attempt_capture_with_roll(&awake, &orb(), 20, 0.2, 1.0, &config);

    assert!((plain.final_rate - 0.4).abs() < 1e-9);
    assert!((sleepy.final_rate - 0.6).abs() < 1e-9);
    assert!((lucky.final_rate - 0.48).abs() < 1e-9);
    assert!(sleepy.modifiers.iter().any(|m| m.label == "Asleep"));
}

#[test]
fn test_full_health_capture_still_has_a_floor() {
    let config = BattleConfig::default();
    let healthy = TestCombatantBuilder::new("wisp").enemy().build();

    let attempt = attempt_capture_with_roll(&healthy, &orb(), 0, 0.5, 0.04, &config);

    assert_eq!(attempt.final_rate, config.capture_min_rate);
    assert!(attempt.succeeded);
}

#[test]
fn test_guaranteed_capture_consumes_no_roll() {
    let config = BattleConfig::default();
    let healthy = TestCombatantBuilder::new("wisp").enemy().build();
    let mut rng = ScriptedRng::new_for_test(vec![]);

    let attempt = attempt_capture(&healthy, &orb(), 0, 0.9, true, &config, &mut rng);

    assert!(attempt.succeeded);
    assert_eq!(rng.consumed(), 0);
}
