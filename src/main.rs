use squad_battle::battle::catch::{
    attempt_capture, capture_difficulty_for, capture_rate_description,
};
use squad_battle::{
    create_combatant_from_enemy, create_combatant_from_player, Battle, BattleAction, BattleConfig,
    BattleEngine, BattleResult, BattleRng, BattleState, Behavior, CaptureDevice, Combatant,
    CombatantId, FactoryOptions, HeuristicAI, PartyMember, Registry, Side,
};
use std::path::Path;
use tracing_subscriber::EnvFilter;

const MAX_ACTIONS: usize = 200;
/// The demo only throws an orb once the last enemy standing is below this HP ratio.
const CAPTURE_HP_THRESHOLD: f64 = 0.5;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("squad_battle=info")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> BattleResult<()> {
    let data_path = Path::new("data");
    let registry = Registry::load_from_dir(data_path)?;
    let config = BattleConfig::load_or_default(&data_path.join("battle_config.ron"))?;
    let engine = BattleEngine::new(config);

    // Optional seed as the first argument for a reproducible run.
    let mut rng = match std::env::args().nth(1).and_then(|arg| arg.parse::<u64>().ok()) {
        Some(seed) => BattleRng::from_seed(seed),
        None => BattleRng::new_random(),
    };

    let mut party = vec![
        PartyMember::new("ember", "Ember", registry.species("cinderpup")?, 8)?,
        PartyMember::new("ripple", "Ripple", registry.species("tidal_sprite")?, 7)?,
    ];

    let options = FactoryOptions::default();
    let players = party
        .iter()
        .map(|member| create_combatant_from_player(member, &registry, options))
        .collect::<BattleResult<Vec<_>>>()?;
    let enemies = [("stonehide", 6), ("gale_finch", 5), ("mire_viper", 6)]
        .iter()
        .enumerate()
        .map(|(slot, (species_id, level))| {
            create_combatant_from_enemy(species_id, *level, slot, &registry, options)
        })
        .collect::<BattleResult<Vec<_>>>()?;

    let orb = registry
        .item("capture_orb")
        .ok()
        .and_then(CaptureDevice::from_item);

    let created = engine.create_battle(players, enemies, true, &mut rng);
    let mut battle = engine.start(&created);
    print_squads(&battle);

    let ai = HeuristicAI::new(engine.config());
    let mut actions = 0;

    while !battle.state.is_terminal() && actions < MAX_ACTIONS {
        let Some(actor_id) = battle.current_actor_id().cloned() else {
            break;
        };

        let tick = engine.process_status_effects(&battle, &actor_id);
        tick.events.print_formatted(&tick.battle);
        battle = tick.battle;

        if let Some(outcome) = engine.check_battle_end(&battle) {
            if outcome == BattleState::Victory {
                battle.rewards = Some(engine.calculate_battle_rewards(&battle, &mut rng));
            }
            battle.state = outcome;
            break;
        }
        if !battle.combatant(&actor_id).is_some_and(|c| c.is_alive()) {
            battle = engine.advance_to_next_actor(&battle);
            continue;
        }

        let capture_target = match (&orb, battle.state) {
            (Some(_), BattleState::PlayerTurn) => capture_candidate(&battle),
            _ => None,
        };

        let result = match (capture_target, &orb) {
            (Some(target_id), Some(orb)) => {
                let readied = engine.execute_action(
                    &battle,
                    &BattleAction::Capture {
                        actor: actor_id.clone(),
                        target: Some(target_id.clone()),
                        item_id: Some(orb.item_id.clone()),
                    },
                    &mut rng,
                );
                println!("{}", readied.message);

                let luck = battle
                    .combatant(&actor_id)
                    .map(|actor| actor.stats.luck)
                    .unwrap_or(0);
                let Some(target) = readied.battle.combatant(&target_id) else {
                    break;
                };
                let difficulty = capture_difficulty_for(target, &registry)?;
                let attempt = attempt_capture(
                    target,
                    orb,
                    luck,
                    difficulty,
                    false,
                    engine.config(),
                    &mut rng,
                );
                println!(
                    "Capture chance: {:.0}% ({})",
                    attempt.final_rate * 100.0,
                    capture_rate_description(attempt.final_rate)
                );
                engine.resolve_capture(&readied.battle, &attempt, &mut rng)
            }
            _ => {
                let action = ai.decide_action(&actor_id, &battle, &mut rng);
                engine.execute_action(&battle, &action, &mut rng)
            }
        };
        println!("{}", result.message);
        actions += 1;

        battle = if result.battle.state == BattleState::Animating {
            engine.advance_to_next_actor(&result.battle)
        } else {
            result.battle
        };
    }

    println!();
    println!("Battle over: {:?} after {} rounds", battle.state, battle.turn_count);

    if let Some(rewards) = battle.rewards.clone() {
        match serde_json::to_string_pretty(&rewards) {
            Ok(json) => println!("Rewards:\n{}", json),
            Err(e) => tracing::warn!(error = %e, "could not render rewards"),
        }

        for member in party.iter_mut() {
            if let Some(combatant) = battle.combatant(&member.id) {
                member.sync_from_combatant(combatant);
            }
            let species = registry.species(&member.species_id)?;
            let report = member.gain_experience(rewards.experience as u64, species)?;
            if report.leveled_up() {
                println!(
                    "{} grew to level {}! (+{} HP)",
                    member.name, report.new_level, report.stat_gains.hp
                );
                for ability_id in &report.new_abilities {
                    println!("{} learned {}!", member.name, registry.ability(ability_id)?.name);
                }
            }
        }
    }

    let snapshot = battle.to_snapshot_bytes()?;
    tracing::debug!(bytes = snapshot.len(), "final snapshot encoded");

    Ok(())
}

/// The single living enemy, if it is capturable and weakened.
fn capture_candidate(battle: &Battle) -> Option<CombatantId> {
    match battle.living(Side::Enemy).as_slice() {
        [last] if last.capturable && last.stats.hp_ratio() < CAPTURE_HP_THRESHOLD => {
            Some(last.id.clone())
        }
        _ => None,
    }
}

fn print_squads(battle: &Battle) {
    let describe = |combatant: &Combatant| {
        format!(
            "  {} (Lv {}, {:?}) HP {}/{} MP {}/{}",
            combatant.name,
            combatant.level,
            combatant.element(),
            combatant.stats.current_hp,
            combatant.stats.max_hp,
            combatant.stats.current_mp,
            combatant.stats.max_mp
        )
    };

    println!("Your squad:");
    for combatant in battle.player_squad() {
        println!("{}", describe(combatant));
    }
    println!("Wild monsters:");
    for combatant in battle.enemy_squad() {
        println!("{}", describe(combatant));
    }
    println!();
}
