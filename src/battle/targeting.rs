//! Targeting resolver: pure functions over a battle snapshot.
//!
//! Sides are always relative to the actor. For an enemy actor, "enemies" are the
//! player squad and "allies" are its own squad.

use crate::battle::state::Battle;
use crate::combatant::{CombatantId, Side};
use crate::config::MULTI_TARGET_MULTIPLIER;
use crate::rng::{shuffle, RandomSource};
use schema::TargetType;

fn actor_side(battle: &Battle, actor_id: &CombatantId) -> Option<Side> {
    battle.combatant(actor_id).map(|actor| actor.side())
}

/// The selectable set for a UI pick. Auto-resolved and randomized policies have
/// nothing to pick and return an empty list.
pub fn get_valid_targets(
    battle: &Battle,
    actor_id: &CombatantId,
    target_type: TargetType,
) -> Vec<CombatantId> {
    let Some(side) = actor_side(battle, actor_id) else {
        return Vec::new();
    };

    match target_type {
        TargetType::SingleEnemy | TargetType::AdjacentEnemies => {
            battle.living_ids(side.opponent())
        }
        TargetType::SingleAlly => battle.living_ids(side),
        TargetType::SelfTarget => vec![actor_id.clone()],
        TargetType::AllEnemies | TargetType::AllAllies | TargetType::RandomEnemies(_) => {
            Vec::new()
        }
    }
}

/// The authoritative list of combatants an action affects, in squad order.
///
/// A missing, unknown or fallen primary target for `single_enemy` and
/// `adjacent_enemies` falls back to the first living enemy. `single_ally`
/// never guesses: without a living ally id it resolves to nothing.
pub fn resolve_targets(
    battle: &Battle,
    target_type: TargetType,
    primary: Option<&CombatantId>,
    actor_id: &CombatantId,
    rng: &mut dyn RandomSource,
) -> Vec<CombatantId> {
    let Some(side) = actor_side(battle, actor_id) else {
        return Vec::new();
    };
    let living_enemies = battle.living_ids(side.opponent());
    let living_primary = |candidates: &[CombatantId]| {
        primary.filter(|id| candidates.contains(*id)).cloned()
    };

    match target_type {
        TargetType::SingleEnemy => living_primary(&living_enemies)
            .or_else(|| living_enemies.first().cloned())
            .into_iter()
            .collect(),
        TargetType::SingleAlly => living_primary(&battle.living_ids(side))
            .into_iter()
            .collect(),
        TargetType::AllEnemies => living_enemies,
        TargetType::AllAllies => battle.living_ids(side),
        TargetType::SelfTarget => vec![actor_id.clone()],
        TargetType::AdjacentEnemies => {
            let center = living_primary(&living_enemies)
                .and_then(|id| living_enemies.iter().position(|other| *other == id))
                .or(if living_enemies.is_empty() { None } else { Some(0) });

            match center {
                Some(index) => {
                    let start = index.saturating_sub(1);
                    let end = (index + 2).min(living_enemies.len());
                    living_enemies[start..end].to_vec()
                }
                None => Vec::new(),
            }
        }
        TargetType::RandomEnemies(count) => {
            get_random_enemies(battle, side, count as usize, true, rng)
        }
    }
}

/// Up to `count` distinct members of the side opposing `actor_side`, chosen by
/// shuffle-and-take. Returns fewer when fewer are available.
pub fn get_random_enemies(
    battle: &Battle,
    actor_side: Side,
    count: usize,
    alive_only: bool,
    rng: &mut dyn RandomSource,
) -> Vec<CombatantId> {
    let mut pool: Vec<CombatantId> = battle
        .squad(actor_side.opponent())
        .into_iter()
        .filter(|c| !alive_only || c.is_alive())
        .map(|c| c.id.clone())
        .collect();

    shuffle(&mut pool, rng);
    pool.truncate(count);
    pool
}

/// True only for policies that need the player to pick a target.
pub fn requires_target_selection(target_type: TargetType) -> bool {
    matches!(
        target_type,
        TargetType::SingleEnemy | TargetType::SingleAlly | TargetType::AdjacentEnemies
    )
}

/// Per-target damage multiplier for an action hitting `count` targets.
pub fn get_multi_target_damage_multiplier(count: usize) -> f64 {
    multi_target_damage_multiplier_with(count, MULTI_TARGET_MULTIPLIER)
}

/// Same as [`get_multi_target_damage_multiplier`] with a configured penalty.
pub fn multi_target_damage_multiplier_with(count: usize, penalty: f64) -> f64 {
    if count <= 1 {
        1.0
    } else {
        penalty
    }
}
