//! A module for defining AI behaviors for non-player combatants.

use crate::battle::state::{Battle, BattleAction};
use crate::combatant::{Combatant, CombatantId};
use crate::config::BattleConfig;
use crate::formulas::element_multiplier;
use crate::rng::RandomSource;
use schema::{AbilityCategory, AbilityData, TargetType};

/// A trait for any system that can decide on a battle action.
/// This provides a common interface for different AI strategies.
pub trait Behavior {
    /// Inspects the battle and decides on the next action for the given combatant.
    fn decide_action(
        &self,
        actor_id: &CombatantId,
        battle: &Battle,
        rng: &mut dyn RandomSource,
    ) -> BattleAction;
}

/// Single-ply heuristic: heal when low, otherwise sometimes pick the best
/// scoring damaging ability, otherwise attack a random target.
pub struct HeuristicAI {
    heal_threshold: f64,
    ability_chance: f64,
}

impl HeuristicAI {
    pub fn new(config: &BattleConfig) -> Self {
        Self {
            heal_threshold: config.enemy_heal_threshold,
            ability_chance: config.enemy_ability_chance,
        }
    }

    fn affordable<'a>(actor: &'a Combatant) -> impl Iterator<Item = &'a AbilityData> + 'a {
        actor
            .abilities
            .iter()
            .filter(move |ability| ability.mp_cost <= actor.stats.current_mp)
    }

    /// `power × element multiplier` against the chosen target. Highest wins,
    /// ties go to the ability listed first.
    fn best_damaging_ability<'a>(
        actor: &'a Combatant,
        target: &Combatant,
    ) -> Option<&'a AbilityData> {
        let target_element = target.element();
        let mut best: Option<(&AbilityData, f64)> = None;

        for ability in Self::affordable(actor).filter(|ability| ability.is_damaging()) {
            let score = ability.power as f64 * element_multiplier(ability.element, target_element);
            let better = match best {
                None => true,
                Some((_, top)) => score > top,
            };
            if better {
                best = Some((ability, score));
            }
        }
        best.map(|(ability, _)| ability)
    }
}

impl Default for HeuristicAI {
    fn default() -> Self {
        Self::new(&BattleConfig::default())
    }
}

impl Behavior for HeuristicAI {
    fn decide_action(
        &self,
        actor_id: &CombatantId,
        battle: &Battle,
        rng: &mut dyn RandomSource,
    ) -> BattleAction {
        let Some(actor) = battle.combatant(actor_id) else {
            return BattleAction::Defend {
                actor: actor_id.clone(),
            };
        };
        let targets = battle.living(actor.side().opponent());
        if targets.is_empty() {
            return BattleAction::Defend {
                actor: actor_id.clone(),
            };
        }

        if actor.stats.hp_ratio() < self.heal_threshold {
            if let Some(heal) = Self::affordable(actor)
                .find(|ability| ability.category == AbilityCategory::Healing)
            {
                let target = match heal.target_type {
                    TargetType::SingleAlly | TargetType::SelfTarget => Some(actor_id.clone()),
                    _ => None,
                };
                return BattleAction::Ability {
                    actor: actor_id.clone(),
                    ability_id: heal.id.clone(),
                    target,
                };
            }
        }

        let target = targets[rng.index(targets.len(), "ai target")];

        if rng.chance(self.ability_chance, "ai uses ability") {
            if let Some(ability) = Self::best_damaging_ability(actor, target) {
                let target_id = match ability.target_type {
                    TargetType::AllEnemies => None,
                    _ => Some(target.id.clone()),
                };
                return BattleAction::Ability {
                    actor: actor_id.clone(),
                    ability_id: ability.id.clone(),
                    target: target_id,
                };
            }
        }

        BattleAction::Attack {
            actor: actor_id.clone(),
            target: Some(target.id.clone()),
        }
    }
}
