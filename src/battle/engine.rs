use crate::battle::state::{ActionResult, Battle, BattleAction, BattleEvent, BattleState, EventBus};
use crate::battle::targeting::resolve_targets;
use crate::combatant::{ActiveStatusEffect, Combatant, CombatantId, Side};
use crate::config::BattleConfig;
use crate::formulas::{calculate_damage, calculate_flee_chance, DamageInput};
use crate::rng::RandomSource;
use ordered_float::OrderedFloat;
use schema::{AbilityCategory, Element, StatusEffectData, StatusEffectKind, TargetType};
use std::cmp::Reverse;
use std::collections::BTreeSet;

/// Runs battles. Holds only configuration; every battle lives in the `Battle`
/// snapshots passed in and returned.
#[derive(Debug, Clone, Default)]
pub struct BattleEngine {
    config: BattleConfig,
}

impl BattleEngine {
    pub fn new(config: BattleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    // --- Battle creation and turn flow ---

    /// Create a battle from two squads.
    ///
    /// The turn order holds every living combatant, sorted by descending
    /// effective speed with a random tiebreak. It is computed once here and
    /// never re-sorted. A combatant repeating an earlier id gets no slot.
    pub fn create_battle(
        &self,
        players: Vec<Combatant>,
        enemies: Vec<Combatant>,
        can_flee: bool,
        rng: &mut dyn RandomSource,
    ) -> Battle {
        let mut seen = BTreeSet::new();
        let mut keyed: Vec<(Reverse<OrderedFloat<f64>>, OrderedFloat<f64>, CombatantId)> = players
            .iter()
            .chain(enemies.iter())
            .filter(|c| seen.insert(c.id.clone()))
            .filter(|c| c.is_alive())
            .map(|c| {
                (
                    Reverse(OrderedFloat(c.effective_speed())),
                    OrderedFloat(rng.next_roll("turn order tiebreak")),
                    c.id.clone(),
                )
            })
            .collect();
        keyed.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        let turn_order = keyed.into_iter().map(|(_, _, id)| id).collect();

        let battle = Battle::new(players, enemies, turn_order, can_flee);
        tracing::info!(
            players = battle.player_ids().len(),
            enemies = battle.enemy_ids().len(),
            can_flee,
            "battle created"
        );
        battle
    }

    /// Move a freshly created battle to its first actor's state.
    pub fn start(&self, battle: &Battle) -> Battle {
        let mut next = battle.clone();
        next.state = self.determine_next_state(&next);
        next
    }

    /// `Victory` or `Defeat` once a side has no one standing, otherwise `None`.
    pub fn check_battle_end(&self, battle: &Battle) -> Option<BattleState> {
        if battle.all_defeated(Side::Enemy) {
            Some(BattleState::Victory)
        } else if battle.all_defeated(Side::Player) {
            Some(BattleState::Defeat)
        } else {
            None
        }
    }

    /// The state the battle should be in given its current turn index.
    pub fn determine_next_state(&self, battle: &Battle) -> BattleState {
        if let Some(outcome) = self.check_battle_end(battle) {
            return outcome;
        }
        match battle
            .current_actor_id()
            .and_then(|id| battle.combatant(id))
        {
            Some(actor) if actor.is_alive() => match actor.side() {
                Side::Player => BattleState::PlayerTurn,
                Side::Enemy => BattleState::EnemyTurn,
            },
            _ => BattleState::Animating,
        }
    }

    /// Step the turn index forward, counting a new round whenever it wraps.
    pub fn advance_turn(&self, battle: &Battle) -> Battle {
        let mut next = battle.clone();
        let len = next.turn_order().len();
        if len == 0 {
            return next;
        }
        next.current_turn_index = (next.current_turn_index + 1) % len;
        if next.current_turn_index == 0 {
            next.turn_count += 1;
        }
        next
    }

    /// `advance_turn` followed by `determine_next_state`.
    pub fn next_turn(&self, battle: &Battle) -> Battle {
        let mut next = self.advance_turn(battle);
        next.state = self.determine_next_state(&next);
        next
    }

    /// Advance past fallen entries until a living combatant is up (or the battle is over).
    pub fn advance_to_next_actor(&self, battle: &Battle) -> Battle {
        let mut next = battle.clone();
        for _ in 0..next.turn_order().len() {
            next = self.next_turn(&next);
            if next.state != BattleState::Animating {
                break;
            }
        }
        next
    }

    pub fn current_actor<'a>(&self, battle: &'a Battle) -> Option<&'a Combatant> {
        battle
            .current_actor_id()
            .and_then(|id| battle.combatant(id))
    }

    // --- Action dispatch ---

    /// Resolve one action against a snapshot.
    ///
    /// Rejections (unknown ability, not enough MP, cannot flee, fallen actor)
    /// return the input battle unchanged with an explanatory message.
    pub fn execute_action(
        &self,
        battle: &Battle,
        action: &BattleAction,
        rng: &mut dyn RandomSource,
    ) -> ActionResult {
        if battle.state.is_terminal() {
            return ActionResult::rejected(battle, "The battle is already over.");
        }

        let actor_id = action.actor();
        match battle.combatant(actor_id) {
            None => {
                return ActionResult::rejected(battle, format!("Unknown combatant: {}", actor_id))
            }
            Some(actor) if actor.is_fainted() => {
                return ActionResult::rejected(battle, format!("{} can't act!", actor.name))
            }
            Some(_) => {}
        }

        tracing::debug!(actor = %actor_id, ?action, turn = battle.turn_count, "executing action");

        match action {
            BattleAction::Attack { actor, target } => {
                self.execute_attack(battle, actor, target.as_ref(), rng)
            }
            BattleAction::Ability {
                actor,
                ability_id,
                target,
            } => self.execute_ability(battle, actor, ability_id, target.as_ref(), rng),
            BattleAction::Defend { actor } => self.execute_defend(battle, actor, rng),
            BattleAction::Flee { actor } => self.execute_flee(battle, actor, rng),
            BattleAction::Capture { actor, .. } => {
                let mut next = battle.clone();
                next.state = BattleState::CaptureAttempt;
                ActionResult::new(
                    next,
                    format!("{} readies a capture device!", battle.combatant_name(actor)),
                )
            }
            BattleAction::Item { actor, item_id, .. } => ActionResult::rejected(
                battle,
                format!("{} reaches for {}.", battle.combatant_name(actor), item_id),
            ),
        }
    }

    fn execute_attack(
        &self,
        battle: &Battle,
        actor_id: &CombatantId,
        target: Option<&CombatantId>,
        rng: &mut dyn RandomSource,
    ) -> ActionResult {
        let Some(target_id) =
            resolve_targets(battle, TargetType::SingleEnemy, target, actor_id, rng)
                .into_iter()
                .next()
        else {
            return ActionResult::rejected(battle, "There is no one to attack!");
        };

        let mut next = battle.clone();
        let mut events = EventBus::new();
        events.push(BattleEvent::ActionUsed {
            actor: actor_id.clone(),
            action: "Attack".to_string(),
        });

        let roll = match (battle.combatant(actor_id), battle.combatant(&target_id)) {
            (Some(attacker), Some(defender)) => calculate_damage(
                &DamageInput {
                    attack_stat: attacker.effective_attack(AbilityCategory::Physical),
                    ability_power: self.config.basic_attack_power,
                    defense_stat: defender.effective_defense(AbilityCategory::Physical),
                    attacker_element: Element::Neutral,
                    defender_element: defender.element(),
                    attacker_luck: attacker.stats.luck,
                },
                &self.config,
                rng,
            ),
            _ => return ActionResult::rejected(battle, "There is no one to attack!"),
        };

        if roll.is_critical {
            events.push(BattleEvent::CriticalHit {
                target: target_id.clone(),
            });
        }
        let dealt = apply_damage(&mut next, &target_id, roll.damage, &mut events);

        let mut message = format!(
            "{} attacks {}!",
            battle.combatant_name(actor_id),
            battle.combatant_name(&target_id)
        );
        if roll.is_critical {
            message.push_str(" A critical hit!");
        }
        message.push_str(&format!(" {} damage!", dealt));

        let mut result = ActionResult::new(next, message);
        result.damage = dealt;
        result.is_critical = roll.is_critical;
        result.events = events;
        self.end_turn(result, rng)
    }

    fn execute_defend(
        &self,
        battle: &Battle,
        actor_id: &CombatantId,
        rng: &mut dyn RandomSource,
    ) -> ActionResult {
        let mut next = battle.clone();
        let mut events = EventBus::new();
        let shield = StatusEffectData {
            kind: StatusEffectKind::Shield,
            duration: 1,
            magnitude: self.config.shield_defense_multiplier,
        };

        if let Some(actor) = next.combatant_mut(actor_id) {
            actor
                .status_effects
                .retain(|status| status.kind() != StatusEffectKind::Shield);
            actor
                .status_effects
                .push(ActiveStatusEffect::new(shield.clone(), actor_id.clone()));
        }
        events.push(BattleEvent::ActionUsed {
            actor: actor_id.clone(),
            action: "Defend".to_string(),
        });
        events.push(BattleEvent::StatusApplied {
            target: actor_id.clone(),
            kind: StatusEffectKind::Shield,
            duration: shield.duration,
        });

        let mut result = ActionResult::new(
            next,
            format!("{} takes a defensive stance!", battle.combatant_name(actor_id)),
        );
        result.status_applied = Some(StatusEffectKind::Shield);
        result.events = events;
        self.end_turn(result, rng)
    }

    fn execute_flee(
        &self,
        battle: &Battle,
        actor_id: &CombatantId,
        rng: &mut dyn RandomSource,
    ) -> ActionResult {
        if !battle.can_flee {
            return ActionResult::rejected(battle, "Can't escape from this battle!");
        }
        let Some(actor) = battle.combatant(actor_id) else {
            return ActionResult::rejected(battle, format!("Unknown combatant: {}", actor_id));
        };

        let opponents = battle.living(actor.side().opponent());
        let avg_enemy_speed = if opponents.is_empty() {
            0.0
        } else {
            opponents.iter().map(|c| c.effective_speed()).sum::<f64>() / opponents.len() as f64
        };
        let chance = calculate_flee_chance(actor.effective_speed(), avg_enemy_speed, &self.config);
        tracing::debug!(actor = %actor_id, chance, "flee attempt");

        let mut events = EventBus::new();
        if rng.chance(chance, "flee") {
            let mut next = battle.clone();
            next.state = BattleState::Fled;
            events.push(BattleEvent::Fled {
                actor: actor_id.clone(),
            });
            events.push(BattleEvent::BattleEnded {
                outcome: BattleState::Fled,
            });
            tracing::info!(actor = %actor_id, "party fled");

            let mut result = ActionResult::new(next, "Got away safely!");
            result.events = events;
            result
        } else {
            events.push(BattleEvent::FleeFailed {
                actor: actor_id.clone(),
            });
            let mut result = ActionResult::new(battle.clone(), "Couldn't escape!");
            result.events = events;
            self.end_turn(result, rng)
        }
    }

    /// Finish a turn-consuming action: advance the turn, work out the next
    /// state and attach rewards on victory.
    pub(crate) fn end_turn(
        &self,
        mut result: ActionResult,
        rng: &mut dyn RandomSource,
    ) -> ActionResult {
        let mut next = self.advance_turn(&result.battle);
        next.state = self.determine_next_state(&next);

        if next.state.is_terminal() {
            if next.state == BattleState::Victory {
                next.rewards = Some(self.calculate_battle_rewards(&next, rng));
            }
            result.events.push(BattleEvent::BattleEnded {
                outcome: next.state,
            });
            tracing::info!(outcome = ?next.state, turns = next.turn_count, "battle ended");
        }

        result.battle = next;
        result
    }
}

// --- Shared mutation helpers ---

/// Deal damage to a combatant in a working snapshot. Returns the HP actually lost.
pub(crate) fn apply_damage(
    battle: &mut Battle,
    target_id: &CombatantId,
    amount: u32,
    events: &mut EventBus,
) -> u32 {
    let Some(target) = battle.combatant_mut(target_id) else {
        return 0;
    };
    let dealt = target.stats.take_damage(amount);
    events.push(BattleEvent::DamageDealt {
        target: target_id.clone(),
        damage: dealt,
        remaining_hp: target.stats.current_hp,
    });
    if dealt > 0 && target.is_fainted() {
        events.push(BattleEvent::Defeated {
            combatant: target_id.clone(),
        });
    }
    dealt
}

/// Restore HP on a combatant in a working snapshot. Returns the HP actually restored.
pub(crate) fn apply_heal(
    battle: &mut Battle,
    target_id: &CombatantId,
    amount: u32,
    events: &mut EventBus,
) -> u32 {
    let Some(target) = battle.combatant_mut(target_id) else {
        return 0;
    };
    let healed = target.stats.heal(amount);
    events.push(BattleEvent::Healed {
        target: target_id.clone(),
        amount: healed,
        new_hp: target.stats.current_hp,
    });
    healed
}
