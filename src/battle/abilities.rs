use crate::battle::engine::{apply_damage, apply_heal, BattleEngine};
use crate::battle::state::{ActionResult, Battle, BattleEvent, EventBus};
use crate::battle::status::try_apply_status;
use crate::battle::targeting::{multi_target_damage_multiplier_with, resolve_targets};
use crate::combatant::CombatantId;
use crate::formulas::{calculate_damage, DamageInput, Effectiveness};
use crate::rng::RandomSource;
use schema::{AbilityCategory, AbilityData, TargetType};

impl BattleEngine {
    /// Use a known ability.
    ///
    /// An unknown ability or too little MP rejects the action with nothing spent.
    /// Once eligible the MP is spent, then accuracy is rolled; a miss still
    /// costs the MP and the turn.
    pub(crate) fn execute_ability(
        &self,
        battle: &Battle,
        actor_id: &CombatantId,
        ability_id: &str,
        target: Option<&CombatantId>,
        rng: &mut dyn RandomSource,
    ) -> ActionResult {
        let Some(actor) = battle.combatant(actor_id) else {
            return ActionResult::rejected(battle, format!("Unknown combatant: {}", actor_id));
        };
        let Some(ability) = actor.find_ability(ability_id).cloned() else {
            return ActionResult::rejected(
                battle,
                format!("{} doesn't know {}!", actor.name, ability_id),
            );
        };
        if actor.stats.current_mp < ability.mp_cost {
            return ActionResult::rejected(
                battle,
                format!("{} doesn't have enough MP!", actor.name),
            );
        }

        let mut next = battle.clone();
        let mut events = EventBus::new();
        if let Some(actor) = next.combatant_mut(actor_id) {
            actor.stats.spend_mp(ability.mp_cost);
        }
        if ability.mp_cost > 0 {
            events.push(BattleEvent::MpSpent {
                actor: actor_id.clone(),
                amount: ability.mp_cost,
            });
        }
        events.push(BattleEvent::ActionUsed {
            actor: actor_id.clone(),
            action: ability.name.clone(),
        });

        if ability.accuracy < 100 && !rng.chance(ability.accuracy as f64 / 100.0, "accuracy") {
            events.push(BattleEvent::Missed {
                actor: actor_id.clone(),
                action: ability.name.clone(),
            });
            let mut result = ActionResult::new(
                next,
                format!("{}'s {} missed!", battle.combatant_name(actor_id), ability.name),
            );
            result.events = events;
            return self.end_turn(result, rng);
        }

        let mut result = if ability.category == AbilityCategory::Healing {
            self.resolve_healing(next, actor_id, &ability, target, &mut events, rng)
        } else if ability.category == AbilityCategory::Status || ability.power == 0 {
            self.resolve_status_ability(next, actor_id, &ability, target, &mut events, rng)
        } else if ability.target_type.is_multi_target() {
            self.resolve_area_damage(next, actor_id, &ability, target, &mut events, rng)
        } else {
            self.resolve_single_damage(next, actor_id, &ability, target, &mut events, rng)
        };

        tracing::debug!(
            actor = %actor_id,
            ability = %ability.id,
            damage = result.damage,
            critical = result.is_critical,
            "ability resolved"
        );

        result.events = events;
        self.end_turn(result, rng)
    }

    fn resolve_healing(
        &self,
        mut next: Battle,
        actor_id: &CombatantId,
        ability: &AbilityData,
        target: Option<&CombatantId>,
        events: &mut EventBus,
        rng: &mut dyn RandomSource,
    ) -> ActionResult {
        let actor_name = next.combatant_name(actor_id);
        let targets = resolve_targets(&next, ability.target_type, target, actor_id, rng);
        if targets.is_empty() {
            return ActionResult::new(
                next,
                format!("{} used {}, but there was no one to heal!", actor_name, ability.name),
            );
        }

        let mut total = 0;
        for target_id in &targets {
            total += apply_heal(&mut next, target_id, ability.power, events);
        }

        let message = match targets.as_slice() {
            [only] => format!(
                "{} used {}! {} recovered {} HP!",
                actor_name,
                ability.name,
                next.combatant_name(only),
                total
            ),
            _ => format!(
                "{} used {}! The party recovered {} HP!",
                actor_name, ability.name, total
            ),
        };
        ActionResult::new(next, message)
    }

    fn resolve_status_ability(
        &self,
        mut next: Battle,
        actor_id: &CombatantId,
        ability: &AbilityData,
        target: Option<&CombatantId>,
        events: &mut EventBus,
        rng: &mut dyn RandomSource,
    ) -> ActionResult {
        let actor_name = next.combatant_name(actor_id);
        let Some(effect) = ability.status_effect.as_ref() else {
            return ActionResult::new(
                next,
                format!("{} used {}, but nothing happened.", actor_name, ability.name),
            );
        };

        let target_id = match ability.target_type {
            TargetType::SelfTarget => Some(actor_id.clone()),
            _ => target
                .filter(|id| next.combatant(id).is_some_and(|c| c.is_alive()))
                .cloned()
                .or_else(|| {
                    resolve_targets(&next, ability.target_type, None, actor_id, rng)
                        .into_iter()
                        .next()
                }),
        };
        let Some(target_id) = target_id else {
            return ActionResult::new(
                next,
                format!("{} used {}, but there was no target!", actor_name, ability.name),
            );
        };

        let target_name = next.combatant_name(&target_id);
        if try_apply_status(&mut next, &target_id, effect, actor_id, events) {
            let mut result = ActionResult::new(
                next,
                format!(
                    "{} used {}! {} is now affected by {}!",
                    actor_name, ability.name, target_name, effect.kind
                ),
            );
            result.status_applied = Some(effect.kind);
            result
        } else {
            ActionResult::new(
                next,
                format!("{} is already affected by {}!", target_name, effect.kind),
            )
        }
    }

    fn damage_input(
        &self,
        battle: &Battle,
        actor_id: &CombatantId,
        target_id: &CombatantId,
        ability: &AbilityData,
    ) -> Option<DamageInput> {
        let attacker = battle.combatant(actor_id)?;
        let defender = battle.combatant(target_id)?;
        Some(DamageInput {
            attack_stat: attacker.effective_attack(ability.category),
            ability_power: ability.power,
            defense_stat: defender.effective_defense(ability.category),
            attacker_element: ability.element,
            defender_element: defender.element(),
            attacker_luck: attacker.stats.luck,
        })
    }

    /// Multi-target damage: every target is rolled independently at the
    /// multi-target penalty. No attached status, no effectiveness report.
    fn resolve_area_damage(
        &self,
        mut next: Battle,
        actor_id: &CombatantId,
        ability: &AbilityData,
        target: Option<&CombatantId>,
        events: &mut EventBus,
        rng: &mut dyn RandomSource,
    ) -> ActionResult {
        let actor_name = next.combatant_name(actor_id);
        let targets: Vec<CombatantId> =
            resolve_targets(&next, ability.target_type, target, actor_id, rng)
                .into_iter()
                .filter(|id| next.combatant(id).is_some_and(|c| c.is_alive()))
                .collect();
        if targets.is_empty() {
            return ActionResult::new(
                next,
                format!("{} used {}, but there was no target!", actor_name, ability.name),
            );
        }

        let multiplier = multi_target_damage_multiplier_with(
            targets.len(),
            self.config().multi_target_multiplier,
        );
        let mut total = 0;
        let mut any_critical = false;

        for target_id in &targets {
            let Some(input) = self.damage_input(&next, actor_id, target_id, ability) else {
                continue;
            };
            let roll = calculate_damage(&input, self.config(), rng);
            let damage = ((roll.damage as f64 * multiplier).floor() as u32).max(1);
            if roll.is_critical {
                events.push(BattleEvent::CriticalHit {
                    target: target_id.clone(),
                });
            }
            total += apply_damage(&mut next, target_id, damage, events);
            any_critical |= roll.is_critical;
        }

        let mut message = format!("{} used {}!", actor_name, ability.name);
        if any_critical {
            message.push_str(" Critical hit!");
        }
        message.push_str(&format!(" {} total damage!", total));

        let mut result = ActionResult::new(next, message);
        result.damage = total;
        result.is_critical = any_critical;
        result
    }

    fn resolve_single_damage(
        &self,
        mut next: Battle,
        actor_id: &CombatantId,
        ability: &AbilityData,
        target: Option<&CombatantId>,
        events: &mut EventBus,
        rng: &mut dyn RandomSource,
    ) -> ActionResult {
        let actor_name = next.combatant_name(actor_id);
        let resolved = resolve_targets(&next, ability.target_type, target, actor_id, rng)
            .into_iter()
            .find(|id| next.combatant(id).is_some_and(|c| c.is_alive()))
            .and_then(|id| {
                self.damage_input(&next, actor_id, &id, ability)
                    .map(|input| (id, input))
            });
        let Some((target_id, input)) = resolved else {
            return ActionResult::new(
                next,
                format!("{} used {}, but there was no target!", actor_name, ability.name),
            );
        };
        let target_name = next.combatant_name(&target_id);

        let roll = calculate_damage(&input, self.config(), rng);
        if roll.is_critical {
            events.push(BattleEvent::CriticalHit {
                target: target_id.clone(),
            });
        }
        let dealt = apply_damage(&mut next, &target_id, roll.damage, events);
        let effectiveness = Effectiveness::classify(roll.element_multiplier);

        let mut status_applied = None;
        if let Some(effect) = ability.status_effect.as_ref() {
            let eligible = next
                .combatant(&target_id)
                .is_some_and(|c| c.is_alive() && !c.has_status(effect.kind));
            if eligible
                && rng.chance(self.config().status_proc_chance, "status proc")
                && try_apply_status(&mut next, &target_id, effect, actor_id, events)
            {
                status_applied = Some(effect.kind);
            }
        }

        let mut message = format!("{} used {}!", actor_name, ability.name);
        match effectiveness {
            Effectiveness::Super => message.push_str(" It's super effective!"),
            Effectiveness::Weak => message.push_str(" It's not very effective..."),
            Effectiveness::Normal => {}
        }
        if roll.is_critical {
            message.push_str(" Critical hit!");
        }
        message.push_str(&format!(" {} took {} damage!", target_name, dealt));
        if let Some(kind) = status_applied {
            message.push_str(&format!(" {} is now affected by {}!", target_name, kind));
        }

        let mut result = ActionResult::new(next, message);
        result.damage = dealt;
        result.is_critical = roll.is_critical;
        result.effectiveness = Some(effectiveness);
        result.status_applied = status_applied;
        result
    }
}
