use crate::battle::engine::{apply_heal, BattleEngine};
use crate::battle::state::{ActionResult, Battle, BattleEvent, EventBus};
use crate::battle::status::try_apply_status;
use crate::combatant::CombatantId;
use crate::rng::RandomSource;
use schema::{Item, ItemEffect};

impl BattleEngine {
    /// Apply a consumable item and end the actor's turn.
    ///
    /// Inventory counts belong to the caller; the engine only reads the item
    /// record. `target_id` defaults to the actor. Capture devices are thrown
    /// through the capture flow, not used here.
    pub fn use_item(
        &self,
        battle: &Battle,
        actor_id: &CombatantId,
        target_id: Option<&CombatantId>,
        item: &Item,
        rng: &mut dyn RandomSource,
    ) -> ActionResult {
        if battle.state.is_terminal() {
            return ActionResult::rejected(battle, "The battle is already over.");
        }
        if !battle.combatant(actor_id).is_some_and(|actor| actor.is_alive()) {
            return ActionResult::rejected(
                battle,
                format!("{} can't act!", battle.combatant_name(actor_id)),
            );
        }
        if item.is_capture_device() {
            return ActionResult::rejected(
                battle,
                format!("{} can only be thrown at a wild monster!", item.name),
            );
        }

        let target_id = target_id.unwrap_or(actor_id).clone();
        let Some(target) = battle.combatant(&target_id).filter(|c| c.is_alive()) else {
            return ActionResult::rejected(battle, format!("{} has no valid target!", item.name));
        };
        let target_name = target.name.clone();

        let mut next = battle.clone();
        let mut events = EventBus::new();
        events.push(BattleEvent::ActionUsed {
            actor: actor_id.clone(),
            action: item.name.clone(),
        });

        let mut result = match &item.effect {
            ItemEffect::Heal { amount } => {
                let healed = apply_heal(&mut next, &target_id, *amount, &mut events);
                ActionResult::new(next, format!("{} recovered {} HP!", target_name, healed))
            }
            ItemEffect::RestoreMp { amount } => {
                let restored = next
                    .combatant_mut(&target_id)
                    .map(|c| c.stats.restore_mp(*amount))
                    .unwrap_or(0);
                ActionResult::new(next, format!("{} recovered {} MP!", target_name, restored))
            }
            ItemEffect::Cure => {
                let mut cured = Vec::new();
                if let Some(target) = next.combatant_mut(&target_id) {
                    target.status_effects.retain(|status| {
                        if status.kind().is_harmful() {
                            cured.push(status.kind());
                            false
                        } else {
                            true
                        }
                    });
                }
                for kind in &cured {
                    events.push(BattleEvent::StatusExpired {
                        target: target_id.clone(),
                        kind: *kind,
                    });
                }
                let message = if cured.is_empty() {
                    format!("It had no effect on {}.", target_name)
                } else {
                    format!("{} was cured!", target_name)
                };
                ActionResult::new(next, message)
            }
            ItemEffect::Buff { effect } => {
                if try_apply_status(&mut next, &target_id, effect, actor_id, &mut events) {
                    let mut applied = ActionResult::new(
                        next,
                        format!("{} is now affected by {}!", target_name, effect.kind),
                    );
                    applied.status_applied = Some(effect.kind);
                    applied
                } else {
                    ActionResult::new(
                        next,
                        format!("{} is already affected by {}!", target_name, effect.kind),
                    )
                }
            }
            ItemEffect::CaptureDevice { .. } => {
                return ActionResult::rejected(
                    battle,
                    format!("{} can only be thrown at a wild monster!", item.name),
                )
            }
        };

        tracing::debug!(actor = %actor_id, item = %item.id, target = %target_id, "item used");
        result.events = events;
        self.end_turn(result, rng)
    }
}
