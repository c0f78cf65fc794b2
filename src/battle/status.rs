use crate::battle::engine::{apply_damage, apply_heal, BattleEngine};
use crate::battle::state::{Battle, BattleEvent, EventBus};
use crate::combatant::{ActiveStatusEffect, CombatantId};
use schema::{StatusEffectData, StatusEffectKind};

/// Result of a start-of-turn status tick.
#[derive(Debug, Clone)]
pub struct StatusTickResult {
    pub battle: Battle,
    pub poison_damage: u32,
    pub regen_healed: u32,
    pub expired: Vec<StatusEffectKind>,
    pub events: EventBus,
}

/// Attach a status unless the target already carries one of the same kind.
/// Returns true when the status was applied.
pub(crate) fn try_apply_status(
    battle: &mut Battle,
    target_id: &CombatantId,
    effect: &StatusEffectData,
    applied_by: &CombatantId,
    events: &mut EventBus,
) -> bool {
    let Some(target) = battle.combatant_mut(target_id) else {
        return false;
    };
    if target.has_status(effect.kind) {
        events.push(BattleEvent::StatusRejected {
            target: target_id.clone(),
            kind: effect.kind,
        });
        return false;
    }
    target
        .status_effects
        .push(ActiveStatusEffect::new(effect.clone(), applied_by.clone()));
    events.push(BattleEvent::StatusApplied {
        target: target_id.clone(),
        kind: effect.kind,
        duration: effect.duration,
    });
    true
}

impl BattleEngine {
    /// Tick one combatant's statuses at the start of its turn.
    ///
    /// Poison and regen fire first, then every status loses a turn and any that
    /// reach zero are removed, so a status still fires on its final turn.
    pub fn process_status_effects(
        &self,
        battle: &Battle,
        combatant_id: &CombatantId,
    ) -> StatusTickResult {
        let mut next = battle.clone();
        let mut events = EventBus::new();
        let mut poison_damage = 0;
        let mut regen_healed = 0;
        let mut expired = Vec::new();

        let Some(combatant) = battle.combatant(combatant_id).filter(|c| c.is_alive()) else {
            return StatusTickResult {
                battle: next,
                poison_damage,
                regen_healed,
                expired,
                events,
            };
        };
        let max_hp = combatant.stats.max_hp as f64;

        if combatant.has_status(StatusEffectKind::Poison) {
            let amount = ((max_hp * self.config().poison_percent).floor() as u32).max(1);
            events.push(BattleEvent::StatusTick {
                target: combatant_id.clone(),
                kind: StatusEffectKind::Poison,
                amount,
            });
            poison_damage = apply_damage(&mut next, combatant_id, amount, &mut events);
        }

        let still_alive = next.combatant(combatant_id).is_some_and(|c| c.is_alive());
        if still_alive && combatant.has_status(StatusEffectKind::Regen) {
            let amount = ((max_hp * self.config().regen_percent).floor() as u32).max(1);
            events.push(BattleEvent::StatusTick {
                target: combatant_id.clone(),
                kind: StatusEffectKind::Regen,
                amount,
            });
            regen_healed = apply_heal(&mut next, combatant_id, amount, &mut events);
        }

        if let Some(target) = next.combatant_mut(combatant_id) {
            for status in target.status_effects.iter_mut() {
                status.turns_remaining = status.turns_remaining.saturating_sub(1);
            }
            target.status_effects.retain(|status| {
                if status.turns_remaining == 0 {
                    expired.push(status.kind());
                    false
                } else {
                    true
                }
            });
        }
        for kind in &expired {
            events.push(BattleEvent::StatusExpired {
                target: combatant_id.clone(),
                kind: *kind,
            });
        }

        tracing::debug!(
            combatant = %combatant_id,
            poison_damage,
            regen_healed,
            expired = expired.len(),
            "status effects processed"
        );

        StatusTickResult {
            battle: next,
            poison_damage,
            regen_healed,
            expired,
            events,
        }
    }
}
