use crate::battle::catch::{calculate_shake_count, can_attempt_capture, CaptureAttempt};
use crate::battle::engine::BattleEngine;
use crate::battle::state::{ActionResult, Battle, BattleEvent, BattleState, EventBus};
use crate::rng::RandomSource;

impl BattleEngine {
    /// Apply a finished capture attempt to the battle.
    ///
    /// Success takes the target out of the enemy squad, records it in the
    /// rewards and ends the battle in victory. Failure costs the thrower's turn.
    pub fn resolve_capture(
        &self,
        battle: &Battle,
        attempt: &CaptureAttempt,
        rng: &mut dyn RandomSource,
    ) -> ActionResult {
        let target_id = attempt.target.id.clone();
        if let Err(error) = can_attempt_capture(battle, &target_id) {
            return ActionResult::rejected(battle, format!("Capture not possible: {:?}", error));
        }

        let thrower = battle.current_actor_id().cloned().unwrap_or_else(|| target_id.clone());
        let shakes = calculate_shake_count(attempt);
        let target_name = battle.combatant_name(&target_id);

        let mut events = EventBus::new();
        events.push(BattleEvent::CaptureThrown {
            actor: thrower,
            target: target_id.clone(),
            device: attempt.device.name.clone(),
            rate: attempt.final_rate,
        });
        events.push(BattleEvent::CaptureResolved {
            target: target_id.clone(),
            succeeded: attempt.succeeded,
            shakes,
        });

        tracing::info!(
            target = %target_id,
            rate = attempt.final_rate,
            succeeded = attempt.succeeded,
            "capture resolved"
        );

        if !attempt.succeeded {
            let mut result =
                ActionResult::new(battle.clone(), format!("{} broke free!", target_name));
            result.events = events;
            return self.end_turn(result, rng);
        }

        let mut next = battle.clone();
        let mut rewards = self.calculate_battle_rewards(&next, rng);
        if let Some(captured) = next.remove_combatant(&target_id) {
            rewards.captured.push(captured);
        }
        next.rewards = Some(rewards);
        next.state = BattleState::Victory;
        events.push(BattleEvent::BattleEnded {
            outcome: BattleState::Victory,
        });

        let mut result = ActionResult::new(next, format!("Gotcha! {} was captured!", target_name));
        result.events = events;
        result
    }
}
