use crate::battle::state::{Battle, BattleState};
use crate::combatant::{Combatant, CombatantId, Side};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CaptureError {
    /// Captures happen on a player's turn (or right after choosing to capture)
    InvalidBattleState { state: BattleState },
    /// No combatant with that id in this battle
    TargetNotFound { target: CombatantId },
    /// Only enemies can be captured
    TargetIsAlly { target: CombatantId },
    /// Target has already fallen
    TargetFainted { target: CombatantId },
    /// Bosses and story enemies cannot be captured
    NotCapturable { target: CombatantId },
}

/// Validate a capture attempt and return the target if it is legal.
pub fn can_attempt_capture<'a>(
    battle: &'a Battle,
    target_id: &CombatantId,
) -> Result<&'a Combatant, CaptureError> {
    if !matches!(
        battle.state,
        BattleState::PlayerTurn | BattleState::CaptureAttempt
    ) {
        return Err(CaptureError::InvalidBattleState {
            state: battle.state,
        });
    }

    let target = battle
        .combatant(target_id)
        .ok_or_else(|| CaptureError::TargetNotFound {
            target: target_id.clone(),
        })?;

    if target.side() != Side::Enemy {
        return Err(CaptureError::TargetIsAlly {
            target: target_id.clone(),
        });
    }
    if target.is_fainted() {
        return Err(CaptureError::TargetFainted {
            target: target_id.clone(),
        });
    }
    if !target.capturable {
        return Err(CaptureError::NotCapturable {
            target: target_id.clone(),
        });
    }

    Ok(target)
}
