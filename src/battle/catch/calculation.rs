use crate::combatant::Combatant;
use crate::config::BattleConfig;
use crate::errors::SpeciesDataResult;
use crate::formulas::calculate_capture_rate;
use crate::registry::Registry;
use crate::rng::RandomSource;
use schema::{Item, ItemEffect};
use serde::{Deserialize, Serialize};

/// A thrown capture device and its rate multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureDevice {
    pub item_id: String,
    pub name: String,
    pub multiplier: f64,
}

impl CaptureDevice {
    /// The device an item describes, or None if the item is not a capture device.
    pub fn from_item(item: &Item) -> Option<Self> {
        match item.effect {
            ItemEffect::CaptureDevice { multiplier } => Some(Self {
                item_id: item.id.clone(),
                name: item.name.clone(),
                multiplier,
            }),
            _ => None,
        }
    }
}

/// A named factor shown to the player. Display only; never folded back into the rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureModifier {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureAttempt {
    pub target: Combatant,
    pub device: CaptureDevice,
    /// `(1 - hp_ratio) * (1 - difficulty)`, before device, status and luck.
    pub base_rate: f64,
    pub modifiers: Vec<CaptureModifier>,
    pub final_rate: f64,
    pub succeeded: bool,
}

/// Species difficulty for a combatant, or 0.0 for combatants without a species.
pub fn capture_difficulty_for(target: &Combatant, registry: &Registry) -> SpeciesDataResult<f64> {
    match target.species_id.as_deref() {
        Some(species_id) => Ok(registry.species(species_id)?.capture_difficulty),
        None => Ok(0.0),
    }
}

fn status_bonus(target: &Combatant, config: &BattleConfig) -> f64 {
    if target.is_asleep() {
        config.sleep_capture_bonus
    } else {
        1.0
    }
}

/// Human-readable factors behind a capture rate, in display order.
pub fn capture_modifiers(
    target: &Combatant,
    device: &CaptureDevice,
    luck: u32,
    config: &BattleConfig,
) -> Vec<CaptureModifier> {
    let mut modifiers = Vec::new();

    let hp_ratio = target.stats.hp_ratio();
    if hp_ratio < 1.0 {
        modifiers.push(CaptureModifier {
            label: "Low HP".to_string(),
            value: 1.0 - hp_ratio,
        });
    }
    if target.is_asleep() {
        modifiers.push(CaptureModifier {
            label: "Asleep".to_string(),
            value: config.sleep_capture_bonus,
        });
    }
    if device.multiplier != 1.0 {
        modifiers.push(CaptureModifier {
            label: device.name.clone(),
            value: device.multiplier,
        });
    }
    if luck > 0 {
        modifiers.push(CaptureModifier {
            label: "Luck".to_string(),
            value: 1.0 + luck as f64 * 0.01,
        });
    }

    modifiers
}

/// Throw a device at a target.
///
/// `guarantee_success` skips the roll entirely; it exists for scripted encounters.
pub fn attempt_capture(
    target: &Combatant,
    device: &CaptureDevice,
    luck: u32,
    species_difficulty: f64,
    guarantee_success: bool,
    config: &BattleConfig,
    rng: &mut dyn RandomSource,
) -> CaptureAttempt {
    if guarantee_success {
        let mut attempt =
            attempt_capture_with_roll(target, device, luck, species_difficulty, 0.0, config);
        attempt.succeeded = true;
        return attempt;
    }
    let roll = rng.next_roll("capture roll");
    attempt_capture_with_roll(target, device, luck, species_difficulty, roll, config)
}

/// Deterministic capture attempt: succeeds exactly when `roll < final_rate`.
pub fn attempt_capture_with_roll(
    target: &Combatant,
    device: &CaptureDevice,
    luck: u32,
    species_difficulty: f64,
    roll: f64,
    config: &BattleConfig,
) -> CaptureAttempt {
    let hp_ratio = target.stats.hp_ratio();
    let final_rate = calculate_capture_rate(
        hp_ratio,
        species_difficulty,
        device.multiplier,
        status_bonus(target, config),
        luck,
        config,
    );

    CaptureAttempt {
        target: target.clone(),
        device: device.clone(),
        base_rate: (1.0 - hp_ratio.clamp(0.0, 1.0)) * (1.0 - species_difficulty.clamp(0.0, 1.0)),
        modifiers: capture_modifiers(target, device, luck, config),
        final_rate,
        succeeded: roll < final_rate,
    }
}

/// Shakes to show before the outcome: 3 on success, fewer the less likely it was.
pub fn calculate_shake_count(attempt: &CaptureAttempt) -> u8 {
    if attempt.succeeded {
        3
    } else if attempt.final_rate >= 0.7 {
        2
    } else if attempt.final_rate >= 0.4 {
        1
    } else {
        0
    }
}

/// Get a descriptive capture rate category for display purposes
pub fn capture_rate_description(rate: f64) -> &'static str {
    match rate {
        r if r >= 0.8 => "Excellent",
        r if r >= 0.6 => "Good",
        r if r >= 0.4 => "Fair",
        r if r >= 0.2 => "Poor",
        _ => "Very Poor",
    }
}
