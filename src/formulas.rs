//! Pure numeric combat formulas. No state; randomness comes in through the
//! `RandomSource` argument.

use crate::config::BattleConfig;
use crate::errors::{FormulaError, FormulaResult};
use crate::rng::RandomSource;
use schema::Element;
use serde::{Deserialize, Serialize};

/// Inputs to a single damage roll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageInput {
    pub attack_stat: u32,
    pub ability_power: u32,
    pub defense_stat: u32,
    pub attacker_element: Element,
    pub defender_element: Element,
    pub attacker_luck: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRoll {
    pub damage: u32,
    pub is_critical: bool,
    /// The element multiplier that went into the roll.
    pub element_multiplier: f64,
}

/// Flavor classification of an element multiplier, for messages and UI only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Effectiveness {
    Super,
    #[default]
    Normal,
    Weak,
}

impl Effectiveness {
    pub fn classify(multiplier: f64) -> Self {
        if multiplier > 1.5 {
            Effectiveness::Super
        } else if multiplier < 0.75 {
            Effectiveness::Weak
        } else {
            Effectiveness::Normal
        }
    }
}

pub fn element_multiplier(attacking: Element, defending: Element) -> f64 {
    Element::effectiveness(attacking, defending)
}

/// Calculate damage for one hit.
///
/// Formula: `attack * power / max(defense * defense_factor, 1)`, then
/// × element multiplier × uniform variance × (crit multiplier on a crit).
/// Crit chance is `base_crit_rate + luck * luck_crit_bonus`.
/// The result is floored and never below 1.
pub fn calculate_damage(
    input: &DamageInput,
    config: &BattleConfig,
    rng: &mut dyn RandomSource,
) -> DamageRoll {
    let effective_defense = (input.defense_stat as f64 * config.defense_factor).max(1.0);
    let base = input.attack_stat as f64 * input.ability_power as f64 / effective_defense;

    let element_multiplier = element_multiplier(input.attacker_element, input.defender_element);

    let variance = rng.range_f64(
        config.damage_variance_min,
        config.damage_variance_max,
        "damage variance",
    );

    let crit_chance = config.base_crit_rate + input.attacker_luck as f64 * config.luck_crit_bonus;
    let is_critical = rng.chance(crit_chance, "critical hit");
    let crit_multiplier = if is_critical {
        config.crit_multiplier
    } else {
        1.0
    };

    let damage = (base * element_multiplier * variance * crit_multiplier).floor();

    DamageRoll {
        damage: (damage as u32).max(1),
        is_critical,
        element_multiplier,
    }
}

/// Chance to escape, linear in the speed difference and clamped to `[flee_min, flee_max]`.
pub fn calculate_flee_chance(actor_speed: f64, avg_enemy_speed: f64, config: &BattleConfig) -> f64 {
    let chance =
        config.flee_base_chance + (actor_speed - avg_enemy_speed) * config.flee_speed_factor;
    chance.clamp(config.flee_min, config.flee_max)
}

/// Capture success probability:
/// `(1 - hp_ratio) * (1 - difficulty) * device * status_bonus * (1 + luck * 0.01)`,
/// clamped to `[capture_min_rate, capture_max_rate]` so no attempt is ever certain or hopeless.
pub fn calculate_capture_rate(
    hp_ratio: f64,
    species_difficulty: f64,
    device_multiplier: f64,
    status_bonus: f64,
    luck: u32,
    config: &BattleConfig,
) -> f64 {
    let hp_factor = 1.0 - hp_ratio.clamp(0.0, 1.0);
    let difficulty_factor = 1.0 - species_difficulty.clamp(0.0, 1.0);
    let luck_factor = 1.0 + luck as f64 * 0.01;

    let rate = hp_factor * difficulty_factor * device_multiplier * status_bonus * luck_factor;
    rate.clamp(config.capture_min_rate, config.capture_max_rate)
}

/// Pick one item with probability proportional to its weight (single cumulative pass).
///
/// Empty input, mismatched lengths or a non-positive total are setup bugs and fail fast.
pub fn weighted_random<'a, T>(
    items: &'a [T],
    weights: &[f64],
    rng: &mut dyn RandomSource,
) -> FormulaResult<&'a T> {
    if items.is_empty() {
        return Err(FormulaError::EmptyInput);
    }
    if items.len() != weights.len() {
        return Err(FormulaError::LengthMismatch {
            items: items.len(),
            weights: weights.len(),
        });
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 || total.is_nan() {
        return Err(FormulaError::NonPositiveTotalWeight(total));
    }

    let roll = rng.next_roll("weighted pick") * total;
    let mut cumulative = 0.0;
    for (item, weight) in items.iter().zip(weights) {
        cumulative += weight;
        if roll < cumulative {
            return Ok(item);
        }
    }

    // Floating point drift can leave the roll a hair above the final sum.
    Ok(&items[items.len() - 1])
}
