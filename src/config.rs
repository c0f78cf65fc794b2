//! Tunable combat constants.
//!
//! Every number the formulas and the engine depend on lives in `BattleConfig`.
//! The defaults below are the published values; a RON file can override any
//! subset of them (missing fields keep their default).

use crate::errors::DataLoadError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// Constants for damage calculation
pub const DAMAGE_VARIANCE_MIN: f64 = 0.85;
pub const DAMAGE_VARIANCE_MAX: f64 = 1.0;
pub const BASE_CRIT_RATE: f64 = 0.05;
pub const LUCK_CRIT_BONUS: f64 = 0.005;
pub const CRIT_MULTIPLIER: f64 = 1.5;
pub const DEFENSE_FACTOR: f64 = 0.5;
pub const BASIC_ATTACK_POWER: u32 = 40;

// Constants for status effects
pub const STATUS_PROC_CHANCE: f64 = 0.5;
pub const SHIELD_DEFENSE_MULTIPLIER: f64 = 1.5;
pub const POISON_PERCENT: f64 = 0.08;
pub const REGEN_PERCENT: f64 = 0.06;

// Constants for fleeing
pub const FLEE_BASE_CHANCE: f64 = 0.5;
pub const FLEE_SPEED_FACTOR: f64 = 0.01;
pub const FLEE_MIN: f64 = 0.10;
pub const FLEE_MAX: f64 = 0.95;

// Constants for capturing
pub const CAPTURE_MIN_RATE: f64 = 0.05;
pub const CAPTURE_MAX_RATE: f64 = 0.95;
pub const SLEEP_CAPTURE_BONUS: f64 = 1.5;

// Constants for targeting and enemy behavior
pub const MULTI_TARGET_MULTIPLIER: f64 = 0.75;
pub const ENEMY_HEAL_THRESHOLD: f64 = 0.30;
pub const ENEMY_ABILITY_CHANCE: f64 = 0.60;

// Constants for rewards
pub const REWARD_BASE_EXPERIENCE: u32 = 10;
pub const REWARD_BASE_GOLD: u32 = 5;
pub const REWARD_GOLD_BONUS_MAX: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub damage_variance_min: f64,
    pub damage_variance_max: f64,
    pub base_crit_rate: f64,
    pub luck_crit_bonus: f64,
    pub crit_multiplier: f64,
    pub defense_factor: f64,
    pub basic_attack_power: u32,
    pub status_proc_chance: f64,
    pub shield_defense_multiplier: f64,
    pub poison_percent: f64,
    pub regen_percent: f64,
    pub flee_base_chance: f64,
    pub flee_speed_factor: f64,
    pub flee_min: f64,
    pub flee_max: f64,
    pub capture_min_rate: f64,
    pub capture_max_rate: f64,
    pub sleep_capture_bonus: f64,
    pub multi_target_multiplier: f64,
    pub enemy_heal_threshold: f64,
    pub enemy_ability_chance: f64,
    pub reward_base_experience: u32,
    pub reward_base_gold: u32,
    pub reward_gold_bonus_max: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            damage_variance_min: DAMAGE_VARIANCE_MIN,
            damage_variance_max: DAMAGE_VARIANCE_MAX,
            base_crit_rate: BASE_CRIT_RATE,
            luck_crit_bonus: LUCK_CRIT_BONUS,
            crit_multiplier: CRIT_MULTIPLIER,
            defense_factor: DEFENSE_FACTOR,
            basic_attack_power: BASIC_ATTACK_POWER,
            status_proc_chance: STATUS_PROC_CHANCE,
            shield_defense_multiplier: SHIELD_DEFENSE_MULTIPLIER,
            poison_percent: POISON_PERCENT,
            regen_percent: REGEN_PERCENT,
            flee_base_chance: FLEE_BASE_CHANCE,
            flee_speed_factor: FLEE_SPEED_FACTOR,
            flee_min: FLEE_MIN,
            flee_max: FLEE_MAX,
            capture_min_rate: CAPTURE_MIN_RATE,
            capture_max_rate: CAPTURE_MAX_RATE,
            sleep_capture_bonus: SLEEP_CAPTURE_BONUS,
            multi_target_multiplier: MULTI_TARGET_MULTIPLIER,
            enemy_heal_threshold: ENEMY_HEAL_THRESHOLD,
            enemy_ability_chance: ENEMY_ABILITY_CHANCE,
            reward_base_experience: REWARD_BASE_EXPERIENCE,
            reward_base_gold: REWARD_BASE_GOLD,
            reward_gold_bonus_max: REWARD_GOLD_BONUS_MAX,
        }
    }
}

impl BattleConfig {
    /// Parse a config from RON text.
    pub fn from_ron_str(content: &str) -> Result<Self, DataLoadError> {
        Ok(ron::from_str(content)?)
    }

    /// Load a config from a RON file.
    pub fn load(path: &Path) -> Result<Self, DataLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }

    /// Load a config from a RON file, falling back to the defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, DataLoadError> {
        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "battle config not found, using default constants"
            );
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = BattleConfig::from_ron_str("(poison_percent: 0.125, flee_min: 0.2)").unwrap();

        assert_eq!(config.poison_percent, 0.125);
        assert_eq!(config.flee_min, 0.2);
        assert_eq!(config.crit_multiplier, CRIT_MULTIPLIER);
        assert_eq!(config.basic_attack_power, BASIC_ATTACK_POWER);
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let config = BattleConfig::load_or_default(Path::new("does/not/exist.ron")).unwrap();
        assert_eq!(config, BattleConfig::default());
    }

    #[test]
    fn test_bundled_config_matches_constants() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/battle_config.ron");
        assert_eq!(BattleConfig::load(&path).unwrap(), BattleConfig::default());
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        assert!(BattleConfig::from_ron_str("(poison_percent: \"lots\")").is_err());
    }
}
