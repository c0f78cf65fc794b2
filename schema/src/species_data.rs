use crate::Element;
use serde::{Deserialize, Serialize};

/// Stats at level 1, before any growth is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u32,
    pub mp: u32,
    pub attack: u32,
    pub defense: u32,
    pub magic_attack: u32,
    pub magic_defense: u32,
    pub speed: u32,
    pub luck: u32,
}

/// Per-level stat gains. Fractional rates accumulate and are floored once per stat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRates {
    pub hp: f64,
    pub mp: f64,
    pub attack: f64,
    pub defense: f64,
    pub magic_attack: f64,
    pub magic_defense: f64,
    pub speed: f64,
    pub luck: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnsetEntry {
    pub level: u32,
    pub ability_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterSpecies {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Explicit element. Combatants only use it when asked to; otherwise
    /// their element is inferred from their known abilities.
    pub element: Option<Element>,
    pub base_stats: BaseStats,
    pub growth_rates: GrowthRates,
    pub learnset: Vec<LearnsetEntry>, // ordered by level
    /// 0.0 = trivially easy to capture, 1.0 = impossible before clamping.
    pub capture_difficulty: f64,
    pub base_experience: u32,
    pub capturable: bool,
}

impl MonsterSpecies {
    /// Ability ids learned at exactly `level`, in learnset order.
    pub fn learns_at_level(&self, level: u32) -> Vec<&str> {
        self.learnset
            .iter()
            .filter(|entry| entry.level == level)
            .map(|entry| entry.ability_id.as_str())
            .collect()
    }

    pub fn can_learn(&self, ability_id: &str) -> bool {
        self.learnset
            .iter()
            .any(|entry| entry.ability_id == ability_id)
    }
}
