use crate::Element;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum AbilityCategory {
    Physical,
    Magical,
    Healing,
    Status,
}

impl AbilityCategory {
    /// Physical and magical abilities are the only ones that go through the damage formula.
    pub fn is_damaging(self) -> bool {
        matches!(self, AbilityCategory::Physical | AbilityCategory::Magical)
    }
}

/// The rule deciding which combatants an action affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetType {
    SingleEnemy,
    SingleAlly,
    AllEnemies,
    AllAllies,
    SelfTarget,
    AdjacentEnemies,
    /// `N` distinct living enemies picked at random.
    RandomEnemies(u8),
}

impl TargetType {
    /// True for policies that hit more than one combatant.
    pub fn is_multi_target(self) -> bool {
        matches!(
            self,
            TargetType::AllEnemies
                | TargetType::AllAllies
                | TargetType::AdjacentEnemies
                | TargetType::RandomEnemies(_)
        )
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::SingleEnemy => write!(f, "single_enemy"),
            TargetType::SingleAlly => write!(f, "single_ally"),
            TargetType::AllEnemies => write!(f, "all_enemies"),
            TargetType::AllAllies => write!(f, "all_allies"),
            TargetType::SelfTarget => write!(f, "self"),
            TargetType::AdjacentEnemies => write!(f, "adjacent_enemies"),
            TargetType::RandomEnemies(count) => write!(f, "random_enemies_{}", count),
        }
    }
}

impl FromStr for TargetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single_enemy" => Ok(TargetType::SingleEnemy),
            "single_ally" => Ok(TargetType::SingleAlly),
            "all_enemies" => Ok(TargetType::AllEnemies),
            "all_allies" => Ok(TargetType::AllAllies),
            "self" => Ok(TargetType::SelfTarget),
            "adjacent_enemies" => Ok(TargetType::AdjacentEnemies),
            other => other
                .strip_prefix("random_enemies_")
                .and_then(|count| count.parse::<u8>().ok())
                .map(TargetType::RandomEnemies)
                .ok_or_else(|| format!("Unknown target type: {}", other)),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum StatusEffectKind {
    Poison,
    Regen,
    Sleep,
    Shield,
    AttackUp,
    DefenseUp,
    Slow,
    Haste,
}

impl StatusEffectKind {
    /// Statuses that a cure removes.
    pub fn is_harmful(self) -> bool {
        matches!(
            self,
            StatusEffectKind::Poison | StatusEffectKind::Sleep | StatusEffectKind::Slow
        )
    }
}

/// A timed modifier definition. `magnitude` is the stat multiplier for
/// buffs/debuffs and is ignored by poison, regen and sleep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffectData {
    pub kind: StatusEffectKind,
    pub duration: u8,
    pub magnitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityData {
    pub id: String,
    pub name: String,
    pub description: String,
    pub element: Element,
    pub category: AbilityCategory,
    pub power: u32,
    /// Hit chance in percent (0-100).
    pub accuracy: u8,
    pub mp_cost: u32,
    pub target_type: TargetType,
    pub status_effect: Option<StatusEffectData>,
    pub cooldown: u8,
}

impl AbilityData {
    pub fn is_damaging(&self) -> bool {
        self.category.is_damaging() && self.power > 0
    }
}
