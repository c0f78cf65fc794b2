use crate::combatant::CharacterStats;
use crate::errors::{AbilityDataResult, SpeciesDataError, SpeciesDataResult};
use crate::registry::Registry;
use schema::{AbilityData, MonsterSpecies};
use serde::{Deserialize, Serialize};

fn grown(base: u32, rate: f64, level: u32) -> u32 {
    base + (rate * (level - 1) as f64).floor() as u32
}

/// Full stat block for a species at `level`, with HP and MP topped up.
///
/// Each stat is `base + floor(growth * (level - 1))`, so level 1 is exactly the base stats.
pub fn stats_at_level(species: &MonsterSpecies, level: u32) -> SpeciesDataResult<CharacterStats> {
    if level == 0 {
        return Err(SpeciesDataError::InvalidLevel(level));
    }
    let base = &species.base_stats;
    let growth = &species.growth_rates;

    let max_hp = grown(base.hp, growth.hp, level);
    let max_mp = grown(base.mp, growth.mp, level);
    Ok(CharacterStats {
        max_hp,
        current_hp: max_hp,
        max_mp,
        current_mp: max_mp,
        attack: grown(base.attack, growth.attack, level),
        defense: grown(base.defense, growth.defense, level),
        magic_attack: grown(base.magic_attack, growth.magic_attack, level),
        magic_defense: grown(base.magic_defense, growth.magic_defense, level),
        speed: grown(base.speed, growth.speed, level),
        luck: grown(base.luck, growth.luck, level),
    })
}

/// Every ability a species knows by `level`, in learnset order without duplicates.
pub fn abilities_unlocked_at(
    species: &MonsterSpecies,
    level: u32,
    registry: &Registry,
) -> AbilityDataResult<Vec<AbilityData>> {
    let mut unlocked: Vec<AbilityData> = Vec::new();
    for entry in species.learnset.iter().filter(|entry| entry.level <= level) {
        if unlocked.iter().any(|known| known.id == entry.ability_id) {
            continue;
        }
        unlocked.push(registry.ability(&entry.ability_id)?.clone());
    }
    Ok(unlocked)
}

/// Ability ids picked up on reaching exactly `level`.
pub fn abilities_learned_at(species: &MonsterSpecies, level: u32) -> Vec<String> {
    species
        .learns_at_level(level)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Per-stat increase between two stat blocks (max values only).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatGains {
    pub hp: u32,
    pub mp: u32,
    pub attack: u32,
    pub defense: u32,
    pub magic_attack: u32,
    pub magic_defense: u32,
    pub speed: u32,
    pub luck: u32,
}

impl StatGains {
    pub fn between(old: &CharacterStats, new: &CharacterStats) -> Self {
        Self {
            hp: new.max_hp.saturating_sub(old.max_hp),
            mp: new.max_mp.saturating_sub(old.max_mp),
            attack: new.attack.saturating_sub(old.attack),
            defense: new.defense.saturating_sub(old.defense),
            magic_attack: new.magic_attack.saturating_sub(old.magic_attack),
            magic_defense: new.magic_defense.saturating_sub(old.magic_defense),
            speed: new.speed.saturating_sub(old.speed),
            luck: new.luck.saturating_sub(old.luck),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{ability, test_species};
    use pretty_assertions::assert_eq;
    use schema::{AbilityCategory, Element};

    fn registry() -> Registry {
        Registry::from_parts(
            vec![
                ability("tackle", Element::Neutral, AbilityCategory::Physical, 35),
                ability("ember", Element::Fire, AbilityCategory::Magical, 40),
                ability("flare", Element::Fire, AbilityCategory::Magical, 80),
            ],
            vec![],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn test_level_one_is_base_stats() {
        let species = test_species("pup", &[]);
        let stats = stats_at_level(&species, 1).unwrap();

        assert_eq!(stats.max_hp, 40);
        assert_eq!(stats.current_hp, 40);
        assert_eq!(stats.max_mp, 20);
        assert_eq!(stats.attack, 10);
        assert_eq!(stats.luck, 5);
    }

    #[test]
    fn test_fractional_growth_is_floored_once() {
        let species = test_species("pup", &[]);
        let stats = stats_at_level(&species, 4).unwrap();

        // hp 40 + 4*3, attack 10 + floor(1.5*3), speed 10 + floor(0.5*3), luck 5 + floor(0.75)
        assert_eq!(stats.max_hp, 52);
        assert_eq!(stats.attack, 14);
        assert_eq!(stats.speed, 11);
        assert_eq!(stats.luck, 5);
    }

    #[test]
    fn test_level_zero_is_invalid() {
        let species = test_species("pup", &[]);
        assert!(matches!(
            stats_at_level(&species, 0),
            Err(SpeciesDataError::InvalidLevel(0))
        ));
    }

    #[test]
    fn test_unlocked_abilities_follow_learnset() {
        let species = test_species(
            "pup",
            &[(1, "tackle"), (5, "ember"), (12, "flare"), (15, "ember")],
        );
        let registry = registry();

        let ids = |level| -> Vec<String> {
            abilities_unlocked_at(&species, level, &registry)
                .unwrap()
                .into_iter()
                .map(|a| a.id)
                .collect()
        };

        assert_eq!(ids(1), vec!["tackle"]);
        assert_eq!(ids(11), vec!["tackle", "ember"]);
        assert_eq!(ids(20), vec!["tackle", "ember", "flare"]);
        assert_eq!(abilities_learned_at(&species, 5), vec!["ember"]);
        assert!(abilities_learned_at(&species, 6).is_empty());
    }

    #[test]
    fn test_stat_gains_between_levels() {
        let species = test_species("pup", &[]);
        let old = stats_at_level(&species, 2).unwrap();
        let new = stats_at_level(&species, 3).unwrap();
        let gains = StatGains::between(&old, &new);

        assert_eq!(gains.hp, 4);
        assert_eq!(gains.mp, 2);
        // 1.5*1 -> 1, 1.5*2 -> 3
        assert_eq!(gains.attack, 2);
    }
}
