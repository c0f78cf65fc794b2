use crate::battle::engine::BattleEngine;
use crate::battle::state::Battle;
use crate::combatant::{ActiveStatusEffect, CharacterStats, Combatant, CombatantId};
use crate::config::BattleConfig;
use crate::rng::ScriptedRng;
use schema::{
    AbilityCategory, AbilityData, BaseStats, Element, GrowthRates, LearnsetEntry, MonsterSpecies,
    StatusEffectData, StatusEffectKind, TargetType,
};

/// A builder for creating test combatants with common defaults.
///
/// Defaults: player side, level 5, 100/100 HP, 50/50 MP, 20 attack and magic
/// attack, 10 defense and magic defense, 10 speed, no luck, capturable.
///
/// # Example
/// ```ignore
/// let mage = TestCombatantBuilder::new("mage")
///     .with_mp(5, 30)
///     .with_ability(ability("ember", Element::Fire, AbilityCategory::Magical, 40))
///     .build();
/// ```
pub struct TestCombatantBuilder {
    combatant: Combatant,
    statuses: Vec<StatusEffectData>,
}

impl TestCombatantBuilder {
    /// Creates a new builder. The display name is the id with its first letter capitalized.
    pub fn new(id: &str) -> Self {
        let mut name = id.to_string();
        if let Some(first) = name.get_mut(0..1) {
            first.make_ascii_uppercase();
        }

        Self {
            combatant: Combatant {
                id: CombatantId::from(id),
                name,
                is_player: true,
                level: 5,
                species_id: None,
                stats: CharacterStats {
                    max_hp: 100,
                    current_hp: 100,
                    max_mp: 50,
                    current_mp: 50,
                    attack: 20,
                    defense: 10,
                    magic_attack: 20,
                    magic_defense: 10,
                    speed: 10,
                    luck: 0,
                },
                abilities: Vec::new(),
                status_effects: Vec::new(),
                capturable: true,
                declared_element: None,
            },
            statuses: Vec::new(),
        }
    }

    pub fn enemy(mut self) -> Self {
        self.combatant.is_player = false;
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.combatant.name = name.to_string();
        self
    }

    pub fn with_species(mut self, species_id: &str) -> Self {
        self.combatant.species_id = Some(species_id.to_string());
        self
    }

    pub fn with_hp(mut self, current: u32, max: u32) -> Self {
        self.combatant.stats.current_hp = current;
        self.combatant.stats.max_hp = max;
        self
    }

    pub fn with_mp(mut self, current: u32, max: u32) -> Self {
        self.combatant.stats.current_mp = current;
        self.combatant.stats.max_mp = max;
        self
    }

    pub fn with_attack(mut self, attack: u32) -> Self {
        self.combatant.stats.attack = attack;
        self
    }

    pub fn with_defense(mut self, defense: u32) -> Self {
        self.combatant.stats.defense = defense;
        self
    }

    pub fn with_magic(mut self, magic_attack: u32, magic_defense: u32) -> Self {
        self.combatant.stats.magic_attack = magic_attack;
        self.combatant.stats.magic_defense = magic_defense;
        self
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        self.combatant.stats.speed = speed;
        self
    }

    pub fn with_luck(mut self, luck: u32) -> Self {
        self.combatant.stats.luck = luck;
        self
    }

    pub fn with_abilities(mut self, abilities: Vec<AbilityData>) -> Self {
        self.combatant.abilities = abilities;
        self
    }

    pub fn with_ability(mut self, ability: AbilityData) -> Self {
        self.combatant.abilities.push(ability);
        self
    }

    /// Adds a status with its full duration remaining.
    pub fn with_status(mut self, effect: StatusEffectData) -> Self {
        self.statuses.push(effect);
        self
    }

    pub fn not_capturable(mut self) -> Self {
        self.combatant.capturable = false;
        self
    }

    pub fn build(self) -> Combatant {
        let mut combatant = self.combatant;
        let applied_by = combatant.id.clone();
        combatant.status_effects = self
            .statuses
            .into_iter()
            .map(|effect| ActiveStatusEffect::new(effect, applied_by.clone()))
            .collect();
        combatant
    }
}

/// A 100% accurate, free, single-target ability with no attached status.
pub fn ability(id: &str, element: Element, category: AbilityCategory, power: u32) -> AbilityData {
    AbilityData {
        id: id.to_string(),
        name: id.to_string(),
        description: String::new(),
        element,
        category,
        power,
        accuracy: 100,
        mp_cost: 0,
        target_type: TargetType::SingleEnemy,
        status_effect: None,
        cooldown: 0,
    }
}

pub fn status_effect(kind: StatusEffectKind, duration: u8, magnitude: f64) -> StatusEffectData {
    StatusEffectData {
        kind,
        duration,
        magnitude,
    }
}

/// A plain species with flat base stats, unit growth and the given learnset.
pub fn test_species(id: &str, learnset: &[(u32, &str)]) -> MonsterSpecies {
    MonsterSpecies {
        id: id.to_string(),
        name: id.to_string(),
        description: String::new(),
        element: None,
        base_stats: BaseStats {
            hp: 40,
            mp: 20,
            attack: 10,
            defense: 10,
            magic_attack: 10,
            magic_defense: 10,
            speed: 10,
            luck: 5,
        },
        growth_rates: GrowthRates {
            hp: 4.0,
            mp: 2.0,
            attack: 1.5,
            defense: 1.0,
            magic_attack: 1.5,
            magic_defense: 1.0,
            speed: 0.5,
            luck: 0.25,
        },
        learnset: learnset
            .iter()
            .map(|(level, ability_id)| LearnsetEntry {
                level: *level,
                ability_id: ability_id.to_string(),
            })
            .collect(),
        capture_difficulty: 0.3,
        base_experience: 50,
        capturable: true,
    }
}

pub fn test_engine() -> BattleEngine {
    BattleEngine::new(BattleConfig::default())
}

/// Creates a started battle. Speed ties keep input order (players first).
pub fn create_test_battle(players: Vec<Combatant>, enemies: Vec<Combatant>) -> Battle {
    let engine = test_engine();
    let mut rng = ScriptedRng::new_for_test(vec![0.5; players.len() + enemies.len()]);
    let battle = engine.create_battle(players, enemies, true, &mut rng);
    engine.start(&battle)
}

/// Creates a `ScriptedRng` with a long list of middling rolls (0.5).
/// Useful for tests where the specific outcome is not important, preventing panics from exhaustion.
pub fn predictable_rng() -> ScriptedRng {
    ScriptedRng::new_for_test(vec![0.5; 100])
}
