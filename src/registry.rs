//! Read-only reference data: abilities, species and items keyed by id.
//!
//! A `Registry` is built once (from RON files or from in-memory records) and then
//! only ever borrowed. Nothing in the engine reaches for global tables.

use crate::errors::{
    AbilityDataError, AbilityDataResult, BattleResult, DataLoadError, ItemDataError,
    SpeciesDataError, SpeciesDataResult,
};
use schema::{AbilityData, Item, MonsterSpecies};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const ABILITIES_FILE: &str = "abilities.ron";
pub const SPECIES_FILE: &str = "species.ron";
pub const ITEMS_FILE: &str = "items.ron";

#[derive(Debug, Clone, Default)]
pub struct Registry {
    abilities: HashMap<String, AbilityData>,
    species: HashMap<String, MonsterSpecies>,
    items: HashMap<String, Item>,
}

impl Registry {
    /// Build a registry from loaded records, rejecting duplicate ids and learnsets
    /// that reference unknown abilities.
    pub fn from_parts(
        abilities: Vec<AbilityData>,
        species: Vec<MonsterSpecies>,
        items: Vec<Item>,
    ) -> BattleResult<Self> {
        let mut registry = Registry::default();

        for ability in abilities {
            if registry.abilities.contains_key(&ability.id) {
                return Err(AbilityDataError::DuplicateAbility(ability.id).into());
            }
            registry.abilities.insert(ability.id.clone(), ability);
        }

        for monster in species {
            if registry.species.contains_key(&monster.id) {
                return Err(SpeciesDataError::DuplicateSpecies(monster.id).into());
            }
            if let Some(entry) = monster
                .learnset
                .iter()
                .find(|entry| !registry.abilities.contains_key(&entry.ability_id))
            {
                return Err(SpeciesDataError::UnknownLearnsetAbility {
                    species: monster.id.clone(),
                    ability: entry.ability_id.clone(),
                }
                .into());
            }
            registry.species.insert(monster.id.clone(), monster);
        }

        for item in items {
            if registry.items.contains_key(&item.id) {
                return Err(ItemDataError::DuplicateItem(item.id).into());
            }
            registry.items.insert(item.id.clone(), item);
        }

        tracing::debug!(
            abilities = registry.abilities.len(),
            species = registry.species.len(),
            items = registry.items.len(),
            "registry built"
        );

        Ok(registry)
    }

    /// Load `abilities.ron`, `species.ron` and `items.ron` from a data directory.
    /// Each file holds a RON list of records.
    pub fn load_from_dir(data_path: &Path) -> BattleResult<Self> {
        let abilities: Vec<AbilityData> = load_ron_list(&data_path.join(ABILITIES_FILE))?;
        let species: Vec<MonsterSpecies> = load_ron_list(&data_path.join(SPECIES_FILE))?;
        let items: Vec<Item> = load_ron_list(&data_path.join(ITEMS_FILE))?;

        Self::from_parts(abilities, species, items)
    }

    pub fn ability(&self, id: &str) -> AbilityDataResult<&AbilityData> {
        self.abilities
            .get(id)
            .ok_or_else(|| AbilityDataError::AbilityNotFound(id.to_string()))
    }

    pub fn species(&self, id: &str) -> SpeciesDataResult<&MonsterSpecies> {
        self.species
            .get(id)
            .ok_or_else(|| SpeciesDataError::SpeciesNotFound(id.to_string()))
    }

    pub fn item(&self, id: &str) -> Result<&Item, ItemDataError> {
        self.items
            .get(id)
            .ok_or_else(|| ItemDataError::ItemNotFound(id.to_string()))
    }

    /// All species, sorted by id for stable iteration.
    pub fn all_species(&self) -> Vec<&MonsterSpecies> {
        let mut species: Vec<&MonsterSpecies> = self.species.values().collect();
        species.sort_by(|a, b| a.id.cmp(&b.id));
        species
    }

    pub fn ability_count(&self) -> usize {
        self.abilities.len()
    }
}

fn load_ron_list<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, DataLoadError> {
    let content = fs::read_to_string(path)?;
    Ok(ron::from_str(&content)?)
}
