//! Builds battle-ready `Combatant`s from party members and species templates.

use crate::combatant::{Combatant, CombatantId};
use crate::errors::BattleResult;
use crate::progression::experience::PartyMember;
use crate::progression::growth::{abilities_unlocked_at, stats_at_level};
use crate::registry::Registry;
use schema::{AbilityData, MonsterSpecies};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FactoryOptions {
    /// Copy the species' declared element onto the combatant instead of
    /// inferring it from known abilities.
    pub use_declared_element: bool,
}

impl FactoryOptions {
    fn element_for(&self, species: &MonsterSpecies) -> Option<schema::Element> {
        if self.use_declared_element {
            species.element
        } else {
            None
        }
    }
}

/// A player-side combatant carrying the member's current HP/MP into battle.
/// Player monsters are never capturable.
pub fn create_combatant_from_player(
    member: &PartyMember,
    registry: &Registry,
    options: FactoryOptions,
) -> BattleResult<Combatant> {
    let species = registry.species(&member.species_id)?;
    let abilities = member
        .ability_ids
        .iter()
        .map(|id| registry.ability(id).cloned())
        .collect::<Result<Vec<AbilityData>, _>>()?;

    let mut stats = member.stats.clone();
    stats.clamp();

    Ok(Combatant {
        id: member.id.clone(),
        name: member.name.clone(),
        is_player: true,
        level: member.level,
        species_id: Some(species.id.clone()),
        stats,
        abilities,
        status_effects: Vec::new(),
        capturable: false,
        declared_element: options.element_for(species),
    })
}

/// A wild enemy at `level` with full HP/MP and its learnset up to that level.
///
/// Ids take the form `enemy_{slot}_{species_id}` so two of the same species stay distinct.
pub fn create_combatant_from_enemy(
    species_id: &str,
    level: u32,
    slot: usize,
    registry: &Registry,
    options: FactoryOptions,
) -> BattleResult<Combatant> {
    let species = registry.species(species_id)?;
    let stats = stats_at_level(species, level)?;
    let abilities = abilities_unlocked_at(species, level, registry)?;

    Ok(Combatant {
        id: CombatantId::new(format!("enemy_{}_{}", slot, species.id)),
        name: species.name.clone(),
        is_player: false,
        level,
        species_id: Some(species.id.clone()),
        stats,
        abilities,
        status_effects: Vec::new(),
        capturable: species.capturable,
        declared_element: options.element_for(species),
    })
}
