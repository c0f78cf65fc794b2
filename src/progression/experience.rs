use crate::combatant::{CharacterStats, Combatant, CombatantId};
use crate::errors::SpeciesDataResult;
use crate::progression::growth::{abilities_learned_at, stats_at_level, StatGains};
use schema::MonsterSpecies;
use serde::{Deserialize, Serialize};

pub const MAX_LEVEL: u32 = 100;

/// Cumulative experience needed to stand at `level`. Cubic curve; level 1 starts at 0.
pub fn total_experience_for_level(level: u32) -> u64 {
    if level <= 1 {
        0
    } else {
        (level.min(MAX_LEVEL) as u64).pow(3)
    }
}

/// Experience still missing before the next level. Zero at the cap.
pub fn experience_to_next_level(level: u32, experience: u64) -> u64 {
    if level >= MAX_LEVEL {
        return 0;
    }
    total_experience_for_level(level + 1).saturating_sub(experience)
}

/// What changed during one `gain_experience` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpReport {
    pub old_level: u32,
    pub new_level: u32,
    pub stat_gains: StatGains,
    pub new_abilities: Vec<String>,
}

impl LevelUpReport {
    pub fn leveled_up(&self) -> bool {
        self.new_level > self.old_level
    }
}

/// A monster owned by the player, persisted between battles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyMember {
    pub id: CombatantId,
    pub name: String,
    pub species_id: String,
    pub level: u32,
    pub experience: u64,
    pub stats: CharacterStats,
    pub ability_ids: Vec<String>,
}

impl PartyMember {
    /// A fresh member at `level` with full HP/MP and everything its learnset unlocks so far.
    pub fn new(
        id: impl Into<CombatantId>,
        name: impl Into<String>,
        species: &MonsterSpecies,
        level: u32,
    ) -> SpeciesDataResult<Self> {
        let stats = stats_at_level(species, level)?;
        let mut ability_ids: Vec<String> = Vec::new();
        for entry in species.learnset.iter().filter(|entry| entry.level <= level) {
            if !ability_ids.contains(&entry.ability_id) {
                ability_ids.push(entry.ability_id.clone());
            }
        }

        Ok(Self {
            id: id.into(),
            name: name.into(),
            species_id: species.id.clone(),
            level,
            experience: total_experience_for_level(level),
            stats,
            ability_ids,
        })
    }

    /// Add experience and apply every level-up it pays for.
    ///
    /// Max stats are recomputed for the final level; current HP and MP grow by
    /// the same amount their maximums did. Experience stops accruing at the cap.
    pub fn gain_experience(
        &mut self,
        amount: u64,
        species: &MonsterSpecies,
    ) -> SpeciesDataResult<LevelUpReport> {
        let old_level = self.level;
        let mut report = LevelUpReport {
            old_level,
            new_level: old_level,
            ..LevelUpReport::default()
        };

        self.experience = self
            .experience
            .saturating_add(amount)
            .min(total_experience_for_level(MAX_LEVEL));

        while self.level < MAX_LEVEL
            && self.experience >= total_experience_for_level(self.level + 1)
        {
            self.level += 1;
            for ability_id in abilities_learned_at(species, self.level) {
                if !self.ability_ids.contains(&ability_id) {
                    self.ability_ids.push(ability_id.clone());
                    report.new_abilities.push(ability_id);
                }
            }
        }

        if self.level == old_level {
            return Ok(report);
        }

        let old_stats = self.stats.clone();
        let mut new_stats = stats_at_level(species, self.level)?;
        let gains = StatGains::between(&old_stats, &new_stats);
        new_stats.current_hp = old_stats.current_hp + gains.hp;
        new_stats.current_mp = old_stats.current_mp + gains.mp;
        new_stats.clamp();

        tracing::info!(
            member = %self.id,
            from = old_level,
            to = self.level,
            learned = report.new_abilities.len(),
            "level up"
        );

        self.stats = new_stats;
        report.new_level = self.level;
        report.stat_gains = gains;
        Ok(report)
    }

    /// Carry HP and MP out of a finished battle.
    pub fn sync_from_combatant(&mut self, combatant: &Combatant) {
        self.stats.current_hp = combatant.stats.current_hp;
        self.stats.current_mp = combatant.stats.current_mp;
        self.stats.clamp();
    }
}
