//! Monster growth: stats and abilities by level, experience, and building
//! combatants from party members and species templates.

pub mod experience;
pub mod factory;
pub mod growth;

pub use experience::{
    experience_to_next_level, total_experience_for_level, LevelUpReport, PartyMember, MAX_LEVEL,
};
pub use factory::{create_combatant_from_enemy, create_combatant_from_player, FactoryOptions};
pub use growth::{abilities_learned_at, abilities_unlocked_at, stats_at_level, StatGains};
