// In: src/lib.rs

//! Squad Battle Engine
//!
//! A turn-based squad combat engine: speed-ordered turns between a player
//! squad and an enemy squad, elemental abilities, timed status effects,
//! flee and capture mechanics, and a monster growth model that builds the
//! combatants. Every transition takes a battle snapshot and returns a new one.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod combatant;
pub mod config;
pub mod errors;
pub mod formulas;
pub mod progression;
pub mod registry;
pub mod rng;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
// Reference-data records and their enums.
pub use schema::{
    AbilityCategory, AbilityData, BaseStats, Element, GrowthRates, Item, ItemEffect,
    LearnsetEntry, MonsterSpecies, StatusEffectData, StatusEffectKind, TargetType,
};

// --- From this crate's modules (`src/`) ---

// Core battle engine and snapshot types.
pub use battle::ai::{Behavior, HeuristicAI};
pub use battle::engine::BattleEngine;
pub use battle::state::{
    ActionResult, Battle, BattleAction, BattleEvent, BattleRewards, BattleState, EventBus,
};
pub use battle::status::StatusTickResult;

// Targeting and capture.
pub use battle::catch::{
    attempt_capture, attempt_capture_with_roll, can_attempt_capture, capture_rate_description,
    CaptureAttempt, CaptureDevice, CaptureError,
};
pub use battle::targeting::{get_valid_targets, requires_target_selection, resolve_targets};

// Runtime combatants and their construction.
pub use combatant::{ActiveStatusEffect, CharacterStats, Combatant, CombatantId, Side};
pub use progression::{
    create_combatant_from_enemy, create_combatant_from_player, FactoryOptions, LevelUpReport,
    PartyMember,
};

// Configuration, reference data and randomness.
pub use config::BattleConfig;
pub use registry::Registry;
pub use rng::{BattleRng, RandomSource, ScriptedRng};

// Crate-specific error and result types.
pub use errors::{
    AbilityDataError, BattleEngineError, BattleResult, DataLoadError, FormulaError,
    ItemDataError, SpeciesDataError, SpeciesDataResult,
};
