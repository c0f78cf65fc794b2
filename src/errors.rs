use thiserror::Error;

/// Main error type for the squad battle engine.
///
/// Gameplay outcomes (missed attacks, insufficient MP, a failed escape) are never
/// errors; they come back as an `ActionResult` message. These variants cover data
/// setup bugs and I/O only.
#[derive(Debug, Error)]
pub enum BattleEngineError {
    /// Error related to ability data lookup or validation
    #[error("Ability data error: {0}")]
    AbilityData(#[from] AbilityDataError),
    /// Error related to species data lookup or validation
    #[error("Species data error: {0}")]
    SpeciesData(#[from] SpeciesDataError),
    /// Error related to item data lookup or validation
    #[error("Item data error: {0}")]
    ItemData(#[from] ItemDataError),
    /// Malformed input to one of the numeric formulas
    #[error("Formula error: {0}")]
    Formula(#[from] FormulaError),
    /// Reading or parsing a data file failed
    #[error("Data load error: {0}")]
    DataLoad(#[from] DataLoadError),
    /// Encoding or decoding a battle snapshot failed
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Errors related to ability data operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbilityDataError {
    /// The specified ability was not found in the registry
    #[error("Ability not found: {0}")]
    AbilityNotFound(String),
    /// Two ability records share the same id
    #[error("Duplicate ability id: {0}")]
    DuplicateAbility(String),
}

/// Errors related to species data operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeciesDataError {
    /// The specified species was not found in the registry
    #[error("Species not found: {0}")]
    SpeciesNotFound(String),
    /// Two species records share the same id
    #[error("Duplicate species id: {0}")]
    DuplicateSpecies(String),
    /// A learnset references an ability the registry does not know
    #[error("Species {species} learns unknown ability {ability}")]
    UnknownLearnsetAbility { species: String, ability: String },
    /// Levels start at 1
    #[error("Invalid level: {0}")]
    InvalidLevel(u32),
}

/// Errors related to item data operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemDataError {
    #[error("Item not found: {0}")]
    ItemNotFound(String),
    #[error("Duplicate item id: {0}")]
    DuplicateItem(String),
}

/// Malformed formula input. These indicate a data-setup bug, never a gameplay event.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    #[error("Cannot pick from an empty list")]
    EmptyInput,
    #[error("Got {items} items but {weights} weights")]
    LengthMismatch { items: usize, weights: usize },
    #[error("Total weight must be positive, got {0}")]
    NonPositiveTotalWeight(f64),
}

#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

#[derive(Debug, Error)]
#[error("Snapshot encoding failed: {0}")]
pub struct SnapshotError(#[from] pub postcard::Error);

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using AbilityDataError
pub type AbilityDataResult<T> = Result<T, AbilityDataError>;

/// Type alias for Results using SpeciesDataError
pub type SpeciesDataResult<T> = Result<T, SpeciesDataError>;

/// Type alias for Results using FormulaError
pub type FormulaResult<T> = Result<T, FormulaError>;
