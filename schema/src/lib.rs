// Squad Battle Schema - Shared reference-data definitions
// This crate contains the static, serializable records (elements, abilities,
// status effects, species templates, items) that the engine loads once into
// its registry and never mutates afterwards.

// Re-export the main types
pub use abilities::*;
pub use element::*;
pub use items::*;
pub use species_data::*;

pub mod abilities;
pub mod element;
pub mod items;
pub mod species_data;
