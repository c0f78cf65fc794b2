use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Multiplier applied when the attacking element overpowers the defender.
pub const SUPER_EFFECTIVE: f64 = 2.0;
/// Multiplier applied when the defender resists the attacking element.
pub const RESISTED: f64 = 0.5;
/// Multiplier for every pairing with no special relationship.
pub const NEUTRAL: f64 = 1.0;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
pub enum Element {
    #[default]
    Neutral,
    Fire,
    Water,
    Earth,
    Air,
    Light,
    Dark,
}

impl Element {
    /// Calculate the effectiveness multiplier for an attacking element against a defending element.
    /// Returns: 2.0 = super effective, 1.0 = neutral, 0.5 = resisted.
    ///
    /// The four natural elements form a wheel (Fire > Air > Earth > Water > Fire),
    /// Light and Dark overpower each other, and any element other than Neutral
    /// resists itself.
    pub fn effectiveness(attacking: Element, defending: Element) -> f64 {
        use Element::*;

        match (attacking, defending) {
            // Neutral never gains or loses anything, in either direction
            (Neutral, _) | (_, Neutral) => NEUTRAL,

            // Same element is always resisted
            (a, d) if a == d => RESISTED,

            // Fire
            (Fire, Air) => SUPER_EFFECTIVE,
            (Fire, Water) => RESISTED,

            // Air
            (Air, Earth) => SUPER_EFFECTIVE,
            (Air, Fire) => RESISTED,

            // Earth
            (Earth, Water) => SUPER_EFFECTIVE,
            (Earth, Air) => RESISTED,

            // Water
            (Water, Fire) => SUPER_EFFECTIVE,
            (Water, Earth) => RESISTED,

            // Light and Dark
            (Light, Dark) | (Dark, Light) => SUPER_EFFECTIVE,

            _ => NEUTRAL,
        }
    }

    pub fn is_neutral(self) -> bool {
        self == Element::Neutral
    }
}
