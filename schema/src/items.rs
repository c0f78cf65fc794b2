use crate::StatusEffectData;
use serde::{Deserialize, Serialize};

/// What an item does when used. Magnitudes live on the item record; the
/// engine only reads them and never owns inventory counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemEffect {
    Heal { amount: u32 },
    RestoreMp { amount: u32 },
    /// Removes every harmful status (poison, sleep, slow).
    Cure,
    Buff { effect: StatusEffectData },
    CaptureDevice { multiplier: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: String,
    pub effect: ItemEffect,
    pub price: u32,
}

impl Item {
    pub fn is_capture_device(&self) -> bool {
        matches!(self.effect, ItemEffect::CaptureDevice { .. })
    }
}
