use schema::{AbilityCategory, AbilityData, Element, StatusEffectData, StatusEffectKind};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombatantId(pub String);

impl CombatantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CombatantId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Which squad a combatant fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

/// Integer stat block. `current_hp <= max_hp` and `current_mp <= max_mp` always hold;
/// every mutator re-clamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterStats {
    pub max_hp: u32,
    pub current_hp: u32,
    pub max_mp: u32,
    pub current_mp: u32,
    pub attack: u32,
    pub defense: u32,
    pub magic_attack: u32,
    pub magic_defense: u32,
    pub speed: u32,
    pub luck: u32,
}

impl CharacterStats {
    /// Remove HP, never going below zero. Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.current_hp);
        self.current_hp -= lost;
        lost
    }

    /// Restore HP up to the maximum. Returns the HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_hp - self.current_hp.min(self.max_hp));
        self.current_hp = (self.current_hp + restored).min(self.max_hp);
        restored
    }

    /// Deduct MP if affordable. Returns false (and changes nothing) otherwise.
    pub fn spend_mp(&mut self, amount: u32) -> bool {
        if self.current_mp < amount {
            return false;
        }
        self.current_mp -= amount;
        true
    }

    /// Restore MP up to the maximum. Returns the MP actually restored.
    pub fn restore_mp(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_mp - self.current_mp.min(self.max_mp));
        self.current_mp = (self.current_mp + restored).min(self.max_mp);
        restored
    }

    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.current_hp as f64 / self.max_hp as f64
    }

    /// Re-establish the HP/MP bounds after a direct field edit.
    pub fn clamp(&mut self) {
        self.current_hp = self.current_hp.min(self.max_hp);
        self.current_mp = self.current_mp.min(self.max_mp);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveStatusEffect {
    pub effect: StatusEffectData,
    pub turns_remaining: u8,
    /// Attribution only; never used for targeting.
    pub applied_by: CombatantId,
}

impl ActiveStatusEffect {
    pub fn new(effect: StatusEffectData, applied_by: CombatantId) -> Self {
        Self {
            turns_remaining: effect.duration,
            effect,
            applied_by,
        }
    }

    pub fn kind(&self) -> StatusEffectKind {
        self.effect.kind
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub is_player: bool,
    pub level: u32,
    pub species_id: Option<String>,
    pub stats: CharacterStats,
    pub abilities: Vec<AbilityData>,
    pub status_effects: Vec<ActiveStatusEffect>,
    pub capturable: bool,
    /// When set, overrides the element inferred from known abilities.
    pub declared_element: Option<Element>,
}

impl Combatant {
    pub fn side(&self) -> Side {
        if self.is_player {
            Side::Player
        } else {
            Side::Enemy
        }
    }

    pub fn is_alive(&self) -> bool {
        self.stats.current_hp > 0
    }

    pub fn is_fainted(&self) -> bool {
        !self.is_alive()
    }

    pub fn find_ability(&self, ability_id: &str) -> Option<&AbilityData> {
        self.abilities.iter().find(|ability| ability.id == ability_id)
    }

    pub fn has_status(&self, kind: StatusEffectKind) -> bool {
        self.status_effects.iter().any(|status| status.kind() == kind)
    }

    pub fn status(&self, kind: StatusEffectKind) -> Option<&ActiveStatusEffect> {
        self.status_effects.iter().find(|status| status.kind() == kind)
    }

    pub fn is_asleep(&self) -> bool {
        self.has_status(StatusEffectKind::Sleep)
    }

    /// The element used for effectiveness lookups against this combatant.
    ///
    /// Without a declared element this is the first non-neutral element among the
    /// known abilities, or neutral if every known ability is neutral.
    pub fn element(&self) -> Element {
        if let Some(element) = self.declared_element {
            return element;
        }
        self.abilities
            .iter()
            .map(|ability| ability.element)
            .find(|element| !element.is_neutral())
            .unwrap_or(Element::Neutral)
    }

    fn status_multiplier(&self, kinds: &[StatusEffectKind]) -> f64 {
        self.status_effects
            .iter()
            .filter(|status| kinds.contains(&status.kind()))
            .map(|status| status.effect.magnitude)
            .product()
    }

    /// Speed after `slow`/`haste` multipliers.
    pub fn effective_speed(&self) -> f64 {
        self.stats.speed as f64
            * self.status_multiplier(&[StatusEffectKind::Slow, StatusEffectKind::Haste])
    }

    /// Offensive stat for the given category after `attack_up`.
    pub fn effective_attack(&self, category: AbilityCategory) -> u32 {
        let base = match category {
            AbilityCategory::Magical => self.stats.magic_attack,
            _ => self.stats.attack,
        };
        (base as f64 * self.status_multiplier(&[StatusEffectKind::AttackUp])).floor() as u32
    }

    /// Defensive stat for the given category after `shield` and `defense_up`.
    pub fn effective_defense(&self, category: AbilityCategory) -> u32 {
        let base = match category {
            AbilityCategory::Magical => self.stats.magic_defense,
            _ => self.stats.defense,
        };
        (base as f64
            * self.status_multiplier(&[StatusEffectKind::Shield, StatusEffectKind::DefenseUp]))
        .floor() as u32
    }
}
