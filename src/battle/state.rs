use crate::combatant::{Combatant, CombatantId, Side};
use crate::formulas::Effectiveness;
use schema::StatusEffectKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleState {
    Start,
    PlayerTurn,
    EnemyTurn,
    /// Placeholder emitted when the next entry in the turn order has fallen.
    /// The caller advances past it.
    Animating,
    Victory,
    Defeat,
    Fled,
    CaptureAttempt,
}

impl BattleState {
    /// Terminal states end the encounter; the snapshot is discarded afterwards.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BattleState::Victory | BattleState::Defeat | BattleState::Fled
        )
    }
}

/// What the winning side takes away from an encounter.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BattleRewards {
    pub experience: u32,
    pub gold: u32,
    /// Item drops. Always empty for now.
    pub items: Vec<String>,
    pub captured: Vec<Combatant>,
}

/// One player or AI decision for a single turn.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleAction {
    Attack {
        actor: CombatantId,
        target: Option<CombatantId>,
    },
    Ability {
        actor: CombatantId,
        ability_id: String,
        target: Option<CombatantId>,
    },
    Defend {
        actor: CombatantId,
    },
    Flee {
        actor: CombatantId,
    },
    Capture {
        actor: CombatantId,
        target: Option<CombatantId>,
        item_id: Option<String>,
    },
    Item {
        actor: CombatantId,
        item_id: String,
        target: Option<CombatantId>,
    },
}

impl BattleAction {
    pub fn actor(&self) -> &CombatantId {
        match self {
            BattleAction::Attack { actor, .. }
            | BattleAction::Ability { actor, .. }
            | BattleAction::Defend { actor }
            | BattleAction::Flee { actor }
            | BattleAction::Capture { actor, .. }
            | BattleAction::Item { actor, .. } => actor,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Actions
    ActionUsed {
        actor: CombatantId,
        action: String,
    },
    MpSpent {
        actor: CombatantId,
        amount: u32,
    },
    Missed {
        actor: CombatantId,
        action: String,
    },

    // Damage and healing
    DamageDealt {
        target: CombatantId,
        damage: u32,
        remaining_hp: u32,
    },
    CriticalHit {
        target: CombatantId,
    },
    Healed {
        target: CombatantId,
        amount: u32,
        new_hp: u32,
    },
    Defeated {
        combatant: CombatantId,
    },

    // Status effects
    StatusApplied {
        target: CombatantId,
        kind: StatusEffectKind,
        duration: u8,
    },
    StatusRejected {
        target: CombatantId,
        kind: StatusEffectKind,
    },
    StatusTick {
        target: CombatantId,
        kind: StatusEffectKind,
        amount: u32,
    },
    StatusExpired {
        target: CombatantId,
        kind: StatusEffectKind,
    },

    // Escape and capture
    FleeFailed {
        actor: CombatantId,
    },
    Fled {
        actor: CombatantId,
    },
    CaptureThrown {
        actor: CombatantId,
        target: CombatantId,
        device: String,
        rate: f64,
    },
    CaptureResolved {
        target: CombatantId,
        succeeded: bool,
        shakes: u8,
    },

    BattleEnded {
        outcome: BattleState,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable line using the battle for names.
    /// Returns None for silent events.
    pub fn format(&self, battle: &Battle) -> Option<String> {
        match self {
            BattleEvent::ActionUsed { actor, action } => {
                Some(format!("{} used {}!", battle.combatant_name(actor), action))
            }
            BattleEvent::MpSpent { .. } => None,
            BattleEvent::Missed { actor, .. } => {
                Some(format!("{}'s attack missed!", battle.combatant_name(actor)))
            }
            BattleEvent::DamageDealt { target, damage, .. } => Some(format!(
                "{} took {} damage!",
                battle.combatant_name(target),
                damage
            )),
            BattleEvent::CriticalHit { .. } => Some("A critical hit!".to_string()),
            BattleEvent::Healed { target, amount, .. } => Some(format!(
                "{} recovered {} HP!",
                battle.combatant_name(target),
                amount
            )),
            BattleEvent::Defeated { combatant } => {
                Some(format!("{} was defeated!", battle.combatant_name(combatant)))
            }
            BattleEvent::StatusApplied { target, kind, .. } => Some(format!(
                "{} is now affected by {}!",
                battle.combatant_name(target),
                kind
            )),
            BattleEvent::StatusRejected { target, kind } => Some(format!(
                "{} is already affected by {}!",
                battle.combatant_name(target),
                kind
            )),
            BattleEvent::StatusTick {
                target,
                kind: StatusEffectKind::Poison,
                amount,
            } => Some(format!(
                "{} took {} poison damage!",
                battle.combatant_name(target),
                amount
            )),
            BattleEvent::StatusTick {
                target,
                kind: StatusEffectKind::Regen,
                amount,
            } => Some(format!(
                "{} regenerated {} HP!",
                battle.combatant_name(target),
                amount
            )),
            BattleEvent::StatusTick { .. } => None,
            BattleEvent::StatusExpired { target, kind } => Some(format!(
                "{}'s {} wore off.",
                battle.combatant_name(target),
                kind
            )),
            BattleEvent::FleeFailed { .. } => Some("Couldn't escape!".to_string()),
            BattleEvent::Fled { .. } => Some("Got away safely!".to_string()),
            BattleEvent::CaptureThrown {
                actor,
                target,
                device,
                ..
            } => Some(format!(
                "{} threw a {} at {}!",
                battle.combatant_name(actor),
                device,
                battle.combatant_name(target)
            )),
            BattleEvent::CaptureResolved {
                target,
                succeeded: true,
                ..
            } => Some(format!("Gotcha! {} was captured!", battle.combatant_name(target))),
            BattleEvent::CaptureResolved { target, shakes, .. } => Some(format!(
                "{} broke free after {} shake(s)!",
                battle.combatant_name(target),
                shakes
            )),
            BattleEvent::BattleEnded { outcome } => Some(match outcome {
                BattleState::Victory => "Victory!".to_string(),
                BattleState::Defeat => "The party was defeated...".to_string(),
                BattleState::Fled => "The party escaped.".to_string(),
                other => format!("Battle ended: {:?}", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Print all events using their formatted text, falling back to debug format for silent events.
    pub fn print_formatted(&self, battle: &Battle) {
        for event in &self.events {
            match event.format(battle) {
                Some(formatted) => println!("  {}", formatted),
                None => println!("  {:?} (silent)", event),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Outcome of one engine transition. `battle` is always a valid snapshot:
/// the new one on success, an unchanged copy when the action was rejected.
#[derive(Debug, Clone)]
pub struct ActionResult {
    pub battle: Battle,
    pub damage: u32,
    pub is_critical: bool,
    pub effectiveness: Option<Effectiveness>,
    pub status_applied: Option<StatusEffectKind>,
    pub message: String,
    pub events: EventBus,
}

impl ActionResult {
    pub(crate) fn new(battle: Battle, message: impl Into<String>) -> Self {
        Self {
            battle,
            damage: 0,
            is_critical: false,
            effectiveness: None,
            status_applied: None,
            message: message.into(),
            events: EventBus::new(),
        }
    }

    /// A rejected action: the snapshot comes back unchanged with an explanation.
    pub(crate) fn rejected(battle: &Battle, message: impl Into<String>) -> Self {
        Self::new(battle.clone(), message)
    }
}

/// The aggregate root of an encounter.
///
/// Combatants live once in an id-keyed store; the player squad, enemy squad and
/// turn order are id lists over that store, so every view of a combatant in a
/// given snapshot reads the same record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Battle {
    pub state: BattleState,
    combatants: BTreeMap<CombatantId, Combatant>,
    player_ids: Vec<CombatantId>,
    enemy_ids: Vec<CombatantId>,
    turn_order: Vec<CombatantId>,
    pub current_turn_index: usize,
    pub turn_count: u32,
    pub can_flee: bool,
    pub background: Option<String>,
    pub rewards: Option<BattleRewards>,
}

impl Battle {
    /// Build a snapshot from two squads and a precomputed turn order.
    /// A combatant whose id is already taken is dropped, and each id keeps
    /// only its first turn-order slot.
    pub(crate) fn new(
        players: Vec<Combatant>,
        enemies: Vec<Combatant>,
        turn_order: Vec<CombatantId>,
        can_flee: bool,
    ) -> Self {
        let mut combatants = BTreeMap::new();
        let mut player_ids = Vec::new();
        let mut enemy_ids = Vec::new();

        for (mut combatant, is_player) in players
            .into_iter()
            .map(|c| (c, true))
            .chain(enemies.into_iter().map(|c| (c, false)))
        {
            if combatants.contains_key(&combatant.id) {
                tracing::warn!(id = %combatant.id, "duplicate combatant id, dropping");
                continue;
            }
            combatant.is_player = is_player;
            combatant.stats.clamp();
            if is_player {
                player_ids.push(combatant.id.clone());
            } else {
                enemy_ids.push(combatant.id.clone());
            }
            combatants.insert(combatant.id.clone(), combatant);
        }

        let mut slotted = BTreeSet::new();
        let turn_order = turn_order
            .into_iter()
            .filter(|id| combatants.contains_key(id) && slotted.insert(id.clone()))
            .collect();

        Self {
            state: BattleState::Start,
            combatants,
            player_ids,
            enemy_ids,
            turn_order,
            current_turn_index: 0,
            turn_count: 1,
            can_flee,
            background: None,
            rewards: None,
        }
    }

    // --- Store access ---

    pub fn combatant(&self, id: &CombatantId) -> Option<&Combatant> {
        self.combatants.get(id)
    }

    pub(crate) fn combatant_mut(&mut self, id: &CombatantId) -> Option<&mut Combatant> {
        self.combatants.get_mut(id)
    }

    /// Display name for an id, falling back to the raw id once the combatant is gone.
    pub fn combatant_name(&self, id: &CombatantId) -> String {
        self.combatant(id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Take a combatant out of the battle entirely (squad, turn order and store).
    pub(crate) fn remove_combatant(&mut self, id: &CombatantId) -> Option<Combatant> {
        let removed = self.combatants.remove(id)?;
        self.player_ids.retain(|other| other != id);
        self.enemy_ids.retain(|other| other != id);

        if let Some(position) = self.turn_order.iter().position(|other| other == id) {
            self.turn_order.remove(position);
            if position < self.current_turn_index {
                self.current_turn_index -= 1;
            }
            if self.current_turn_index >= self.turn_order.len() {
                self.current_turn_index = 0;
            }
        }
        Some(removed)
    }

    // --- Views ---

    pub fn player_ids(&self) -> &[CombatantId] {
        &self.player_ids
    }

    pub fn enemy_ids(&self) -> &[CombatantId] {
        &self.enemy_ids
    }

    pub fn turn_order(&self) -> &[CombatantId] {
        &self.turn_order
    }

    pub fn side_ids(&self, side: Side) -> &[CombatantId] {
        match side {
            Side::Player => &self.player_ids,
            Side::Enemy => &self.enemy_ids,
        }
    }

    fn resolve<'a>(&'a self, ids: &'a [CombatantId]) -> impl Iterator<Item = &'a Combatant> + 'a {
        ids.iter().filter_map(move |id| self.combatants.get(id))
    }

    pub fn player_squad(&self) -> Vec<&Combatant> {
        self.resolve(&self.player_ids).collect()
    }

    pub fn enemy_squad(&self) -> Vec<&Combatant> {
        self.resolve(&self.enemy_ids).collect()
    }

    pub fn turn_order_combatants(&self) -> Vec<&Combatant> {
        self.resolve(&self.turn_order).collect()
    }

    pub fn squad(&self, side: Side) -> Vec<&Combatant> {
        self.resolve(self.side_ids(side)).collect()
    }

    /// Living members of a side, in squad order.
    pub fn living(&self, side: Side) -> Vec<&Combatant> {
        self.resolve(self.side_ids(side))
            .filter(|c| c.is_alive())
            .collect()
    }

    pub fn living_ids(&self, side: Side) -> Vec<CombatantId> {
        self.living(side).into_iter().map(|c| c.id.clone()).collect()
    }

    pub fn all_defeated(&self, side: Side) -> bool {
        self.resolve(self.side_ids(side)).all(|c| c.is_fainted())
    }

    pub fn current_actor_id(&self) -> Option<&CombatantId> {
        self.turn_order.get(self.current_turn_index)
    }
}
