//! Combatant record shared by the player and every enemy.

use core::fmt;

use arrayvec::ArrayVec;
use bitflags::bitflags;

use crate::combat::{Element, SpellId};
use crate::config::GameConfig;

use super::{EntityId, Position, ResourceMeter, Team};

// ============================================================================
// Identifiers
// ============================================================================

/// Key into the character data provider.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CharacterId(pub String);

impl CharacterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key into the enemy archetype catalog.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ArchetypeId(pub String);

impl ArchetypeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ArchetypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Combat Attributes
// ============================================================================

/// Elemental characteristics plus vitality.
///
/// A characteristic raises same-element damage by that many percent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Characteristics {
    pub neutral: i32,
    pub earth: i32,
    pub fire: i32,
    pub water: i32,
    pub air: i32,
    pub vitality: i32,
}

impl Characteristics {
    pub fn get(&self, element: Element) -> i32 {
        match element {
            Element::Neutral => self.neutral,
            Element::Earth => self.earth,
            Element::Fire => self.fire,
            Element::Water => self.water,
            Element::Air => self.air,
        }
    }

    pub fn with(mut self, element: Element, value: i32) -> Self {
        match element {
            Element::Neutral => self.neutral = value,
            Element::Earth => self.earth = value,
            Element::Fire => self.fire = value,
            Element::Water => self.water = value,
            Element::Air => self.air = value,
        }
        self
    }
}

/// Percentage damage reduction per resistible element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Resistances {
    pub earth: i32,
    pub fire: i32,
    pub water: i32,
    pub air: i32,
}

impl Resistances {
    pub fn get(&self, element: Element) -> i32 {
        match element {
            Element::Neutral => 0,
            Element::Earth => self.earth,
            Element::Fire => self.fire,
            Element::Water => self.water,
            Element::Air => self.air,
        }
    }

    pub fn with(mut self, element: Element, value: i32) -> Self {
        match element {
            Element::Neutral => {}
            Element::Earth => self.earth = value,
            Element::Fire => self.fire = value,
            Element::Water => self.water = value,
            Element::Air => self.air = value,
        }
        self
    }
}

/// Offensive bonuses: a flat amount plus spell and per-element percentages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DamageBonus {
    pub flat: i32,
    pub spell_percent: i32,
    pub neutral_percent: i32,
    pub earth_percent: i32,
    pub fire_percent: i32,
    pub water_percent: i32,
    pub air_percent: i32,
}

impl DamageBonus {
    pub fn element_percent(&self, element: Element) -> i32 {
        match element {
            Element::Neutral => self.neutral_percent,
            Element::Earth => self.earth_percent,
            Element::Fire => self.fire_percent,
            Element::Water => self.water_percent,
            Element::Air => self.air_percent,
        }
    }
}

/// Everything the damage pipeline reads from either side of an exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatStats {
    pub characteristics: Characteristics,
    pub resistances: Resistances,
    pub damage_bonus: DamageBonus,
    /// Basic-attack power.
    pub attack: i32,
    /// Basic-attack mitigation.
    pub defense: i32,
}

// ============================================================================
// Kind, Spell Book, Turn Flags
// ============================================================================

/// Who drives a combatant. Replaces any type-identity check.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatantKind {
    Player { character: CharacterId },
    Enemy { archetype: ArchetypeId },
}

impl CombatantKind {
    pub fn is_player_controlled(&self) -> bool {
        matches!(self, CombatantKind::Player { .. })
    }

    pub fn archetype(&self) -> Option<&ArchetypeId> {
        match self {
            CombatantKind::Enemy { archetype } => Some(archetype),
            CombatantKind::Player { .. } => None,
        }
    }
}

/// A known spell, its level and its remaining cooldown in turns.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellSlot {
    pub spell: SpellId,
    pub level: u8,
    pub cooldown: u32,
}

impl SpellSlot {
    pub fn new(spell: SpellId, level: u8) -> Self {
        Self {
            spell,
            level,
            cooldown: 0,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown == 0
    }
}

pub type SpellBook = ArrayVec<SpellSlot, { GameConfig::MAX_SPELLS }>;

bitflags! {
    /// Flags that only live for the duration of one turn.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TurnFlags: u8 {
        const MOVED     = 1 << 0;
        const ATTACKED  = 1 << 1;
        const CAST      = 1 << 2;
    }
}

// ============================================================================
// Combatant State
// ============================================================================

/// Mutable record for any actor on the battlefield.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantState {
    pub id: EntityId,
    pub name: String,
    pub kind: CombatantKind,
    pub team: Team,
    pub level: u32,
    pub position: Position,
    pub hp: ResourceMeter,
    pub action_points: ResourceMeter,
    pub movement_points: ResourceMeter,
    pub stats: CombatStats,
    pub spells: SpellBook,
    pub flags: TurnFlags,
    pub alive: bool,
}

impl CombatantState {
    /// Creates a living combatant with full resources and no spells.
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        kind: CombatantKind,
        position: Position,
        hp: u32,
        action_points: u32,
        movement_points: u32,
    ) -> Self {
        let team = if kind.is_player_controlled() {
            Team::Player
        } else {
            Team::Enemy
        };
        Self {
            id,
            name: name.into(),
            kind,
            team,
            level: 1,
            position,
            hp: ResourceMeter::full(hp),
            action_points: ResourceMeter::full(action_points),
            movement_points: ResourceMeter::full(movement_points),
            stats: CombatStats::default(),
            spells: SpellBook::new(),
            flags: TurnFlags::empty(),
            alive: true,
        }
    }

    pub fn with_stats(mut self, stats: CombatStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Adds a spell to the book. Silently ignored once the book is full.
    pub fn with_spell(mut self, spell: SpellId, level: u8) -> Self {
        let _ = self.spells.try_push(SpellSlot::new(spell, level));
        self
    }

    pub fn is_player_controlled(&self) -> bool {
        self.kind.is_player_controlled()
    }

    pub fn spell(&self, spell: &SpellId) -> Option<&SpellSlot> {
        self.spells.iter().find(|slot| &slot.spell == spell)
    }

    pub fn spell_mut(&mut self, spell: &SpellId) -> Option<&mut SpellSlot> {
        self.spells.iter_mut().find(|slot| &slot.spell == spell)
    }

    /// Resets AP and MP to their maximums.
    pub fn refill_turn_resources(&mut self) {
        self.action_points.refill();
        self.movement_points.refill();
    }

    /// Decrements every cooldown by one turn.
    pub fn tick_cooldowns(&mut self) {
        for slot in self.spells.iter_mut() {
            slot.cooldown = slot.cooldown.saturating_sub(1);
        }
    }

    /// Applies damage and returns the HP actually lost. Flags death at zero.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = self.hp.debit(amount);
        if self.hp.is_empty() {
            self.alive = false;
        }
        lost
    }
}
