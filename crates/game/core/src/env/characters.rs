//! Character data provider.
//!
//! Character sheets are owned by an external collaborator; the engine reads
//! them once per session to build the player combatant and to compute the
//! progression snapshot at victory.

use crate::state::{CharacterId, CombatStats, CombatantKind, CombatantState, EntityId, Position};

use super::KnownSpell;

/// Persistent character data read at session start.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterSheet {
    pub id: CharacterId,
    pub name: String,
    pub level: u32,
    /// Total experience earned so far.
    #[cfg_attr(feature = "serde", serde(default))]
    pub experience: u64,
    pub max_hp: u32,
    /// HP carried over from the previous fight; `None` means full health.
    #[cfg_attr(feature = "serde", serde(default))]
    pub current_hp: Option<u32>,
    pub action_points: u32,
    pub movement_points: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stats: CombatStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub spells: Vec<KnownSpell>,
    /// Loot chance multiplier in percent.
    #[cfg_attr(feature = "serde", serde(default = "default_prospection"))]
    pub prospection: u32,
}

#[cfg(feature = "serde")]
fn default_prospection() -> u32 {
    CharacterSheet::DEFAULT_PROSPECTION
}

impl CharacterSheet {
    pub const DEFAULT_PROSPECTION: u32 = 100;

    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        max_hp: u32,
        action_points: u32,
        movement_points: u32,
    ) -> Self {
        Self {
            id: CharacterId::new(id),
            name: name.into(),
            level: 1,
            experience: 0,
            max_hp,
            current_hp: None,
            action_points,
            movement_points,
            stats: CombatStats::default(),
            spells: Vec::new(),
            prospection: Self::DEFAULT_PROSPECTION,
        }
    }

    pub fn with_spell(mut self, spell: impl Into<String>, level: u8) -> Self {
        self.spells.push(KnownSpell::new(spell, level));
        self
    }

    pub fn with_stats(mut self, stats: CombatStats) -> Self {
        self.stats = stats;
        self
    }

    /// Builds the player combatant. Carried-over HP is clamped to the maximum
    /// and to at least 1 so a fight never starts with a dead player.
    pub fn to_combatant(&self, position: Position) -> CombatantState {
        let mut combatant = CombatantState::new(
            EntityId::PLAYER,
            self.name.clone(),
            CombatantKind::Player {
                character: self.id.clone(),
            },
            position,
            self.max_hp,
            self.action_points,
            self.movement_points,
        )
        .with_stats(self.stats)
        .with_level(self.level);
        if let Some(current) = self.current_hp {
            combatant.hp.current = current.clamp(1, self.max_hp.max(1));
        }
        for known in &self.spells {
            combatant = combatant.with_spell(known.spell.clone(), known.level);
        }
        combatant
    }
}

/// Read-only character data provider, keyed by character id.
pub trait CharacterOracle: Send + Sync {
    fn character(&self, id: &CharacterId) -> Option<CharacterSheet>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carried_over_hp_is_clamped() {
        let mut sheet = CharacterSheet::new("hero", "Hero", 50, 6, 3);
        sheet.current_hp = Some(0);
        assert_eq!(sheet.to_combatant(Position::ORIGIN).hp.current, 1);

        sheet.current_hp = Some(80);
        assert_eq!(sheet.to_combatant(Position::ORIGIN).hp.current, 50);

        sheet.current_hp = None;
        let player = sheet.to_combatant(Position::ORIGIN);
        assert_eq!(player.hp.current, 50);
        assert!(player.is_player_controlled());
        assert_eq!(player.id, EntityId::PLAYER);
    }
}
