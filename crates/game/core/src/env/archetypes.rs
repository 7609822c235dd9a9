//! Enemy archetype templates and oracle interface.
//!
//! An archetype describes everything an enemy needs to enter combat: base
//! resources, combat stats, known spells, the experience it is worth and
//! its loot table. Archetypes are loaded from RON by the content crate and
//! turned into [`CombatantState`] records when a session spawns them.

use std::borrow::Cow;

use crate::combat::SpellId;
use crate::loot::{ArchetypeTier, LootTable};
use crate::state::{
    ArchetypeId, CombatStats, CombatantKind, CombatantState, EntityId, Position,
};

/// A spell entry of a template, as written in content files.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KnownSpell {
    pub spell: SpellId,
    #[cfg_attr(feature = "serde", serde(default = "first_level"))]
    pub level: u8,
}

#[cfg(feature = "serde")]
fn first_level() -> u8 {
    1
}

impl KnownSpell {
    pub fn new(spell: impl Into<String>, level: u8) -> Self {
        Self {
            spell: SpellId::new(spell),
            level,
        }
    }
}

/// Template for one kind of enemy.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyArchetype {
    pub id: ArchetypeId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tier: ArchetypeTier,
    #[cfg_attr(feature = "serde", serde(default = "first_character_level"))]
    pub level: u32,
    pub hp: u32,
    pub action_points: u32,
    pub movement_points: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stats: CombatStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub spells: Vec<KnownSpell>,
    /// Experience granted to the player when this enemy is defeated.
    #[cfg_attr(feature = "serde", serde(default))]
    pub experience: u32,
    /// Overrides the tier's default table when present.
    #[cfg_attr(feature = "serde", serde(default))]
    pub loot: Option<LootTable>,
}

#[cfg(feature = "serde")]
fn first_character_level() -> u32 {
    1
}

impl EnemyArchetype {
    pub fn new(id: impl Into<String>, name: impl Into<String>, hp: u32, ap: u32, mp: u32) -> Self {
        Self {
            id: ArchetypeId::new(id),
            name: name.into(),
            tier: ArchetypeTier::Basic,
            level: 1,
            hp,
            action_points: ap,
            movement_points: mp,
            stats: CombatStats::default(),
            spells: Vec::new(),
            experience: 0,
            loot: None,
        }
    }

    pub fn with_tier(mut self, tier: ArchetypeTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_stats(mut self, stats: CombatStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_experience(mut self, experience: u32) -> Self {
        self.experience = experience;
        self
    }

    pub fn with_loot(mut self, loot: LootTable) -> Self {
        self.loot = Some(loot);
        self
    }

    /// The archetype's own table, or the default of its tier.
    pub fn loot_table(&self) -> Cow<'_, LootTable> {
        match &self.loot {
            Some(table) => Cow::Borrowed(table),
            None => Cow::Owned(LootTable::for_tier(self.tier)),
        }
    }

    /// Creates a full-health combatant from this template.
    pub fn to_combatant(&self, id: EntityId, position: Position) -> CombatantState {
        let mut combatant = CombatantState::new(
            id,
            self.name.clone(),
            CombatantKind::Enemy {
                archetype: self.id.clone(),
            },
            position,
            self.hp,
            self.action_points,
            self.movement_points,
        )
        .with_stats(self.stats)
        .with_level(self.level);
        for known in &self.spells {
            combatant = combatant.with_spell(known.spell.clone(), known.level);
        }
        combatant
    }
}

/// Read-only access to enemy archetypes.
pub trait ArchetypeOracle: Send + Sync {
    fn archetype(&self, id: &ArchetypeId) -> Option<EnemyArchetype>;

    fn all_ids(&self) -> Vec<ArchetypeId> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Team;

    #[test]
    fn combatant_inherits_template() {
        let mut archetype = EnemyArchetype::new("goblin", "Goblin", 40, 6, 3)
            .with_tier(ArchetypeTier::Elite);
        archetype.spells.push(KnownSpell::new("stab", 2));

        let combatant = archetype.to_combatant(EntityId(4), Position::new(2, 3));
        assert_eq!(combatant.team, Team::Enemy);
        assert_eq!(combatant.hp.current, 40);
        assert_eq!(combatant.movement_points.maximum, 3);
        assert_eq!(combatant.kind.archetype(), Some(&ArchetypeId::new("goblin")));
        assert_eq!(combatant.spell(&SpellId::new("stab")).map(|slot| slot.level), Some(2));
    }

    #[test]
    fn missing_loot_falls_back_to_tier_table() {
        let archetype = EnemyArchetype::new("boss", "Boss", 300, 8, 2).with_tier(ArchetypeTier::Boss);
        assert_eq!(
            archetype.loot_table().into_owned(),
            LootTable::for_tier(ArchetypeTier::Boss)
        );

        let custom = archetype.with_loot(LootTable::default());
        assert_eq!(custom.loot_table().into_owned(), LootTable::default());
    }
}
