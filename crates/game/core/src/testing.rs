//! Fixtures shared by unit tests.

use std::collections::BTreeMap;

use crate::combat::{Spell, SpellId};
use crate::config::GameConfig;
use crate::env::{ArchetypeOracle, EnemyArchetype, Env, GameEnv, PcgRng, SpellOracle};
use crate::state::{
    ArchetypeId, CharacterId, CombatState, CombatantKind, CombatantState, EntityId, Phase,
    Position,
};

#[derive(Default)]
pub struct SpellTable(BTreeMap<SpellId, Spell>);

impl SpellOracle for SpellTable {
    fn spell(&self, id: &SpellId) -> Option<Spell> {
        self.0.get(id).cloned()
    }
}

#[derive(Default)]
pub struct ArchetypeTable(BTreeMap<ArchetypeId, EnemyArchetype>);

impl ArchetypeOracle for ArchetypeTable {
    fn archetype(&self, id: &ArchetypeId) -> Option<EnemyArchetype> {
        self.0.get(id).cloned()
    }
}

pub struct TestOracles {
    pub spells: SpellTable,
    pub archetypes: ArchetypeTable,
    pub config: GameConfig,
    pub rng: PcgRng,
}

impl TestOracles {
    pub fn new() -> Self {
        Self {
            spells: SpellTable::default(),
            archetypes: ArchetypeTable::default(),
            config: GameConfig::default(),
            rng: PcgRng,
        }
    }

    pub fn with_spell(mut self, spell: Spell) -> Self {
        self.spells.0.insert(spell.id.clone(), spell);
        self
    }

    pub fn with_archetype(mut self, archetype: EnemyArchetype) -> Self {
        self.archetypes.0.insert(archetype.id.clone(), archetype);
        self
    }

    pub fn env(&self) -> GameEnv<'_> {
        Env::with_all(&self.spells, &self.archetypes, &self.config, &self.rng).into_game_env()
    }
}

/// Player with 50 HP, 6 AP and 3 MP.
pub fn player_at(position: Position) -> CombatantState {
    CombatantState::new(
        EntityId::PLAYER,
        "hero",
        CombatantKind::Player {
            character: CharacterId::new("hero"),
        },
        position,
        50,
        6,
        3,
    )
}

/// Enemy with 6 AP and 3 MP.
pub fn enemy_at(id: u32, position: Position, hp: u32) -> CombatantState {
    CombatantState::new(
        EntityId(id),
        "dummy",
        CombatantKind::Enemy {
            archetype: ArchetypeId::new("dummy"),
        },
        position,
        hp,
        6,
        3,
    )
}

/// Skips positioning: every living combatant in id order, player first.
pub fn begin_playing(state: &mut CombatState) {
    let ids: Vec<EntityId> = state.combatants.living().map(|c| c.id).collect();
    state.turn.order.clear();
    for id in ids {
        state.turn.order.push(id);
    }
    state.turn.phase = Phase::Playing;
    state.turn.round = 1;
    state.turn.actor_index = 0;
}
