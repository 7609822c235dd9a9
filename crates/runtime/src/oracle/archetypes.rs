//! Enemy archetype oracle backed by an in-memory map.
use std::collections::HashMap;

use game_core::{ArchetypeId, ArchetypeOracle, EnemyArchetype};

pub struct ArchetypeOracleImpl {
    archetypes: HashMap<ArchetypeId, EnemyArchetype>,
}

impl ArchetypeOracleImpl {
    pub fn new() -> Self {
        Self {
            archetypes: HashMap::new(),
        }
    }

    pub fn from_archetypes(archetypes: impl IntoIterator<Item = EnemyArchetype>) -> Self {
        let mut oracle = Self::new();
        for archetype in archetypes {
            oracle.add_archetype(archetype);
        }
        oracle
    }

    pub fn add_archetype(&mut self, archetype: EnemyArchetype) {
        self.archetypes.insert(archetype.id.clone(), archetype);
    }
}

impl Default for ArchetypeOracleImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchetypeOracle for ArchetypeOracleImpl {
    fn archetype(&self, id: &ArchetypeId) -> Option<EnemyArchetype> {
        self.archetypes.get(id).cloned()
    }

    fn all_ids(&self) -> Vec<ArchetypeId> {
        let mut ids: Vec<_> = self.archetypes.keys().cloned().collect();
        ids.sort();
        ids
    }
}
