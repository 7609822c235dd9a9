//! Minimal [`game_core::SpellOracle`] backed by an in-memory map.
use std::collections::HashMap;

use game_core::{Spell, SpellId, SpellOracle};

/// SpellOracle implementation with static spell templates
pub struct SpellOracleImpl {
    spells: HashMap<SpellId, Spell>,
}

impl SpellOracleImpl {
    pub fn new() -> Self {
        Self {
            spells: HashMap::new(),
        }
    }

    pub fn from_spells(spells: impl IntoIterator<Item = Spell>) -> Self {
        let mut oracle = Self::new();
        for spell in spells {
            oracle.add_spell(spell);
        }
        oracle
    }

    /// Add a spell template
    pub fn add_spell(&mut self, spell: Spell) {
        self.spells.insert(spell.id.clone(), spell);
    }
}

impl Default for SpellOracleImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl SpellOracle for SpellOracleImpl {
    fn spell(&self, id: &SpellId) -> Option<Spell> {
        self.spells.get(id).cloned()
    }

    fn all_ids(&self) -> Vec<SpellId> {
        let mut ids: Vec<_> = self.spells.keys().cloned().collect();
        ids.sort();
        ids
    }
}
