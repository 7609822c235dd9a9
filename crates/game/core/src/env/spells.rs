//! Spell catalog oracle.

use crate::combat::{Spell, SpellId};

/// Read-only access to spell templates, keyed by id.
pub trait SpellOracle: Send + Sync {
    /// Level-1 template of a spell, if it exists.
    fn spell(&self, id: &SpellId) -> Option<Spell>;

    /// Returns all known spell ids.
    fn all_ids(&self) -> Vec<SpellId> {
        Vec::new()
    }
}
