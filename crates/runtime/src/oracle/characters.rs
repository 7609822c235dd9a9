//! Character data provider backed by loaded sheets.
//!
//! Sheets updated after a victory are written back here so the next session
//! in the same process starts from the new level, HP and experience.
use std::collections::HashMap;
use std::sync::RwLock;

use game_core::{CharacterId, CharacterOracle, CharacterSheet, StatSnapshot};

pub struct CharacterOracleImpl {
    sheets: RwLock<HashMap<CharacterId, CharacterSheet>>,
}

impl CharacterOracleImpl {
    pub fn new() -> Self {
        Self {
            sheets: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_sheets(sheets: impl IntoIterator<Item = CharacterSheet>) -> Self {
        let map = sheets
            .into_iter()
            .map(|sheet| (sheet.id.clone(), sheet))
            .collect();
        Self {
            sheets: RwLock::new(map),
        }
    }

    /// Applies a post-fight snapshot. Returns false for an unknown character.
    pub fn apply_snapshot(&self, snapshot: &StatSnapshot) -> bool {
        let Ok(mut sheets) = self.sheets.write() else {
            tracing::warn!("character oracle lock poisoned, snapshot dropped");
            return false;
        };
        match sheets.get_mut(&snapshot.character) {
            Some(sheet) => {
                snapshot.apply_to(sheet);
                true
            }
            None => false,
        }
    }

    pub fn all(&self) -> Vec<CharacterSheet> {
        let mut sheets: Vec<_> = self
            .sheets
            .read()
            .map(|sheets| sheets.values().cloned().collect())
            .unwrap_or_default();
        sheets.sort_by(|a, b| a.id.cmp(&b.id));
        sheets
    }
}

impl Default for CharacterOracleImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterOracle for CharacterOracleImpl {
    fn character(&self, id: &CharacterId) -> Option<CharacterSheet> {
        self.sheets.read().ok()?.get(id).cloned()
    }
}
