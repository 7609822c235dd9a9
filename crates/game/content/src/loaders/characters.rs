//! Character sheet loader.

use std::path::Path;

use game_core::CharacterSheet;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, ensure_unique, read_ron};

/// Character roster structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterRoster {
    pub characters: Vec<CharacterSheet>,
}

/// Loader for player character sheets.
pub struct CharacterLoader;

impl CharacterLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<CharacterSheet>> {
        let roster: CharacterRoster = read_ron(path, "character roster")?;
        ensure_unique("character", roster.characters.iter().map(|c| &c.id))?;

        for character in &roster.characters {
            if character.max_hp == 0 {
                anyhow::bail!("Character '{}' has no hit points", character.id);
            }
            if character.level == 0 {
                anyhow::bail!("Character '{}' level must be at least 1", character.id);
            }
        }

        tracing::debug!(
            count = roster.characters.len(),
            path = %path.display(),
            "loaded characters"
        );
        Ok(roster.characters)
    }

    /// Writes the roster back, used after a fight updates a sheet.
    pub fn save(path: &Path, characters: &[CharacterSheet]) -> LoadResult<()> {
        let roster = CharacterRoster {
            characters: characters.to_vec(),
        };
        let content = ron::ser::to_string_pretty(&roster, ron::ser::PrettyConfig::default())
            .map_err(|e| anyhow::anyhow!("Failed to serialize character roster: {}", e))?;
        std::fs::write(path, content)
            .map_err(|e| anyhow::anyhow!("Failed to write file {}: {}", path.display(), e))
    }
}
