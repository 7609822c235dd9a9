//! Content factory for loading a whole data directory.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use game_core::{CharacterSheet, EnemyArchetype, Encounter, GameConfig, Spell, SpellId};

use crate::loaders::{
    ArchetypeLoader, CharacterLoader, ConfigLoader, EncounterLoader, LoadResult, SpellLoader,
};

/// Everything loaded from one data directory, already cross-checked.
#[derive(Debug, Clone)]
pub struct GameContent {
    pub config: GameConfig,
    pub spells: Vec<Spell>,
    pub archetypes: Vec<EnemyArchetype>,
    pub characters: Vec<CharacterSheet>,
    pub encounters: Vec<Encounter>,
}

impl GameContent {
    pub fn encounter(&self, id: &str) -> Option<&Encounter> {
        self.encounters.iter().find(|encounter| encounter.id == id)
    }

    pub fn character(&self, id: &str) -> Option<&CharacterSheet> {
        self.characters.iter().find(|character| character.id.0 == id)
    }
}

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml      (optional, defaults otherwise)
/// ├── spells.ron
/// ├── archetypes.ron
/// ├── characters.ron
/// └── encounters.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Loads and validates every content file in `data_dir`.
    pub fn load_dir(data_dir: impl Into<PathBuf>) -> LoadResult<GameContent> {
        Self::new(data_dir).load_all()
    }

    pub fn load_all(&self) -> LoadResult<GameContent> {
        let content = GameContent {
            config: self.load_config()?,
            spells: self.load_spells()?,
            archetypes: self.load_archetypes()?,
            characters: self.load_characters()?,
            encounters: self.load_encounters()?,
        };
        Self::check_references(&content)?;

        tracing::info!(
            dir = %self.data_dir.display(),
            spells = content.spells.len(),
            archetypes = content.archetypes.len(),
            characters = content.characters.len(),
            encounters = content.encounters.len(),
            "content loaded"
        );
        Ok(content)
    }

    /// Load game configuration from `config.toml`, falling back to defaults.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::warn!(path = %path.display(), "no config file, using defaults");
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the spell catalog from `spells.ron`.
    pub fn load_spells(&self) -> LoadResult<Vec<Spell>> {
        SpellLoader::load(&self.data_dir.join("spells.ron"))
    }

    /// Load enemy archetypes from `archetypes.ron`.
    pub fn load_archetypes(&self) -> LoadResult<Vec<EnemyArchetype>> {
        ArchetypeLoader::load(&self.data_dir.join("archetypes.ron"))
    }

    /// Load character sheets from `characters.ron`.
    pub fn load_characters(&self) -> LoadResult<Vec<CharacterSheet>> {
        CharacterLoader::load(&self.data_dir.join("characters.ron"))
    }

    /// Load encounters from `encounters.ron`.
    pub fn load_encounters(&self) -> LoadResult<Vec<Encounter>> {
        EncounterLoader::load(&self.data_dir.join("encounters.ron"))
    }

    /// Every spell, archetype and level mentioned by one file must exist in
    /// the others.
    fn check_references(content: &GameContent) -> LoadResult<()> {
        let spells: HashSet<&SpellId> = content.spells.iter().map(|spell| &spell.id).collect();
        let max_level = content.config.max_spell_level;

        let books = content
            .archetypes
            .iter()
            .map(|a| (a.id.0.as_str(), &a.spells))
            .chain(content.characters.iter().map(|c| (c.id.0.as_str(), &c.spells)));
        for (owner, book) in books {
            if book.len() > GameConfig::MAX_SPELLS {
                anyhow::bail!("'{}' knows more than {} spells", owner, GameConfig::MAX_SPELLS);
            }
            for known in book {
                if !spells.contains(&known.spell) {
                    anyhow::bail!("'{}' knows unknown spell '{}'", owner, known.spell);
                }
                if known.level == 0 || known.level > max_level {
                    anyhow::bail!(
                        "'{}' knows '{}' at level {} outside 1..={}",
                        owner,
                        known.spell,
                        known.level,
                        max_level
                    );
                }
            }
        }

        for encounter in &content.encounters {
            if encounter.enemies.len() > content.config.max_enemies as usize {
                anyhow::bail!(
                    "Encounter '{}' exceeds the limit of {} enemies",
                    encounter.id,
                    content.config.max_enemies
                );
            }
            for enemy in &encounter.enemies {
                if !content.archetypes.iter().any(|a| &a.id == enemy) {
                    anyhow::bail!(
                        "Encounter '{}' references unknown archetype '{}'",
                        encounter.id,
                        enemy
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipped_data() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    #[test]
    fn shipped_data_loads() {
        let content = ContentFactory::load_dir(shipped_data()).unwrap();
        assert!(!content.spells.is_empty());
        assert!(content.character("hero").is_some());
        assert!(content.encounter("cellar").is_some());
    }

    #[test]
    fn unknown_archetype_reference_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        for file in ["spells.ron", "archetypes.ron", "characters.ron"] {
            std::fs::copy(shipped_data().join(file), dir.path().join(file)).unwrap();
        }
        std::fs::write(
            dir.path().join("encounters.ron"),
            r#"(encounters: [(id: "x", name: "X", layout: ["PE"], enemies: ["dragon"])])"#,
        )
        .unwrap();

        let err = ContentFactory::load_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains("dragon"));
    }

    #[test]
    fn spell_level_above_cap_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        for file in ["spells.ron", "archetypes.ron", "encounters.ron"] {
            std::fs::copy(shipped_data().join(file), dir.path().join(file)).unwrap();
        }
        std::fs::write(dir.path().join("config.toml"), "max_spell_level = 2\n").unwrap();
        std::fs::write(
            dir.path().join("characters.ron"),
            r#"(characters: [(
                id: "hero", name: "Hero", level: 1, max_hp: 40,
                action_points: 6, movement_points: 3,
                spells: [(spell: "ember", level: 3)],
            )])"#,
        )
        .unwrap();

        let err = ContentFactory::load_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains("level 3"));
    }
}
