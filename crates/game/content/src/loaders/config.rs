//! Game configuration loader.

use std::path::Path;

use game_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.max_spell_level == 0 {
            anyhow::bail!("max_spell_level must be at least 1");
        }
        if config.cell_size == 0 {
            anyhow::bail!("cell_size must be positive");
        }
        if config.basic_attack_variance < 0 {
            anyhow::bail!("basic_attack_variance must not be negative");
        }

        Ok(config)
    }
}
