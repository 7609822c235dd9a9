//! Runtime wrappers around static game content oracles.
//!
//! These implementations expose `game-core` oracle traits and bundle them into
//! an [`OracleManager`] so the runtime can build [`game_core::Env`] snapshots
//! on demand. The data is immutable at runtime; dynamic state lives in the
//! [`game_core::CombatSession`] and the repositories.
mod archetypes;
mod characters;
mod config;
mod spells;

use std::sync::Arc;

use game_content::GameContent;
use game_core::{Env, GameConfig, GameEnv, PcgRng};

pub use archetypes::ArchetypeOracleImpl;
pub use characters::CharacterOracleImpl;
pub use config::ConfigOracleImpl;
pub use spells::SpellOracleImpl;

/// Manages all oracle implementations and provides unified access
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) spells: Arc<SpellOracleImpl>,
    pub(crate) archetypes: Arc<ArchetypeOracleImpl>,
    pub(crate) characters: Arc<CharacterOracleImpl>,
    pub(crate) config: Arc<ConfigOracleImpl>,
    pub(crate) rng: PcgRng,
}

impl OracleManager {
    /// Creates a new oracle manager
    pub fn new(
        spells: Arc<SpellOracleImpl>,
        archetypes: Arc<ArchetypeOracleImpl>,
        characters: Arc<CharacterOracleImpl>,
        config: Arc<ConfigOracleImpl>,
    ) -> Self {
        Self {
            spells,
            archetypes,
            characters,
            config,
            rng: PcgRng,
        }
    }

    /// Builds every oracle from loaded content.
    pub fn from_content(content: &GameContent) -> Self {
        Self::new(
            Arc::new(SpellOracleImpl::from_spells(content.spells.iter().cloned())),
            Arc::new(ArchetypeOracleImpl::from_archetypes(
                content.archetypes.iter().cloned(),
            )),
            Arc::new(CharacterOracleImpl::from_sheets(
                content.characters.iter().cloned(),
            )),
            Arc::new(ConfigOracleImpl::new(content.config.clone())),
        )
    }

    /// Converts oracle manager into GameEnv for game-core
    pub fn as_game_env(&self) -> GameEnv<'_> {
        Env::with_all(
            self.spells.as_ref(),
            self.archetypes.as_ref(),
            self.config.as_ref(),
            &self.rng,
        )
        .into_game_env()
    }

    pub fn characters(&self) -> &CharacterOracleImpl {
        &self.characters
    }

    pub fn game_config(&self) -> &GameConfig {
        self.config.config()
    }
}
