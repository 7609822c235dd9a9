//! Traits describing read-only combat data.
//!
//! Oracles expose spell templates, enemy archetypes, character sheets, the
//! combat rules and the random source. The [`Env`] aggregate bundles the ones
//! the engine needs so actions can read them without hard coupling to
//! concrete implementations.
mod archetypes;
mod characters;
mod config;
mod error;
mod rng;
mod spells;

pub use archetypes::{ArchetypeOracle, EnemyArchetype, KnownSpell};
pub use characters::{CharacterOracle, CharacterSheet};
pub use config::ConfigOracle;
pub use error::OracleError;
pub use rng::{PcgRng, RngOracle, RollStream, compute_seed};
pub use spells::SpellOracle;

use crate::combat::{Spell, SpellId};
use crate::config::GameConfig;
use crate::state::ArchetypeId;

/// Aggregates read-only oracles required by the engine and action pipeline.
#[derive(Debug)]
pub struct Env<'a, S, A, C, R>
where
    S: SpellOracle + ?Sized,
    A: ArchetypeOracle + ?Sized,
    C: ConfigOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    spells: Option<&'a S>,
    archetypes: Option<&'a A>,
    config: Option<&'a C>,
    rng: Option<&'a R>,
}

impl<S, A, C, R> Clone for Env<'_, S, A, C, R>
where
    S: SpellOracle + ?Sized,
    A: ArchetypeOracle + ?Sized,
    C: ConfigOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, A, C, R> Copy for Env<'_, S, A, C, R>
where
    S: SpellOracle + ?Sized,
    A: ArchetypeOracle + ?Sized,
    C: ConfigOracle + ?Sized,
    R: RngOracle + ?Sized,
{
}

pub type GameEnv<'a> = Env<
    'a,
    dyn SpellOracle + 'a,
    dyn ArchetypeOracle + 'a,
    dyn ConfigOracle + 'a,
    dyn RngOracle + 'a,
>;

impl<'a, S, A, C, R> Env<'a, S, A, C, R>
where
    S: SpellOracle + ?Sized,
    A: ArchetypeOracle + ?Sized,
    C: ConfigOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    pub fn new(
        spells: Option<&'a S>,
        archetypes: Option<&'a A>,
        config: Option<&'a C>,
        rng: Option<&'a R>,
    ) -> Self {
        Self {
            spells,
            archetypes,
            config,
            rng,
        }
    }

    pub fn with_all(spells: &'a S, archetypes: &'a A, config: &'a C, rng: &'a R) -> Self {
        Self::new(Some(spells), Some(archetypes), Some(config), Some(rng))
    }

    pub fn empty() -> Self {
        Self {
            spells: None,
            archetypes: None,
            config: None,
            rng: None,
        }
    }

    /// Returns the SpellOracle, or an error if not available.
    pub fn spells(&self) -> Result<&'a S, OracleError> {
        self.spells.ok_or(OracleError::SpellsNotAvailable)
    }

    /// Returns the ArchetypeOracle, or an error if not available.
    pub fn archetypes(&self) -> Result<&'a A, OracleError> {
        self.archetypes.ok_or(OracleError::ArchetypesNotAvailable)
    }

    /// Returns the ConfigOracle, or an error if not available.
    pub fn config(&self) -> Result<&'a C, OracleError> {
        self.config.ok_or(OracleError::ConfigNotAvailable)
    }

    /// Returns the RngOracle, or an error if not available.
    pub fn rng(&self) -> Result<&'a R, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }

    /// Combat rules from the config oracle.
    pub fn rules(&self) -> Result<&'a GameConfig, OracleError> {
        Ok(self.config()?.game_config())
    }

    /// Looks up a spell template, failing on unknown ids.
    pub fn spell(&self, id: &SpellId) -> Result<Spell, OracleError> {
        self.spells()?
            .spell(id)
            .ok_or_else(|| OracleError::SpellNotFound(id.clone()))
    }

    /// Looks up an archetype, failing on unknown ids.
    pub fn archetype(&self, id: &ArchetypeId) -> Result<EnemyArchetype, OracleError> {
        self.archetypes()?
            .archetype(id)
            .ok_or_else(|| OracleError::ArchetypeNotFound(id.clone()))
    }
}

impl<'a, S, A, C, R> Env<'a, S, A, C, R>
where
    S: SpellOracle + 'a,
    A: ArchetypeOracle + 'a,
    C: ConfigOracle + 'a,
    R: RngOracle + 'a,
{
    /// Converts this environment into a trait-object based `GameEnv` (consumes self).
    pub fn into_game_env(self) -> GameEnv<'a> {
        self.as_game_env()
    }

    /// Converts this environment into a trait-object based `GameEnv` (borrows self).
    pub fn as_game_env(&self) -> GameEnv<'a> {
        let spells: Option<&'a dyn SpellOracle> = self.spells.map(|spells| spells as _);
        let archetypes: Option<&'a dyn ArchetypeOracle> =
            self.archetypes.map(|archetypes| archetypes as _);
        let config: Option<&'a dyn ConfigOracle> = self.config.map(|config| config as _);
        let rng: Option<&'a dyn RngOracle> = self.rng.map(|rng| rng as _);
        Env::new(spells, archetypes, config, rng)
    }
}
