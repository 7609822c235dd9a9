//! Data-driven content definitions and loaders.
//!
//! This crate reads the static combat content from RON/TOML data files:
//! - Spell catalog (RON)
//! - Enemy archetypes and their loot tables (RON)
//! - Character sheets (RON)
//! - Encounters: ASCII battlefield layouts plus enemy lists (RON)
//! - Combat configuration (TOML)
//!
//! Content is consumed by runtime oracles and never appears in combat state
//! except through the ids the state stores.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ArchetypeLoader, CharacterLoader, ConfigLoader, ContentFactory, EncounterLoader, GameContent,
    LoadResult, SpellLoader,
};
