//! Content loaders for reading game data from files.
//!
//! Each loader turns one RON/TOML file into game-core types. The
//! [`ContentFactory`] loads a whole data directory and cross-checks the
//! references between files.

pub mod archetypes;
pub mod characters;
pub mod config;
pub mod encounters;
pub mod factory;
pub mod spells;

pub use archetypes::ArchetypeLoader;
pub use characters::CharacterLoader;
pub use config::ConfigLoader;
pub use encounters::EncounterLoader;
pub use factory::{ContentFactory, GameContent};
pub use spells::SpellLoader;

use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;
use std::path::Path;

use serde::de::DeserializeOwned;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Reads and parses a RON file; `what` names the content in error messages.
pub(crate) fn read_ron<T: DeserializeOwned>(path: &Path, what: &str) -> LoadResult<T> {
    let content = read_file(path)?;
    ron::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {} RON at {}: {}", what, path.display(), e))
}

/// Fails on the first id that appears twice.
pub(crate) fn ensure_unique<'a, K>(what: &str, ids: impl IntoIterator<Item = &'a K>) -> LoadResult<()>
where
    K: Eq + Hash + Display + 'a,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            anyhow::bail!("Duplicate {} id '{}'", what, id);
        }
    }
    Ok(())
}
