//! Encounter loader.
//!
//! An encounter is an ASCII battlefield plus the enemies spawned on it:
//!
//! ```ron
//! (encounters: [
//!     (
//!         id: "cellar",
//!         name: "Cellar",
//!         layout: [
//!             "PP....",
//!             "..##..",
//!             "....EE",
//!         ],
//!         enemies: ["rat", "rat"],
//!     ),
//! ])
//! ```

use std::path::Path;

use game_core::{Encounter, Team};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, ensure_unique, read_ron};

/// Encounter list structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterCatalog {
    pub encounters: Vec<Encounter>,
}

/// Loader for encounter definitions.
pub struct EncounterLoader;

impl EncounterLoader {
    /// Loads encounters and checks that every layout parses and has room for
    /// the player and each listed enemy.
    pub fn load(path: &Path) -> LoadResult<Vec<Encounter>> {
        let catalog: EncounterCatalog = read_ron(path, "encounter catalog")?;
        ensure_unique("encounter", catalog.encounters.iter().map(|e| &e.id))?;

        for encounter in &catalog.encounters {
            let grid = encounter
                .grid()
                .map_err(|e| anyhow::anyhow!("Encounter '{}' layout: {}", encounter.id, e))?;
            if grid.spawn_zones(Team::Player).is_empty() {
                anyhow::bail!("Encounter '{}' has no player spawn cell", encounter.id);
            }
            let enemy_cells = grid.spawn_zones(Team::Enemy).len();
            if enemy_cells < encounter.enemies.len() {
                anyhow::bail!(
                    "Encounter '{}' lists {} enemies but has {} enemy spawn cells",
                    encounter.id,
                    encounter.enemies.len(),
                    enemy_cells
                );
            }
        }

        tracing::debug!(
            count = catalog.encounters.len(),
            path = %path.display(),
            "loaded encounters"
        );
        Ok(catalog.encounters)
    }
}
