//! Enemy archetype loader.

use std::path::Path;

use game_core::EnemyArchetype;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, ensure_unique, read_ron};

/// Archetype catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeCatalog {
    pub archetypes: Vec<EnemyArchetype>,
}

/// Loader for enemy archetypes and their loot tables.
pub struct ArchetypeLoader;

impl ArchetypeLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<EnemyArchetype>> {
        let catalog: ArchetypeCatalog = read_ron(path, "archetype catalog")?;
        ensure_unique("archetype", catalog.archetypes.iter().map(|a| &a.id))?;

        for archetype in &catalog.archetypes {
            if archetype.hp == 0 {
                anyhow::bail!("Archetype '{}' has no hit points", archetype.id);
            }
            if let Some(loot) = &archetype.loot {
                for category in game_core::LootCategory::ALL {
                    if loot.base_chance(category) > 100 {
                        anyhow::bail!(
                            "Archetype '{}' {} chance exceeds 100%",
                            archetype.id,
                            category
                        );
                    }
                }
            }
        }

        tracing::debug!(
            count = catalog.archetypes.len(),
            path = %path.display(),
            "loaded archetypes"
        );
        Ok(catalog.archetypes)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use game_core::{ArchetypeTier, LootTable};

    use super::*;

    #[test]
    fn explicit_table_overrides_the_tier_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"(archetypes: [
                (id: "rat", name: "Rat", hp: 12, action_points: 4, movement_points: 3, experience: 20),
                (
                    id: "warden", name: "Warden", tier: Boss, hp: 90,
                    action_points: 6, movement_points: 2,
                    spells: [(spell: "quake", level: 2)],
                    loot: Some((currency: Some((chance_percent: 100, amount: (min: 40, max: 40))))),
                ),
            ])"#
        )
        .unwrap();

        let archetypes = ArchetypeLoader::load(file.path()).unwrap();
        let rat = &archetypes[0];
        assert_eq!(rat.tier, ArchetypeTier::Basic);
        assert_eq!(rat.level, 1);
        assert_eq!(*rat.loot_table(), LootTable::for_tier(ArchetypeTier::Basic));

        let warden = &archetypes[1];
        assert_eq!(warden.spells[0].level, 2);
        let table = warden.loot_table();
        assert_eq!(table.currency.as_ref().unwrap().amount.min, 40);
        assert!(table.equipment.is_none());
    }

    #[test]
    fn rejects_chance_above_one_hundred() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"(archetypes: [(
                id: "cheat", name: "Cheat", hp: 1, action_points: 1, movement_points: 1,
                loot: Some((currency: Some((chance_percent: 150, amount: (min: 1, max: 1))))),
            )])"#
        )
        .unwrap();
        assert!(ArchetypeLoader::load(file.path()).is_err());
    }
}
