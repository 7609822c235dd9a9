//! Spell catalog loader.

use std::path::Path;

use game_core::Spell;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, ensure_unique, read_ron};

/// Spell catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellCatalog {
    pub spells: Vec<Spell>,
}

/// Loader for the spell catalog.
pub struct SpellLoader;

impl SpellLoader {
    /// Load every spell template from a RON file.
    ///
    /// Templates are stored at level 1; the level a combatant knows a spell
    /// at lives in its spell book.
    pub fn load(path: &Path) -> LoadResult<Vec<Spell>> {
        let catalog: SpellCatalog = read_ron(path, "spell catalog")?;
        Self::validate(&catalog.spells)?;
        tracing::debug!(count = catalog.spells.len(), path = %path.display(), "loaded spells");
        Ok(catalog.spells)
    }

    fn validate(spells: &[Spell]) -> LoadResult<()> {
        ensure_unique("spell", spells.iter().map(|spell| &spell.id))?;
        for spell in spells {
            if spell.level != 1 {
                anyhow::bail!("Spell '{}' template must be level 1", spell.id);
            }
            if spell.min_range > spell.range {
                anyhow::bail!(
                    "Spell '{}' minimum range {} exceeds range {}",
                    spell.id,
                    spell.min_range,
                    spell.range
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use game_core::{DamageRange, EffectShape, Element};

    use super::*;

    fn write(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_damage_ranges_and_shapes() {
        let file = write(
            r#"(
                spells: [
                    (id: "ember", name: "Ember", ap_cost: 3, range: 5, element: Fire, base_damage: "20-30"),
                    (
                        id: "quake", name: "Quake", ap_cost: 4, range: 4, cooldown: Some(2),
                        element: Earth, base_damage: "10-14",
                        shape: Square(radius: 1, falloff_percent: 20),
                    ),
                ],
            )"#,
        );
        let spells = SpellLoader::load(file.path()).unwrap();
        assert_eq!(spells.len(), 2);
        assert_eq!(spells[0].base_damage, DamageRange::new(20, 30));
        assert_eq!(spells[0].scaling_percent, 20);
        assert_eq!(spells[1].element, Element::Earth);
        assert_eq!(
            spells[1].shape,
            EffectShape::Square {
                radius: 1,
                falloff_percent: 20
            }
        );
    }

    #[test]
    fn rejects_duplicates_and_inverted_ranges() {
        let duplicate = write(
            r#"(spells: [
                (id: "a", name: "A", ap_cost: 1, range: 1, element: Air, base_damage: "1-2"),
                (id: "a", name: "A", ap_cost: 1, range: 1, element: Air, base_damage: "1-2"),
            ])"#,
        );
        assert!(SpellLoader::load(duplicate.path()).is_err());

        let inverted = write(
            r#"(spells: [(id: "a", name: "A", ap_cost: 1, range: 1, element: Air, base_damage: "9-2")])"#,
        );
        assert!(SpellLoader::load(inverted.path()).is_err());
    }
}
