#![allow(dead_code)]

use std::collections::BTreeMap;

use game_core::{
    ArchetypeId, ArchetypeOracle, CharacterSheet, DamageRange, EffectShape, Element,
    EnemyArchetype, Env, GameConfig, GameEnv, PcgRng, Spell, SpellId, SpellOracle,
};

/// In-memory content used by the integration suites.
pub struct Catalog {
    spells: BTreeMap<SpellId, Spell>,
    archetypes: BTreeMap<ArchetypeId, EnemyArchetype>,
    pub config: GameConfig,
    rng: PcgRng,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            spells: BTreeMap::new(),
            archetypes: BTreeMap::new(),
            config: GameConfig::default(),
            rng: PcgRng,
        }
    }

    pub fn standard() -> Self {
        Self::new()
            .with_spell(Spell::new(
                "ember",
                "Ember",
                Element::Fire,
                DamageRange::new(20, 30),
                3,
                5,
            ))
            .with_spell(
                Spell::new("quake", "Quake", Element::Earth, DamageRange::new(10, 14), 4, 4)
                    .with_cooldown(2)
                    .with_shape(EffectShape::Square {
                        radius: 1,
                        falloff_percent: 20,
                    }),
            )
            .with_archetype(EnemyArchetype::new("rat", "Rat", 12, 4, 3).with_experience(20))
            .with_archetype(EnemyArchetype::new("statue", "Statue", 30, 6, 0).with_experience(50))
    }

    pub fn with_spell(mut self, spell: Spell) -> Self {
        self.spells.insert(spell.id.clone(), spell);
        self
    }

    pub fn with_archetype(mut self, archetype: EnemyArchetype) -> Self {
        self.archetypes.insert(archetype.id.clone(), archetype);
        self
    }

    pub fn env(&self) -> GameEnv<'_> {
        Env::with_all(self, self, &self.config, &self.rng).into_game_env()
    }
}

impl SpellOracle for Catalog {
    fn spell(&self, id: &SpellId) -> Option<Spell> {
        self.spells.get(id).cloned()
    }
}

impl ArchetypeOracle for Catalog {
    fn archetype(&self, id: &ArchetypeId) -> Option<EnemyArchetype> {
        self.archetypes.get(id).cloned()
    }
}

pub fn hero() -> CharacterSheet {
    CharacterSheet::new("hero", "Hero", 80, 6, 3)
        .with_spell("ember", 1)
        .with_spell("quake", 1)
}
