use arrayvec::ArrayVec;

use crate::config::GameConfig;

use super::{CombatantState, EntityId, Team};

/// Arena of every combatant in the session, kept sorted by id.
///
/// Grid cells refer to combatants by [`EntityId`] only, so nothing in the
/// state owns a back-reference.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantArena {
    combatants: ArrayVec<CombatantState, { GameConfig::MAX_COMBATANTS }>,
}

impl CombatantArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a combatant, keeping id order. Returns it back when the arena
    /// is full or the id is taken.
    pub fn insert(&mut self, combatant: CombatantState) -> Result<(), Box<CombatantState>> {
        match self.index_of(combatant.id) {
            Ok(_) => Err(Box::new(combatant)),
            Err(index) => {
                if self.combatants.is_full() {
                    return Err(Box::new(combatant));
                }
                self.combatants.insert(index, combatant);
                Ok(())
            }
        }
    }

    fn index_of(&self, id: EntityId) -> Result<usize, usize> {
        self.combatants
            .binary_search_by_key(&id, |combatant| combatant.id)
    }

    pub fn get(&self, id: EntityId) -> Option<&CombatantState> {
        self.index_of(id).ok().map(|index| &self.combatants[index])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut CombatantState> {
        self.index_of(id).ok().map(|index| &mut self.combatants[index])
    }

    pub fn player(&self) -> Option<&CombatantState> {
        self.combatants
            .iter()
            .find(|combatant| combatant.is_player_controlled())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatantState> {
        self.combatants.iter()
    }

    pub fn living(&self) -> impl Iterator<Item = &CombatantState> {
        self.combatants.iter().filter(|combatant| combatant.alive)
    }

    pub fn living_on(&self, team: Team) -> impl Iterator<Item = &CombatantState> {
        self.living().filter(move |combatant| combatant.team == team)
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(|combatant| combatant.alive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ArchetypeId, CombatantKind, Position};

    fn enemy(id: u32) -> CombatantState {
        CombatantState::new(
            EntityId(id),
            "grub",
            CombatantKind::Enemy {
                archetype: ArchetypeId::new("grub"),
            },
            Position::new(id as i32, 0),
            10,
            6,
            3,
        )
    }

    #[test]
    fn insertion_keeps_id_order_and_rejects_duplicates() {
        let mut arena = CombatantArena::new();
        arena.insert(enemy(3)).unwrap();
        arena.insert(enemy(1)).unwrap();
        arena.insert(enemy(2)).unwrap();
        assert!(arena.insert(enemy(2)).is_err());

        let ids: Vec<_> = arena.iter().map(|c| c.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(arena.get(EntityId(2)).map(|c| c.id), Some(EntityId(2)));
        assert!(arena.get(EntityId(9)).is_none());
    }

    #[test]
    fn living_filters_dead_combatants() {
        let mut arena = CombatantArena::new();
        arena.insert(enemy(1)).unwrap();
        arena.insert(enemy(2)).unwrap();
        arena.get_mut(EntityId(1)).unwrap().take_damage(100);

        assert!(!arena.is_alive(EntityId(1)));
        assert_eq!(arena.living_on(Team::Enemy).count(), 1);
    }
}
