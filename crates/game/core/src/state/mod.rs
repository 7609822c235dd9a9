//! Authoritative combat state representation.
//!
//! This module owns the combatant arena, the grid occupancy and the turn
//! bookkeeping. Runtime layers clone or query this state but mutate it
//! exclusively through the engine.
mod combatant;
mod common;
mod entities;
mod turn;

pub use combatant::{
    ArchetypeId, CharacterId, Characteristics, CombatStats, CombatantKind, CombatantState,
    DamageBonus, Resistances, SpellBook, SpellSlot, TurnFlags,
};
pub use common::{EntityId, Position, ResourceMeter, Team};
pub use entities::CombatantArena;
pub use turn::{Phase, TurnState};

use crate::grid::{Grid, GridError};

/// Errors raised while seeding a state with combatants.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitializationError {
    #[error("combatant {0} already exists or the arena is full")]
    ArenaRejected(EntityId),

    #[error("cannot place combatant: {0}")]
    Placement(#[from] GridError),
}

/// Canonical snapshot of one combat.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatState {
    /// RNG seed for deterministic random generation.
    ///
    /// Set once when the session is created and never modified.
    /// Combined with `turn.nonce` to generate unique seeds for each roll.
    pub game_seed: u64,

    /// Sequential entity ID allocator. Id 0 is reserved for the player.
    next_entity_id: u32,

    pub turn: TurnState,
    pub combatants: CombatantArena,
    pub grid: Grid,
}

impl CombatState {
    /// Creates a state on `grid` with no combatants.
    pub fn new(grid: Grid, game_seed: u64) -> Self {
        Self {
            game_seed,
            next_entity_id: 1,
            turn: TurnState::new(),
            combatants: CombatantArena::new(),
            grid,
        }
    }

    /// Allocates a fresh, never reused entity id.
    pub fn allocate_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    /// Adds a combatant and claims its cell in one step.
    ///
    /// Either both succeed or nothing changes.
    pub fn spawn(&mut self, combatant: CombatantState) -> Result<(), InitializationError> {
        let id = combatant.id;
        let position = combatant.position;
        if self.combatants.get(id).is_some() {
            return Err(InitializationError::ArenaRejected(id));
        }
        self.grid.can_claim(position, id)?;
        self.combatants
            .insert(combatant)
            .map_err(|rejected| InitializationError::ArenaRejected(rejected.id))?;
        self.grid.claim(position, id)?;
        if id.0 >= self.next_entity_id {
            self.next_entity_id = id.0 + 1;
        }
        Ok(())
    }

    pub fn combatant(&self, id: EntityId) -> Option<&CombatantState> {
        self.combatants.get(id)
    }

    pub fn combatant_mut(&mut self, id: EntityId) -> Option<&mut CombatantState> {
        self.combatants.get_mut(id)
    }

    pub fn player(&self) -> Option<&CombatantState> {
        self.combatants.player()
    }

    /// Living combatant standing on `position`, if any.
    pub fn living_occupant(&self, position: Position) -> Option<&CombatantState> {
        self.grid
            .occupant(position)
            .and_then(|id| self.combatants.get(id))
            .filter(|combatant| combatant.alive)
    }

    /// Checks the occupancy invariants: every living combatant holds exactly
    /// its own cell and every held cell belongs to a living combatant standing
    /// there.
    pub fn occupancy_consistent(&self) -> bool {
        let cells_ok = self.grid.occupancy().all(|(position, id)| {
            self.combatants
                .get(id)
                .is_some_and(|combatant| combatant.alive && combatant.position == position)
        });
        let combatants_ok = self
            .combatants
            .living()
            .all(|combatant| self.grid.occupant(combatant.position) == Some(combatant.id));
        cells_ok && combatants_ok
    }
}
