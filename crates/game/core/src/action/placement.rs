//! Positioning-phase placement onto the player's spawn zone.

use crate::env::GameEnv;
use crate::error::{ErrorContext, ErrorSeverity, GameError, RefusalKind};
use crate::grid::GridError;
use crate::state::{CombatState, EntityId, Phase, Position, Team};

use super::{ActionTransition, ActorError};

/// Relocates a player-controlled combatant to another free cell of the
/// player spawn zone. Only valid while positioning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaceAction {
    pub actor: EntityId,
    pub target: Position,
}

impl PlaceAction {
    pub fn new(actor: EntityId, target: Position) -> Self {
        Self { actor, target }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaceOutcome {
    pub from: Position,
    pub to: Position,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlacementError {
    #[error(transparent)]
    Actor(#[from] ActorError),

    #[error("{0} cannot be positioned by the player")]
    NotPlayerControlled(EntityId),

    #[error("{0} is not a player spawn cell")]
    NotSpawnCell(Position),

    #[error("spawn cell {position} is occupied by {occupant}")]
    Occupied {
        position: Position,
        occupant: EntityId,
    },

    #[error("occupancy update failed: {error}")]
    Grid {
        error: GridError,
        #[cfg_attr(feature = "serde", serde(skip))]
        context: ErrorContext,
    },
}

impl GameError for PlacementError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Actor(error) => error.severity(),
            Self::NotPlayerControlled(_) | Self::NotSpawnCell(_) => ErrorSeverity::Validation,
            Self::Occupied { .. } => ErrorSeverity::Recoverable,
            Self::Grid { .. } => ErrorSeverity::Internal,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::Actor(error) => error.context(),
            Self::Grid { context, .. } => Some(context),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Actor(error) => error.error_code(),
            Self::NotPlayerControlled(_) => "PLACE_NOT_PLAYER_CONTROLLED",
            Self::NotSpawnCell(_) => "PLACE_NOT_SPAWN_CELL",
            Self::Occupied { .. } => "PLACE_OCCUPIED",
            Self::Grid { .. } => "PLACE_GRID_DESYNC",
        }
    }

    fn refusal(&self) -> Option<RefusalKind> {
        match self {
            Self::Actor(error) => error.refusal(),
            Self::NotPlayerControlled(_) => Some(RefusalKind::NotYourTurn),
            Self::NotSpawnCell(_) => Some(RefusalKind::InvalidTarget),
            Self::Occupied { .. } => Some(RefusalKind::AlreadyOccupied),
            Self::Grid { .. } => None,
        }
    }
}

impl ActionTransition for PlaceAction {
    type Error = PlacementError;
    type Result = PlaceOutcome;

    fn actor(&self) -> EntityId {
        self.actor
    }

    fn pre_validate(&self, state: &CombatState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let context = ErrorContext::new(state.turn.nonce)
            .with_actor(self.actor)
            .with_position(self.target);
        if state.turn.phase != Phase::Positioning {
            return Err(ActorError::WrongPhase {
                phase: state.turn.phase,
                context,
            }
            .into());
        }

        let combatant = state.combatant(self.actor).ok_or(ActorError::Missing {
            actor: self.actor,
            context,
        })?;
        if !combatant.is_player_controlled() {
            return Err(PlacementError::NotPlayerControlled(self.actor));
        }
        if !combatant.alive {
            return Err(ActorError::Dead {
                actor: self.actor,
                context,
            }
            .into());
        }

        let cell = state
            .grid
            .cell(self.target)
            .filter(|cell| cell.spawn_zone == Some(Team::Player) && cell.is_walkable())
            .ok_or(PlacementError::NotSpawnCell(self.target))?;
        if let Some(occupant) = cell.occupant {
            return Err(PlacementError::Occupied {
                position: self.target,
                occupant,
            });
        }
        Ok(())
    }

    fn apply(&self, state: &mut CombatState, _env: &GameEnv<'_>) -> Result<PlaceOutcome, Self::Error> {
        let context = ErrorContext::new(state.turn.nonce)
            .with_actor(self.actor)
            .with_position(self.target);
        let from = state
            .combatant(self.actor)
            .map(|combatant| combatant.position)
            .ok_or(ActorError::Missing {
                actor: self.actor,
                context,
            })?;

        state
            .grid
            .relocate(self.actor, from, self.target)
            .map_err(|error| PlacementError::Grid { error, context })?;
        if let Some(combatant) = state.combatant_mut(self.actor) {
            combatant.position = self.target;
        }

        Ok(PlaceOutcome {
            from,
            to: self.target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::testing::player_at;

    fn positioning_state() -> CombatState {
        let grid = Grid::from_rows(&[
            "PPP.....",
            "........",
            "........",
            "........",
            "........",
            ".....P..",
            "......EE",
        ])
        .unwrap();
        let mut state = CombatState::new(grid, 3);
        state.spawn(player_at(Position::new(0, 0))).unwrap();
        state
    }

    #[test]
    fn placing_twice_on_the_same_cell_is_already_occupied() {
        let mut state = positioning_state();
        let env = GameEnv::empty();
        let action = PlaceAction::new(EntityId::PLAYER, Position::new(5, 5));

        action.pre_validate(&state, &env).unwrap();
        let outcome = action.apply(&mut state, &env).unwrap();
        assert_eq!(outcome.from, Position::new(0, 0));
        assert_eq!(state.player().unwrap().position, Position::new(5, 5));

        let err = action.pre_validate(&state, &env).unwrap_err();
        assert_eq!(err.refusal(), Some(RefusalKind::AlreadyOccupied));
        assert_eq!(state.grid.occupant(Position::new(0, 0)), None);
        assert!(state.occupancy_consistent());
    }

    #[test]
    fn cells_outside_the_player_zone_are_invalid() {
        let state = positioning_state();
        let env = GameEnv::empty();
        for target in [Position::new(3, 3), Position::new(6, 6), Position::new(40, 0)] {
            let err = PlaceAction::new(EntityId::PLAYER, target)
                .pre_validate(&state, &env)
                .unwrap_err();
            assert_eq!(err.refusal(), Some(RefusalKind::InvalidTarget));
        }
    }

    #[test]
    fn placement_is_rejected_once_combat_started() {
        let mut state = positioning_state();
        state.turn.phase = Phase::Playing;
        let env = GameEnv::empty();
        let err = PlaceAction::new(EntityId::PLAYER, Position::new(1, 0))
            .pre_validate(&state, &env)
            .unwrap_err();
        assert_eq!(err.refusal(), Some(RefusalKind::WrongPhase));
    }
}
