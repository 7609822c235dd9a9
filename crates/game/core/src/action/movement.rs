//! Grid movement along a shortest path.

use crate::env::GameEnv;
use crate::error::{ErrorContext, ErrorSeverity, GameError, RefusalKind};
use crate::grid::GridError;
use crate::state::{CombatState, EntityId, Position, TurnFlags};

use super::{ActionTransition, ActorError, active_combatant};

/// Moves the actor to `destination`, paying one MP per step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveAction {
    pub actor: EntityId,
    pub destination: Position,
}

impl MoveAction {
    pub fn new(actor: EntityId, destination: Position) -> Self {
        Self { actor, destination }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveOutcome {
    pub from: Position,
    pub to: Position,
    /// Cells walked, including both ends.
    pub path: Vec<Position>,
    pub cost: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveError {
    #[error(transparent)]
    Actor(#[from] ActorError),

    #[error("destination {0} is outside the grid")]
    OutOfBounds(Position),

    #[error("destination {0} is not walkable")]
    NotWalkable(Position),

    #[error("destination {position} is occupied by {occupant}")]
    Occupied {
        position: Position,
        occupant: EntityId,
    },

    #[error("no movement points left")]
    NoMovementPoints,

    #[error("no path to {0}")]
    Unreachable(Position),

    #[error("reaching {destination} costs {required} MP, only {available} available")]
    TooFar {
        destination: Position,
        required: u32,
        available: u32,
    },

    #[error("occupancy update failed: {error}")]
    Grid {
        error: GridError,
        #[cfg_attr(feature = "serde", serde(skip))]
        context: ErrorContext,
    },
}

impl GameError for MoveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Actor(error) => error.severity(),
            Self::OutOfBounds(_) | Self::NotWalkable(_) | Self::Unreachable(_) => {
                ErrorSeverity::Validation
            }
            Self::Occupied { .. } | Self::NoMovementPoints | Self::TooFar { .. } => {
                ErrorSeverity::Recoverable
            }
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
            Self::OutOfBounds(_) => "MOVE_OUT_OF_BOUNDS",
            Self::NotWalkable(_) => "MOVE_NOT_WALKABLE",
            Self::Occupied { .. } => "MOVE_OCCUPIED",
            Self::NoMovementPoints => "MOVE_NO_MOVEMENT_POINTS",
            Self::Unreachable(_) => "MOVE_UNREACHABLE",
            Self::TooFar { .. } => "MOVE_TOO_FAR",
            Self::Grid { .. } => "MOVE_GRID_DESYNC",
        }
    }

    fn refusal(&self) -> Option<RefusalKind> {
        match self {
            Self::Actor(error) => error.refusal(),
            Self::OutOfBounds(_) | Self::NotWalkable(_) | Self::Unreachable(_) => {
                Some(RefusalKind::InvalidTarget)
            }
            Self::Occupied { .. } => Some(RefusalKind::AlreadyOccupied),
            Self::NoMovementPoints | Self::TooFar { .. } => Some(RefusalKind::InsufficientResource),
            Self::Grid { .. } => None,
        }
    }
}

impl MoveAction {
    /// Shortest affordable path, or the refusal explaining why there is none.
    fn plan(&self, state: &CombatState) -> Result<Vec<Position>, MoveError> {
        let mover = active_combatant(state, self.actor)?;
        let grid = &state.grid;
        let destination = self.destination;

        let cell = grid
            .cell(destination)
            .ok_or(MoveError::OutOfBounds(destination))?;
        if let Some(occupant) = cell.occupant {
            return Err(MoveError::Occupied {
                position: destination,
                occupant,
            });
        }
        if !cell.is_walkable() {
            return Err(MoveError::NotWalkable(destination));
        }

        let available = mover.movement_points.current;
        if available == 0 {
            return Err(MoveError::NoMovementPoints);
        }

        let path = grid.find_path(mover.position, destination, available);
        if !path.is_empty() {
            return Ok(path);
        }

        let unbounded = grid.width().saturating_mul(grid.height());
        let detour = grid.find_path(mover.position, destination, unbounded);
        if detour.is_empty() {
            Err(MoveError::Unreachable(destination))
        } else {
            Err(MoveError::TooFar {
                destination,
                required: step_count(&detour),
                available,
            })
        }
    }
}

fn step_count(path: &[Position]) -> u32 {
    path.len().saturating_sub(1) as u32
}

impl ActionTransition for MoveAction {
    type Error = MoveError;
    type Result = MoveOutcome;

    fn actor(&self) -> EntityId {
        self.actor
    }

    fn pre_validate(&self, state: &CombatState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        self.plan(state).map(|_| ())
    }

    fn apply(&self, state: &mut CombatState, _env: &GameEnv<'_>) -> Result<MoveOutcome, MoveError> {
        let path = self.plan(state)?;
        let cost = step_count(&path);
        let from = path.first().copied().unwrap_or(self.destination);
        let context = ErrorContext::new(state.turn.nonce)
            .with_actor(self.actor)
            .with_position(self.destination);

        state
            .grid
            .relocate(self.actor, from, self.destination)
            .map_err(|error| MoveError::Grid { error, context })?;

        let mover = state.combatant_mut(self.actor).ok_or(ActorError::Missing {
            actor: self.actor,
            context,
        })?;
        mover.position = self.destination;
        mover.movement_points.debit(cost);
        mover.flags.insert(TurnFlags::MOVED);

        Ok(MoveOutcome {
            from,
            to: self.destination,
            path,
            cost,
        })
    }

    fn post_validate(&self, state: &CombatState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        if state.grid.occupant(self.destination) != Some(self.actor) {
            return Err(MoveError::Grid {
                error: GridError::NotOccupant {
                    entity: self.actor,
                    position: self.destination,
                },
                context: ErrorContext::new(state.turn.nonce).with_actor(self.actor),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::state::{ArchetypeId, CombatantKind, CombatantState, Phase};
    use crate::testing::{begin_playing, player_at};

    fn open_state() -> CombatState {
        let mut state = CombatState::new(Grid::new(8, 8), 7);
        state.spawn(player_at(Position::new(1, 1))).unwrap();
        begin_playing(&mut state);
        state
    }

    #[test]
    fn moving_debits_path_length_and_updates_occupancy() {
        let mut state = open_state();
        let action = MoveAction::new(EntityId::PLAYER, Position::new(3, 2));
        let env = GameEnv::empty();

        action.pre_validate(&state, &env).unwrap();
        let outcome = action.apply(&mut state, &env).unwrap();

        assert_eq!(outcome.cost, 3);
        assert_eq!(outcome.path.len(), 4);
        let player = state.player().unwrap();
        assert_eq!(player.position, Position::new(3, 2));
        assert_eq!(player.movement_points.current, 0);
        assert!(player.flags.contains(TurnFlags::MOVED));
        assert_eq!(state.grid.occupant(Position::new(1, 1)), None);
        assert!(state.occupancy_consistent());
    }

    #[test]
    fn unaffordable_destination_is_insufficient_resource() {
        let state = open_state();
        let env = GameEnv::empty();
        let err = MoveAction::new(EntityId::PLAYER, Position::new(6, 6))
            .pre_validate(&state, &env)
            .unwrap_err();
        assert!(matches!(err, MoveError::TooFar { required: 10, available: 3, .. }));
        assert_eq!(err.refusal(), Some(RefusalKind::InsufficientResource));
    }

    #[test]
    fn occupied_destination_is_refused() {
        let mut state = open_state();
        let enemy = CombatantState::new(
            EntityId(1),
            "wolf",
            CombatantKind::Enemy {
                archetype: ArchetypeId::new("wolf"),
            },
            Position::new(2, 1),
            10,
            4,
            3,
        );
        state.spawn(enemy).unwrap();
        let env = GameEnv::empty();
        let err = MoveAction::new(EntityId::PLAYER, Position::new(2, 1))
            .pre_validate(&state, &env)
            .unwrap_err();
        assert_eq!(err.refusal(), Some(RefusalKind::AlreadyOccupied));
    }

    #[test]
    fn walled_off_cell_is_unreachable() {
        let grid = Grid::from_rows(&["P.#.", "..#.", "###."]).unwrap();
        let mut state = CombatState::new(grid, 1);
        state.spawn(player_at(Position::new(0, 0))).unwrap();
        begin_playing(&mut state);
        let env = GameEnv::empty();
        let err = MoveAction::new(EntityId::PLAYER, Position::new(3, 0))
            .pre_validate(&state, &env)
            .unwrap_err();
        assert_eq!(err, MoveError::Unreachable(Position::new(3, 0)));
    }

    #[test]
    fn moving_outside_playing_phase_is_wrong_phase() {
        let mut state = open_state();
        state.turn.phase = Phase::Victory;
        let env = GameEnv::empty();
        let err = MoveAction::new(EntityId::PLAYER, Position::new(2, 1))
            .pre_validate(&state, &env)
            .unwrap_err();
        assert_eq!(err.refusal(), Some(RefusalKind::WrongPhase));
    }
}
