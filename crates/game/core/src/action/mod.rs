//! Player and enemy actions.
//!
//! Every action is a small value implementing [`ActionTransition`]. The
//! engine drives it through `pre_validate → apply → post_validate`; all
//! refusals are raised by `pre_validate`, so a refused action never touches
//! the state.
//!
//! - `placement`: positioning-phase relocation onto a player spawn cell
//! - `movement`: path-following movement paid in MP
//! - `attack`: melee weapon attack paid in AP
//! - `cast`: spell casting with cooldowns and area effects

mod attack;
mod cast;
mod movement;
mod placement;

pub use attack::{AttackError, AttackOutcome, BasicAttackAction};
pub use cast::{CastError, CastOutcome, CastSpellAction};
pub use movement::{MoveAction, MoveError, MoveOutcome};
pub use placement::{PlaceAction, PlaceOutcome, PlacementError};

use crate::env::GameEnv;
use crate::error::{ErrorContext, ErrorSeverity, GameError, RefusalKind};
use crate::state::{CombatState, CombatantState, EntityId, Phase};

/// Defines how a concrete action mutates combat state.
pub trait ActionTransition {
    type Error;
    type Result;

    /// Returns the combatant performing this action.
    fn actor(&self) -> EntityId;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(&self, _state: &CombatState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies the action. Implementations may assume `pre_validate` passed.
    fn apply(&self, state: &mut CombatState, env: &GameEnv<'_>)
    -> Result<Self::Result, Self::Error>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(&self, _state: &CombatState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Any action a combatant can submit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Place(PlaceAction),
    Move(MoveAction),
    Attack(BasicAttackAction),
    Cast(CastSpellAction),
}

impl Action {
    pub fn actor(&self) -> EntityId {
        match self {
            Action::Place(action) => action.actor(),
            Action::Move(action) => action.actor(),
            Action::Attack(action) => action.actor(),
            Action::Cast(action) => action.actor(),
        }
    }

    /// Whether this action counts as the actor's turn action.
    pub fn consumes_turn(&self) -> bool {
        !matches!(self, Action::Place(_))
    }
}

impl From<PlaceAction> for Action {
    fn from(action: PlaceAction) -> Self {
        Action::Place(action)
    }
}

impl From<MoveAction> for Action {
    fn from(action: MoveAction) -> Self {
        Action::Move(action)
    }
}

impl From<BasicAttackAction> for Action {
    fn from(action: BasicAttackAction) -> Self {
        Action::Attack(action)
    }
}

impl From<CastSpellAction> for Action {
    fn from(action: CastSpellAction) -> Self {
        Action::Cast(action)
    }
}

/// Action-specific execution result.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionResult {
    Placed(PlaceOutcome),
    Moved(MoveOutcome),
    Attacked(AttackOutcome),
    Cast(CastOutcome),
}

// ============================================================================
// Actor Guard
// ============================================================================

/// Refusals shared by every turn-bound action.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActorError {
    #[error("actions are not accepted during the {phase} phase")]
    WrongPhase {
        phase: Phase,
        #[cfg_attr(feature = "serde", serde(skip))]
        context: ErrorContext,
    },

    #[error("it is not {actor}'s turn")]
    NotYourTurn {
        actor: EntityId,
        current: Option<EntityId>,
        #[cfg_attr(feature = "serde", serde(skip))]
        context: ErrorContext,
    },

    #[error("{actor} is dead")]
    Dead {
        actor: EntityId,
        #[cfg_attr(feature = "serde", serde(skip))]
        context: ErrorContext,
    },

    #[error("combatant {actor} not found")]
    Missing {
        actor: EntityId,
        #[cfg_attr(feature = "serde", serde(skip))]
        context: ErrorContext,
    },
}

impl GameError for ActorError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::WrongPhase { .. } | Self::NotYourTurn { .. } | Self::Dead { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::Missing { .. } => ErrorSeverity::Internal,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::WrongPhase { context, .. }
            | Self::NotYourTurn { context, .. }
            | Self::Dead { context, .. }
            | Self::Missing { context, .. } => Some(context),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::WrongPhase { .. } => "ACTOR_WRONG_PHASE",
            Self::NotYourTurn { .. } => "ACTOR_NOT_YOUR_TURN",
            Self::Dead { .. } => "ACTOR_DEAD",
            Self::Missing { .. } => "ACTOR_MISSING",
        }
    }

    fn refusal(&self) -> Option<RefusalKind> {
        match self {
            Self::WrongPhase { .. } => Some(RefusalKind::WrongPhase),
            Self::NotYourTurn { .. } => Some(RefusalKind::NotYourTurn),
            Self::Dead { .. } => Some(RefusalKind::AlreadyDead),
            Self::Missing { .. } => None,
        }
    }
}

/// Returns the acting combatant if it may act right now: the phase is
/// `Playing`, it is the current actor and it is alive.
pub(crate) fn active_combatant(
    state: &CombatState,
    actor: EntityId,
) -> Result<&CombatantState, ActorError> {
    let context = ErrorContext::new(state.turn.nonce).with_actor(actor);
    if state.turn.phase != Phase::Playing {
        return Err(ActorError::WrongPhase {
            phase: state.turn.phase,
            context,
        });
    }
    let current = state.turn.current_actor();
    if current != Some(actor) {
        return Err(ActorError::NotYourTurn {
            actor,
            current,
            context,
        });
    }
    let combatant = state
        .combatant(actor)
        .ok_or(ActorError::Missing { actor, context })?;
    if !combatant.alive {
        return Err(ActorError::Dead { actor, context });
    }
    Ok(combatant)
}
