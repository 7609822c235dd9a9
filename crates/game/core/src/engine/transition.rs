//! Action transition dispatch and execution logic.

use crate::action::{Action, ActionResult, ActionTransition};
use crate::env::GameEnv;
use crate::state::CombatState;

use super::errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

/// Executes a transition through the three-phase pipeline and returns the result.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the combat state and return result
/// 3. `post_validate` - Verify postconditions after mutation
#[inline]
fn drive_transition<T>(
    transition: &T,
    state: &mut CombatState,
    env: &GameEnv<'_>,
) -> Result<T::Result, TransitionPhaseError<T::Error>>
where
    T: ActionTransition,
{
    transition
        .pre_validate(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    let result = transition
        .apply(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))?;

    Ok(result)
}

/// Routes each action to its transition and wraps the result in [`ActionResult`].
pub(super) fn execute_transition(
    action: &Action,
    state: &mut CombatState,
    env: &GameEnv<'_>,
) -> Result<ActionResult, ExecuteError> {
    match action {
        Action::Place(transition) => drive_transition(transition, state, env)
            .map(ActionResult::Placed)
            .map_err(|error| ExecuteError::classify(error, ExecuteError::Place)),
        Action::Move(transition) => drive_transition(transition, state, env)
            .map(ActionResult::Moved)
            .map_err(|error| ExecuteError::classify(error, ExecuteError::Move)),
        Action::Attack(transition) => drive_transition(transition, state, env)
            .map(ActionResult::Attacked)
            .map_err(|error| ExecuteError::classify(error, ExecuteError::Attack)),
        Action::Cast(transition) => drive_transition(transition, state, env)
            .map(ActionResult::Cast)
            .map_err(|error| ExecuteError::classify(error, ExecuteError::Cast)),
    }
}
