//! Turn scheduling and action execution pipeline.
//!
//! The [`GameEngine`] is the authoritative reducer for [`CombatState`]. It
//! drives actions through their transition phases, keeps the turn order
//! moving and detects the end of combat. Everything observable is returned
//! as [`CombatEvent`] values; the engine itself performs no I/O.

mod errors;
mod timer;
mod transition;
mod turns;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError};
pub use timer::{TimerKind, TurnTimer};
pub use turns::TurnError;

use crate::action::{Action, ActionResult};
use crate::env::GameEnv;
use crate::events::CombatEvent;
use crate::state::{CombatState, EntityId, Phase};

/// Complete outcome of action execution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecutionOutcome {
    /// Action-specific execution result (path walked, hits dealt, ...).
    pub action_result: ActionResult,

    /// Presentation events, in the order they happened.
    pub events: Vec<CombatEvent>,

    /// Phase after the action, `Victory`/`Defeat` when it ended the fight.
    pub phase: Phase,
}

/// Combat engine that manages action execution and turn scheduling.
///
/// All action-driven mutations flow through the three-phase pipeline:
/// pre_validate → apply → post_validate. Turn transitions (`ready`,
/// `advance_turn`) live in the `turns` module and mutate only the
/// scheduling state plus enemy spawning.
pub struct GameEngine<'a> {
    state: &'a mut CombatState,
}

impl<'a> GameEngine<'a> {
    /// Creates a new engine over the given state.
    pub fn new(state: &'a mut CombatState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &CombatState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.turn.phase
    }

    /// Executes an action through its transition pipeline.
    ///
    /// A refused action leaves the state untouched. A successful one bumps
    /// the nonce, then the end condition is evaluated.
    pub fn execute(
        &mut self,
        env: GameEnv<'_>,
        action: &Action,
    ) -> Result<ExecutionOutcome, ExecuteError> {
        let actor = action.actor();
        let action_result = transition::execute_transition(action, self.state, &env)?;

        self.state.turn.nonce += 1;
        self.verify_occupancy(actor)?;

        let mut events = CombatEvent::from_action(actor, &action_result);
        events.extend(self.check_end_condition());

        Ok(ExecutionOutcome {
            action_result,
            events,
            phase: self.state.turn.phase,
        })
    }

    fn verify_occupancy(&self, actor: EntityId) -> Result<(), ExecuteError> {
        if self.state.occupancy_consistent() {
            return Ok(());
        }
        Err(ExecuteError::Invariant {
            phase: TransitionPhase::PostValidate.as_str().to_owned(),
            code: "OCCUPANCY_DESYNC".to_owned(),
            message: format!("grid occupancy diverged after an action by {actor}"),
        })
    }
}
