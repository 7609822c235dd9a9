//! Error types for action execution pipeline.

use crate::action::{AttackError, CastError, MoveError, PlacementError};
use crate::env::OracleError;
use crate::error::{ErrorContext, ErrorSeverity, GameError, RefusalKind};

use super::TurnError;

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

impl<E: GameError> GameError for TransitionPhaseError<E> {
    fn severity(&self) -> ErrorSeverity {
        self.error.severity()
    }

    fn context(&self) -> Option<&ErrorContext> {
        self.error.context()
    }

    fn error_code(&self) -> &'static str {
        self.error.error_code()
    }

    fn refusal(&self) -> Option<RefusalKind> {
        self.error.refusal()
    }
}

/// Errors surfaced while executing an action or a turn transition.
///
/// Gameplay refusals keep their concrete action error. Anything classified
/// as internal is collapsed into [`ExecuteError::Invariant`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecuteError {
    #[error("placement failed: {0}")]
    Place(TransitionPhaseError<PlacementError>),

    #[error("move action failed: {0}")]
    Move(TransitionPhaseError<MoveError>),

    #[error("attack action failed: {0}")]
    Attack(TransitionPhaseError<AttackError>),

    #[error("cast action failed: {0}")]
    Cast(TransitionPhaseError<CastError>),

    #[error("turn transition failed: {0}")]
    Turn(TurnError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("invariant violated during {phase}: [{code}] {message}")]
    Invariant {
        phase: String,
        code: String,
        message: String,
    },
}

impl ExecuteError {
    /// Wraps a phase error, collapsing internal failures into `Invariant`.
    pub(crate) fn classify<E: GameError>(
        error: TransitionPhaseError<E>,
        wrap: fn(TransitionPhaseError<E>) -> ExecuteError,
    ) -> Self {
        if error.severity().is_internal() {
            Self::Invariant {
                phase: error.phase.as_str().to_owned(),
                code: error.error_code().to_owned(),
                message: error.error.to_string(),
            }
        } else {
            wrap(error)
        }
    }

    fn inner(&self) -> Option<&dyn GameError> {
        match self {
            Self::Place(error) => Some(error),
            Self::Move(error) => Some(error),
            Self::Attack(error) => Some(error),
            Self::Cast(error) => Some(error),
            Self::Turn(error) => Some(error),
            Self::Oracle(error) => Some(error),
            Self::Invariant { .. } => None,
        }
    }

    pub fn is_refusal(&self) -> bool {
        self.refusal().is_some()
    }
}

impl From<TurnError> for ExecuteError {
    fn from(error: TurnError) -> Self {
        if error.severity().is_internal() {
            Self::Invariant {
                phase: "turn".to_owned(),
                code: error.error_code().to_owned(),
                message: error.to_string(),
            }
        } else {
            Self::Turn(error)
        }
    }
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        self.inner()
            .map_or(ErrorSeverity::Internal, |error| error.severity())
    }

    fn context(&self) -> Option<&ErrorContext> {
        self.inner().and_then(|error| error.context())
    }

    fn error_code(&self) -> &'static str {
        self.inner()
            .map_or("EXECUTE_INVARIANT", |error| error.error_code())
    }

    fn refusal(&self) -> Option<RefusalKind> {
        self.inner().and_then(|error| error.refusal())
    }
}
