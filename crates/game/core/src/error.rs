//! Common error infrastructure for game-core.
//!
//! Domain-specific errors (`MoveError`, `CastError`, ...) live beside the
//! actions they validate. This module provides the shared classification:
//! a severity for recovery strategies and, for gameplay refusals, the
//! [`RefusalKind`] reported back to the input collaborator.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each action has its own error type with specific variants
//! - **No partial actions**: every refusal is raised before any mutation
//! - **Severity Classification**: broken invariants are never confused with refusals

use crate::state::{EntityId, Position};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: gameplay refusal, the same request may succeed later
/// - **Validation**: malformed request, should not be retried unchanged
/// - **Internal**: state inconsistency that indicates a bug
/// - **Fatal**: corrupted state, the session cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Examples: not enough AP, spell on cooldown, not your turn.
    Recoverable,

    /// Examples: unknown spell, target outside the grid.
    Validation,

    /// Examples: occupancy desync, missing combatant record.
    Internal,

    /// Examples: missing required oracle.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable | Self::Validation)
    }

    /// Returns true if this error indicates a programmer error.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Gameplay refusal categories surfaced to the input collaborator.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RefusalKind {
    /// Unreachable, non-walkable or out-of-range target.
    InvalidTarget,
    /// Target cell already holds a combatant.
    AlreadyOccupied,
    /// Not enough AP or MP.
    InsufficientResource,
    OnCooldown,
    NotYourTurn,
    AlreadyDead,
    /// Request not valid in the current phase.
    WrongPhase,
}

/// Debugging context attached to errors raised while executing an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ErrorContext {
    /// Combatant that triggered the error (if applicable).
    pub actor: Option<EntityId>,

    /// Cell involved in the error (if applicable).
    pub position: Option<Position>,

    /// Action nonce at the time of error. Correlates errors with replays.
    pub nonce: u64,

    pub message: Option<&'static str>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(nonce: u64) -> Self {
        Self {
            actor: None,
            position: None,
            nonce,
            message: None,
        }
    }

    #[must_use]
    pub const fn with_actor(mut self, actor: EntityId) -> Self {
        self.actor = Some(actor);
        self
    }

    #[must_use]
    pub const fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Common trait for all game-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Return a [`RefusalKind`] for every recoverable gameplay refusal
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }

    /// Refusal category, or `None` for invariant violations.
    fn refusal(&self) -> Option<RefusalKind> {
        None
    }
}

/// Structured refusal: category, stable code and human-readable message.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Refusal {
    pub kind: RefusalKind,
    pub code: String,
    pub message: String,
}

impl Refusal {
    /// Builds a refusal from any classified error. Returns `None` when the
    /// error is an invariant violation rather than a refusal.
    pub fn from_error<E: GameError + ?Sized>(error: &E) -> Option<Self> {
        error.refusal().map(|kind| Self {
            kind,
            code: error.error_code().to_owned(),
            message: error.to_string(),
        })
    }
}

impl core::fmt::Display for Refusal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} ({}): {}", self.kind, self.code, self.message)
    }
}
