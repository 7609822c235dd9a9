//! Unified error types surfaced by the runtime API.
//!
//! Refusals are not errors: they come back as [`super::Response::Refused`].
//! Everything here means the session cannot continue as requested.
use thiserror::Error;

use game_core::{ExecuteError, OracleError, SessionError, TurnError};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime requires oracles to be configured before building")]
    MissingOracles,

    #[error("runtime requires a combat session before building")]
    MissingSession,

    #[error("unknown character '{0}'")]
    UnknownCharacter(String),

    #[error("unknown encounter '{0}'")]
    UnknownEncounter(String),

    #[error(transparent)]
    Execute(#[from] ExecuteError),

    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
