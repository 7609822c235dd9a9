//! Oracle access errors.
//!
//! Errors related to oracle availability and data access.

use crate::combat::SpellId;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{ArchetypeId, CharacterId};

/// Errors that occur when accessing Oracle data.
///
/// A missing oracle means the environment was assembled incorrectly and is
/// fatal. A missing record is a bad reference in the request or content.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("SpellOracle not available")]
    SpellsNotAvailable,

    #[error("ArchetypeOracle not available")]
    ArchetypesNotAvailable,

    #[error("ConfigOracle not available")]
    ConfigNotAvailable,

    #[error("RngOracle not available")]
    RngNotAvailable,

    #[error("spell '{0}' not found")]
    SpellNotFound(SpellId),

    #[error("archetype '{0}' not found")]
    ArchetypeNotFound(ArchetypeId),

    #[error("character '{0}' not found")]
    CharacterNotFound(CharacterId),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            SpellsNotAvailable | ArchetypesNotAvailable | ConfigNotAvailable | RngNotAvailable => {
                ErrorSeverity::Fatal
            }
            SpellNotFound(_) | ArchetypeNotFound(_) | CharacterNotFound(_) => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            SpellsNotAvailable => "ORACLE_SPELLS_NOT_AVAILABLE",
            ArchetypesNotAvailable => "ORACLE_ARCHETYPES_NOT_AVAILABLE",
            ConfigNotAvailable => "ORACLE_CONFIG_NOT_AVAILABLE",
            RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
            SpellNotFound(_) => "ORACLE_SPELL_NOT_FOUND",
            ArchetypeNotFound(_) => "ORACLE_ARCHETYPE_NOT_FOUND",
            CharacterNotFound(_) => "ORACLE_CHARACTER_NOT_FOUND",
        }
    }
}
