//! Repository layer for dynamic runtime data
//!
//! Repositories handle data that CHANGES during play:
//! - Combat reports handed over when a fight ends
//! - Combat sessions (for save/resume)
//!
//! Static game content (spells, archetypes, encounters) is handled by
//! Oracles, not Repositories.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::{FileReportRepository, FileSessionRepository};
pub use memory::{InMemoryReportRepository, InMemorySessionRepository};
pub use traits::{ReportRepository, SessionRepository, StoredReport};
