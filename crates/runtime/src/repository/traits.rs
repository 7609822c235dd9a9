//! Repository contracts for combat results and resumable sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use game_core::{CombatReport, CombatSession, SessionId};

use super::Result;

/// A report as it sits in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredReport {
    pub saved_at: DateTime<Utc>,
    pub report: CombatReport,
}

impl StoredReport {
    pub fn now(report: CombatReport) -> Self {
        Self {
            saved_at: Utc::now(),
            report,
        }
    }
}

/// Persistence collaborator: receives one report per finished fight.
pub trait ReportRepository: Send + Sync {
    fn save_report(&self, report: &CombatReport) -> Result<()>;

    /// Reports for one session, oldest first.
    fn reports_for(&self, session: SessionId) -> Result<Vec<StoredReport>>;

    /// Every stored report, oldest first.
    fn all_reports(&self) -> Result<Vec<StoredReport>>;
}

/// Save/resume storage for sessions that are still being played.
pub trait SessionRepository: Send + Sync {
    fn save(&self, session: &CombatSession) -> Result<()>;

    fn load(&self, id: SessionId) -> Result<Option<CombatSession>>;

    fn delete(&self, id: SessionId) -> Result<()>;

    fn exists(&self, id: SessionId) -> bool;

    /// List all stored session ids
    fn list(&self) -> Result<Vec<SessionId>> {
        Ok(vec![])
    }
}
