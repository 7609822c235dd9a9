use std::sync::RwLock;

use game_core::{CombatReport, SessionId};

use crate::repository::{ReportRepository, RepositoryError, Result, StoredReport};

#[derive(Default)]
pub struct InMemoryReportRepository {
    reports: RwLock<Vec<StoredReport>>,
}

impl InMemoryReportRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.reports.read().map(|reports| reports.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReportRepository for InMemoryReportRepository {
    fn save_report(&self, report: &CombatReport) -> Result<()> {
        self.reports
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?
            .push(StoredReport::now(report.clone()));
        Ok(())
    }

    fn reports_for(&self, session: SessionId) -> Result<Vec<StoredReport>> {
        let reports = self
            .reports
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(reports
            .iter()
            .filter(|stored| stored.report.session == session)
            .cloned()
            .collect())
    }

    fn all_reports(&self) -> Result<Vec<StoredReport>> {
        let reports = self
            .reports
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(reports.clone())
    }
}
