//! File-based ReportRepository storing one JSON document per report.

use std::fs;
use std::path::{Path, PathBuf};

use game_core::{CombatReport, SessionId};

use super::write_atomic;
use crate::repository::{ReportRepository, RepositoryError, Result, StoredReport};

/// Reports are written as `report_{session}_{timestamp}.json`.
///
/// JSON keeps the files readable by whatever external system picks up
/// experience and loot.
pub struct FileReportRepository {
    base_dir: PathBuf,
}

impl FileReportRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir })
    }

    fn read_dir_sorted(&self, prefix: &str) -> Result<Vec<StoredReport>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.base_dir).map_err(RepositoryError::Io)? {
            let path = entry.map_err(RepositoryError::Io)?.path();
            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && filename.starts_with(prefix)
                && filename.ends_with(".json")
            {
                paths.push(path);
            }
        }

        let mut reports = Vec::with_capacity(paths.len());
        for path in paths {
            let bytes = fs::read(&path).map_err(RepositoryError::Io)?;
            let stored: StoredReport = serde_json::from_slice(&bytes).map_err(|e| {
                RepositoryError::CorruptedData(format!("{}: {}", path.display(), e))
            })?;
            reports.push(stored);
        }
        reports.sort_by_key(|stored| stored.saved_at);
        Ok(reports)
    }
}

impl ReportRepository for FileReportRepository {
    fn save_report(&self, report: &CombatReport) -> Result<()> {
        let stored = StoredReport::now(report.clone());
        let path = self.base_dir.join(format!(
            "report_{}_{}.json",
            report.session,
            stored.saved_at.format("%Y%m%dT%H%M%S%.6f")
        ));
        let bytes = serde_json::to_vec_pretty(&stored)?;
        write_atomic(&path, &bytes)?;

        tracing::info!(
            session = %report.session,
            outcome = %report.outcome,
            path = %path.display(),
            "saved combat report"
        );
        Ok(())
    }

    fn reports_for(&self, session: SessionId) -> Result<Vec<StoredReport>> {
        self.read_dir_sorted(&format!("report_{}_", session))
    }

    fn all_reports(&self) -> Result<Vec<StoredReport>> {
        self.read_dir_sorted("report_")
    }
}
