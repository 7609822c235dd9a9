//! File-based SessionRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use game_core::{CombatSession, SessionId};

use super::write_atomic;
use crate::repository::{RepositoryError, Result, SessionRepository};

/// Stores sessions as `session_{id}.bin` in bincode format.
pub struct FileSessionRepository {
    base_dir: PathBuf,
}

impl FileSessionRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir })
    }

    fn session_path(&self, id: SessionId) -> PathBuf {
        self.base_dir.join(format!("session_{}.bin", id))
    }
}

impl SessionRepository for FileSessionRepository {
    fn save(&self, session: &CombatSession) -> Result<()> {
        let path = self.session_path(session.id);
        let bytes = session
            .to_bytes()
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        write_atomic(&path, &bytes)?;

        tracing::debug!("Saved session[{}] to {}", session.id, path.display());
        Ok(())
    }

    fn load(&self, id: SessionId) -> Result<Option<CombatSession>> {
        let path = self.session_path(id);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;
        let session = CombatSession::from_bytes(&bytes)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        tracing::debug!("Loaded session[{}] from {}", id, path.display());
        Ok(Some(session))
    }

    fn delete(&self, id: SessionId) -> Result<()> {
        let path = self.session_path(id);
        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
            tracing::debug!("Deleted session[{}]", id);
        }
        Ok(())
    }

    fn exists(&self, id: SessionId) -> bool {
        self.session_path(id).exists()
    }

    fn list(&self) -> Result<Vec<SessionId>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.base_dir).map_err(RepositoryError::Io)? {
            let path = entry.map_err(RepositoryError::Io)?.path();
            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(hex) = filename
                    .strip_prefix("session_")
                    .and_then(|s| s.strip_suffix(".bin"))
                && let Ok(id) = u64::from_str_radix(hex, 16)
            {
                ids.push(SessionId(id));
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }
}
