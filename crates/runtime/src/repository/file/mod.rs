//! File-backed repositories.
//!
//! Every write goes to a temporary sibling first and is renamed into place,
//! so readers never observe a half-written file.

mod report;
mod session;

use std::fs;
use std::path::Path;

pub use report::FileReportRepository;
pub use session::FileSessionRepository;

use crate::repository::{RepositoryError, Result};

pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut temp_path = path.as_os_str().to_owned();
    temp_path.push(".tmp");
    fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;
    fs::rename(&temp_path, path).map_err(RepositoryError::Io)?;
    Ok(())
}
