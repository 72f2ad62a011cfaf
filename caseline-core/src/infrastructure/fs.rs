// caseline-core/src/infrastructure/fs.rs

use crate::infrastructure::error::InfrastructureError;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const LOCK_FILE: &str = "caseline.lock";

/// Write content to a file atomically using a temporary file.
///
/// The temporary file lives in the target's directory so the final rename
/// never crosses filesystems. Readers see either the old content or the
/// new one, never a partial write.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = path.parent().unwrap_or_else(|| Path::new("."));

    let mut temp_file = tempfile::NamedTempFile::new_in(parent).map_err(InfrastructureError::Io)?;

    temp_file
        .write_all(content.as_ref())
        .map_err(InfrastructureError::Io)?;

    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

/// Exclusive marker for one run per target directory.
///
/// Acquired with `create_new`, so two processes racing on the same
/// directory cannot both win. Released on drop.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    pub fn acquire(target_dir: &Path) -> Result<Self, InfrastructureError> {
        fs::create_dir_all(target_dir)?;
        let path = target_dir.join(LOCK_FILE);

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(InfrastructureError::RunInProgress(
                    path.display().to_string(),
                ));
            }
            Err(e) => return Err(InfrastructureError::Io(e)),
        };

        writeln!(
            file,
            "pid={} acquired_at={}",
            std::process::id(),
            chrono::Utc::now().to_rfc3339()
        )?;
        debug!(path = ?path, "Run lock acquired");

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = ?self.path, error = %e, "Could not release run lock");
        }
    }
}
