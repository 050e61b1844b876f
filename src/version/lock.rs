//! Install root lock management
//!
//! Serializes installs and uninstalls across processes sharing an install root.

use std::fs::{File, OpenOptions};
use std::path::Path;

use fs2::FileExt;
use tracing::debug;

use crate::version::error::ManagerError;

/// Lock file name inside the install root (dot-prefixed so listings skip it)
pub const LOCK_FILE_NAME: &str = ".lock";

/// Block until the exclusive lock on `install_path` is held.
/// Returns a guard that releases the lock when dropped.
///
/// The lock file itself is left in place: removing it would let a waiting
/// process lock an unlinked inode while a newcomer locks a fresh file.
pub fn lock_install_root(install_path: &Path) -> Result<InstallLock, ManagerError> {
    let lock_path = install_path.join(LOCK_FILE_NAME);

    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .map_err(|e| ManagerError::io(&lock_path, e))?;

    debug!("Wait for lock {}", lock_path.display());
    file.lock_exclusive()
        .map_err(|e| ManagerError::io(&lock_path, e))?;

    Ok(InstallLock { file })
}

/// RAII guard for the install root lock
#[derive(Debug)]
pub struct InstallLock {
    file: File,
}

impl Drop for InstallLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
