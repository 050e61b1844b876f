//! Installed versions, read from the install root
//!
//! Each installed version is a subdirectory named by its normalized version.
//! Dot-prefixed entries (lock file, in-progress installs) are not versions.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::version::error::ManagerError;
use crate::version::semver::sort_versions;

pub struct Inventory {
    install_path: PathBuf,
}

impl Inventory {
    pub fn new(install_path: impl Into<PathBuf>) -> Self {
        Self {
            install_path: install_path.into(),
        }
    }

    pub fn install_path(&self) -> &Path {
        &self.install_path
    }

    /// Installed versions, sorted ascending
    pub fn list(&self) -> Result<Vec<String>, ManagerError> {
        let mut versions = self.read_names()?;
        sort_versions(&mut versions);
        Ok(versions)
    }

    /// Installed versions as a set; a read failure yields an empty set
    pub fn set(&self) -> HashSet<String> {
        match self.read_names() {
            Ok(names) => names.into_iter().collect(),
            Err(e) => {
                debug!("Can not read installed versions: {}", e);
                HashSet::new()
            }
        }
    }

    /// Whether `version` (already normalized) is installed
    pub fn contains(&self, version: &str) -> Result<bool, ManagerError> {
        Ok(self.read_names()?.iter().any(|name| name == version))
    }

    fn read_names(&self) -> Result<Vec<String>, ManagerError> {
        let entries =
            fs::read_dir(&self.install_path).map_err(|e| ManagerError::io(&self.install_path, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ManagerError::io(&self.install_path, e))?;
            let is_dir = entry
                .file_type()
                .map_err(|e| ManagerError::io(entry.path(), e))?
                .is_dir();
            if !is_dir {
                continue;
            }
            // Non UTF-8 names can not be versions
            if let Some(name) = entry.file_name().to_str()
                && !name.starts_with('.')
            {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }
}
