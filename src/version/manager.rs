//! Version resolution and installation orchestration for one tool
//!
//! `detect` decides, for a requested version expression, whether the answer
//! comes from the request itself (exact version), from upstream's latest
//! release, from installed versions, or from the remote release list, and
//! installs the result unless no-install mode is active.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::config::{Config, LATEST_KEY, ToolNames};
use crate::version::error::ManagerError;
use crate::version::installer::Installer;
use crate::version::inventory::Inventory;
use crate::version::predicate::{Predicate, parse_predicate};
use crate::version::retriever::ReleaseInfoRetriever;
use crate::version::semver::{iterate, normalize_version, sort_versions};

/// A place a selected version can be read from, in [`VersionManager::resolve`] order
#[derive(Debug, Clone, PartialEq, Eq)]
enum VersionSource {
    Env(String),
    File(PathBuf),
}

impl VersionSource {
    /// The trimmed value held by this source, if present and non-empty
    fn read(&self) -> Option<String> {
        let raw = match self {
            VersionSource::Env(name) => std::env::var(name).ok()?,
            VersionSource::File(path) => fs::read_to_string(path).ok()?,
        };
        let value = raw.trim();
        (!value.is_empty()).then(|| value.to_string())
    }
}

pub struct VersionManager {
    config: Config,
    names: ToolNames,
    retriever: Arc<dyn ReleaseInfoRetriever>,
    inventory: Inventory,
    installer: Installer,
}

impl VersionManager {
    pub fn new(config: Config, names: ToolNames, retriever: Arc<dyn ReleaseInfoRetriever>) -> Self {
        let install_path = config.root_path.join(names.folder_name);
        Self {
            inventory: Inventory::new(&install_path),
            installer: Installer::new(&install_path, Arc::clone(&retriever), names.folder_name),
            config,
            names,
            retriever,
        }
    }

    pub fn names(&self) -> &ToolNames {
        &self.names
    }

    /// Directory holding one subdirectory per installed version
    pub fn install_path(&self) -> PathBuf {
        self.inventory.install_path().to_path_buf()
    }

    /// Pointer file shared by every directory
    pub fn root_version_file_path(&self) -> PathBuf {
        self.config.root_path.join(self.names.version_file_name)
    }

    /// Pointer file of the working directory
    pub fn working_version_file_path(&self) -> PathBuf {
        self.config.working_dir.join(self.names.version_file_name)
    }

    /// Resolve `requested` to a concrete version, installing it when needed and allowed.
    pub async fn detect(&self, requested: &str) -> Result<String, ManagerError> {
        self.detect_with(requested, true).await
    }

    /// Install the version `requested` designates, regardless of no-install mode.
    ///
    /// Constraint expressions are resolved against the remote release list.
    pub async fn install(&self, requested: &str) -> Result<String, ManagerError> {
        let requested = requested.trim();
        if requested.is_empty() {
            return Err(ManagerError::EmptyVersion);
        }

        if let Some(version) = normalize_version(requested) {
            self.installer.install_exact(&version).await?;
            return Ok(version);
        }

        if requested == LATEST_KEY {
            return self.install_latest().await;
        }

        let predicate = parse_predicate(requested)?;
        self.search_install_remote(&predicate, false).await
    }

    /// Installed versions, sorted ascending. A missing install root holds no versions.
    pub fn list_local(&self) -> Result<Vec<String>, ManagerError> {
        if !self.inventory.install_path().exists() {
            return Ok(Vec::new());
        }
        self.inventory.list()
    }

    /// Published versions, sorted ascending
    pub async fn list_remote(&self) -> Result<Vec<String>, ManagerError> {
        let mut versions = self.retriever.list_releases().await?;
        sort_versions(&mut versions);
        Ok(versions)
    }

    /// Installed versions as a set; unreadable install roots count as empty
    pub fn local_set(&self) -> HashSet<String> {
        self.inventory.set()
    }

    /// Delete the root pointer file
    pub fn reset(&self) -> Result<(), ManagerError> {
        let path = self.root_version_file_path();
        debug!("Remove {}", path.display());
        match fs::remove_file(&path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(ManagerError::io(path, e)),
            _ => Ok(()),
        }
    }

    /// Currently selected version, or `default_version` when nothing selects one.
    ///
    /// Never validates, installs or touches the network.
    pub fn resolve(&self, default_version: &str) -> String {
        self.version_sources()
            .iter()
            .find_map(|source| {
                let value = source.read()?;
                debug!("Resolved {} from {:?}", value, source);
                Some(value)
            })
            .unwrap_or_else(|| default_version.to_string())
    }

    fn version_sources(&self) -> [VersionSource; 4] {
        [
            VersionSource::Env(self.names.version_env_name.to_string()),
            VersionSource::File(self.working_version_file_path()),
            VersionSource::File(self.config.user_path.join(self.names.version_file_name)),
            VersionSource::File(self.root_version_file_path()),
        ]
    }

    /// Remove an installed version; only exact versions are accepted.
    pub fn uninstall(&self, requested: &str) -> Result<(), ManagerError> {
        let version = normalize_version(requested)
            .ok_or_else(|| ManagerError::parse(requested, "not an exact version"))?;
        self.installer.uninstall_exact(&version)
    }

    /// Resolve `requested` and record the result in a pointer file.
    ///
    /// `force_remote` skips installed versions; `working_dir` selects the
    /// working-directory pointer file instead of the root one.
    pub async fn use_version(
        &self,
        requested: &str,
        force_remote: bool,
        working_dir: bool,
    ) -> Result<String, ManagerError> {
        let version = self.detect_with(requested, !force_remote).await?;

        let target = if working_dir {
            self.working_version_file_path()
        } else {
            fs::create_dir_all(&self.config.root_path)
                .map_err(|e| ManagerError::io(&self.config.root_path, e))?;
            self.root_version_file_path()
        };

        debug!("Write {} in {}", version, target.display());
        fs::write(&target, &version).map_err(|e| ManagerError::io(target, e))?;
        Ok(version)
    }

    async fn detect_with(&self, requested: &str, local_check: bool) -> Result<String, ManagerError> {
        let requested = requested.trim();
        let no_install = self.config.no_install;

        if let Some(version) = normalize_version(requested) {
            if !no_install {
                self.installer.install_exact(&version).await?;
            }
            return Ok(version);
        }

        if requested == LATEST_KEY {
            if no_install {
                let latest = self.retriever.latest_release().await?;
                return Ok(normalize_version(&latest).unwrap_or(latest));
            }
            return self.install_latest().await;
        }

        let predicate = parse_predicate(requested)?;

        if local_check {
            let versions = self.list_local()?;
            if let Some(found) =
                iterate(&versions, predicate.reverse_order()).find(|v| predicate.matches(v))
            {
                return Ok(found.clone());
            }

            if no_install {
                return Err(ManagerError::NoCompatibleVersion);
            }
            debug!("No compatible version found locally, search a remote one...");
        }

        self.search_install_remote(&predicate, no_install).await
    }

    async fn install_latest(&self) -> Result<String, ManagerError> {
        let latest = self.retriever.latest_release().await?;
        let version = normalize_version(&latest).unwrap_or(latest);
        self.installer.install_exact(&version).await?;
        Ok(version)
    }

    async fn search_install_remote(
        &self,
        predicate: &Predicate,
        no_install: bool,
    ) -> Result<String, ManagerError> {
        let versions = self.list_remote().await?;

        let found = iterate(&versions, predicate.reverse_order())
            .find(|v| predicate.matches(v))
            .cloned()
            .ok_or(ManagerError::NoCompatibleVersion)?;
        let version = normalize_version(&found).unwrap_or(found);

        if !no_install {
            self.installer.install_exact(&version).await?;
        }
        Ok(version)
    }
}
