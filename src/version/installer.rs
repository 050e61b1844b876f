//! Installs and removes exact versions under the install root

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::version::archive::unzip_to_dir;
use crate::version::error::ManagerError;
use crate::version::inventory::Inventory;
use crate::version::lock::lock_install_root;
use crate::version::retriever::ReleaseInfoRetriever;

/// Prefix of the staging directories archives are extracted into
const STAGING_PREFIX: &str = ".install-";

pub struct Installer {
    inventory: Inventory,
    retriever: Arc<dyn ReleaseInfoRetriever>,
    client: reqwest::Client,
    display_name: String,
}

impl Installer {
    pub fn new(
        install_path: impl Into<PathBuf>,
        retriever: Arc<dyn ReleaseInfoRetriever>,
        display_name: &str,
    ) -> Self {
        Self {
            inventory: Inventory::new(install_path),
            retriever,
            client: reqwest::Client::builder()
                .user_agent("tofuenv")
                .build()
                .expect("Failed to create HTTP client"),
            display_name: display_name.to_string(),
        }
    }

    fn install_path(&self) -> &Path {
        self.inventory.install_path()
    }

    /// Ensure `version` (already normalized) is installed.
    ///
    /// Returns immediately, without any network access, when its directory exists.
    pub async fn install_exact(&self, version: &str) -> Result<(), ManagerError> {
        if version.is_empty() {
            return Err(ManagerError::EmptyVersion);
        }

        let install_path = self.install_path();
        fs::create_dir_all(install_path).map_err(|e| ManagerError::io(install_path, e))?;

        if self.inventory.contains(version)? {
            debug!("{} {} already installed", self.display_name, version);
            return Ok(());
        }

        let _lock = lock_install_root(install_path)?;
        // Another process may have finished the same install while we waited
        if self.inventory.contains(version)? {
            debug!("{} {} already installed", self.display_name, version);
            return Ok(());
        }

        info!("Installation of {} {}", self.display_name, version);

        let url = self.retriever.download_asset_url(version).await?;
        let data = self.download(&url).await?;

        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(install_path)
            .map_err(|e| ManagerError::io(install_path, e))?;
        // Dropping `staging` on error removes the partial extraction
        unzip_to_dir(&data, staging.path())?;

        let staged = staging.keep();
        let target = install_path.join(version);
        if let Err(e) = fs::rename(&staged, &target) {
            let _ = fs::remove_dir_all(&staged);
            return Err(ManagerError::io(target, e));
        }

        debug!("{} {} installed in {}", self.display_name, version, target.display());
        Ok(())
    }

    /// Remove the directory of `version` (already normalized); a missing directory is success.
    pub fn uninstall_exact(&self, version: &str) -> Result<(), ManagerError> {
        if version.is_empty() {
            return Err(ManagerError::EmptyVersion);
        }

        let install_path = self.install_path();
        let target = install_path.join(version);
        if !target.exists() {
            debug!("{} {} is not installed", self.display_name, version);
            return Ok(());
        }

        let _lock = lock_install_root(install_path)?;
        info!(
            "Uninstallation of {} {} (Remove directory {})",
            self.display_name,
            version,
            target.display()
        );
        match fs::remove_dir_all(&target) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(ManagerError::io(target, e)),
            _ => Ok(()),
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ManagerError> {
        debug!("Download {}", url);
        let download_error = |source| ManagerError::Download {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(download_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ManagerError::DownloadStatus {
                url: url.to_string(),
                status,
            });
        }

        let bytes = response.bytes().await.map_err(download_error)?;
        Ok(bytes.to_vec())
    }
}
