//! Release source trait for listing and downloading tool releases

#[cfg(test)]
use mockall::automock;

use crate::version::error::RetrieverError;

/// Trait for querying an upstream release index
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleaseInfoRetriever: Send + Sync {
    /// Fetches every published version, in no particular order
    async fn list_releases(&self) -> Result<Vec<String>, RetrieverError>;

    /// Fetches the version upstream currently flags as latest
    async fn latest_release(&self) -> Result<String, RetrieverError>;

    /// Returns the URL of the zip archive for `version` on the current platform
    ///
    /// # Arguments
    /// * `version` - A normalized exact version (e.g., "1.7.0")
    async fn download_asset_url(&self, version: &str) -> Result<String, RetrieverError>;
}
