//! HashiCorp releases index retriever (Terraform)

use std::collections::HashMap;

use serde::Deserialize;

use crate::version::error::RetrieverError;
use crate::version::retriever::ReleaseInfoRetriever;
use crate::version::retrievers::{platform_arch, platform_os, send_checked};
use crate::version::semver::parse_version;

/// Default base URL for the HashiCorp releases site
const DEFAULT_BASE_URL: &str = "https://releases.hashicorp.com";

pub const DEFAULT_PRODUCT: &str = "terraform";

/// Response from `/{product}/index.json`
#[derive(Debug, Deserialize)]
struct ProductIndex {
    versions: HashMap<String, serde_json::Value>,
}

/// Response from `/{product}/{version}/index.json`
#[derive(Debug, Deserialize)]
struct ReleaseIndex {
    builds: Vec<Build>,
}

#[derive(Debug, Deserialize)]
struct Build {
    os: String,
    arch: String,
    url: String,
}

/// Retriever implementation for releases.hashicorp.com
pub struct HashicorpRetriever {
    client: reqwest::Client,
    base_url: String,
    product: String,
    os: String,
    arch: String,
}

impl HashicorpRetriever {
    /// Creates a new HashicorpRetriever with a custom base URL and product name
    pub fn new(base_url: &str, product: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("tofuenv")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            product: product.to_string(),
            os: platform_os().to_string(),
            arch: platform_arch().to_string(),
        }
    }

    /// Overrides the platform used to pick release builds
    pub fn with_platform(mut self, os: &str, arch: &str) -> Self {
        self.os = os.to_string();
        self.arch = arch.to_string();
        self
    }
}

impl Default for HashicorpRetriever {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_PRODUCT)
    }
}

#[async_trait::async_trait]
impl ReleaseInfoRetriever for HashicorpRetriever {
    async fn list_releases(&self) -> Result<Vec<String>, RetrieverError> {
        let url = format!("{}/{}/index.json", self.base_url, self.product);

        let index: ProductIndex = send_checked(self.client.get(&url), &self.product)
            .await?
            .json()
            .await
            .map_err(|e| RetrieverError::InvalidResponse(e.to_string()))?;

        Ok(index.versions.into_keys().collect())
    }

    async fn latest_release(&self) -> Result<String, RetrieverError> {
        // The index carries no "latest" marker: take the highest stable version
        self.list_releases()
            .await?
            .into_iter()
            .filter_map(|v| parse_version(&v).filter(|parsed| parsed.pre.is_empty()))
            .max()
            .map(|v| v.to_string())
            .ok_or_else(|| {
                RetrieverError::InvalidResponse(format!("no stable {} release", self.product))
            })
    }

    async fn download_asset_url(&self, version: &str) -> Result<String, RetrieverError> {
        let url = format!("{}/{}/{}/index.json", self.base_url, self.product, version);

        let release: ReleaseIndex = send_checked(self.client.get(&url), version)
            .await?
            .json()
            .await
            .map_err(|e| RetrieverError::InvalidResponse(e.to_string()))?;

        let asset_name = format!("{}_{}_{}_{}.zip", self.product, version, self.os, self.arch);
        release
            .builds
            .into_iter()
            .find(|build| build.os == self.os && build.arch == self.arch)
            .map(|build| build.url)
            .ok_or(RetrieverError::MissingAsset {
                version: version.to_string(),
                asset: asset_name,
            })
    }
}
