//! GitHub Releases API retriever (OpenTofu)

use serde::Deserialize;
use tracing::debug;

use crate::version::error::RetrieverError;
use crate::version::retriever::ReleaseInfoRetriever;
use crate::version::retrievers::{platform_arch, platform_os, send_checked};

/// Default base URL for GitHub API
const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Repository publishing OpenTofu releases
pub const DEFAULT_REPOSITORY: &str = "opentofu/opentofu";

/// Maximum page size accepted by the releases endpoint
const PAGE_SIZE: usize = 100;

/// Response item from GitHub Releases API
#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
    #[serde(default)]
    assets: Vec<Asset>,
}

#[derive(Debug, Deserialize)]
struct Asset {
    name: String,
    browser_download_url: String,
}

/// Retriever implementation for GitHub Releases API
pub struct GitHubRetriever {
    client: reqwest::Client,
    base_url: String,
    repository: String,
    token: Option<String>,
    os: String,
    arch: String,
}

impl GitHubRetriever {
    /// Creates a new GitHubRetriever with a custom base URL and repository ("owner/name")
    pub fn new(base_url: &str, repository: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("tofuenv")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            repository: repository.to_string(),
            token: None,
            os: platform_os().to_string(),
            arch: platform_arch().to_string(),
        }
    }

    /// Authenticates requests, which raises the API rate limit
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Overrides the platform used to pick release assets
    pub fn with_platform(mut self, os: &str, arch: &str) -> Self {
        self.os = os.to_string();
        self.arch = arch.to_string();
        self
    }

    fn asset_name(&self, version: &str) -> String {
        format!("tofu_{}_{}_{}.zip", version, self.os, self.arch)
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn fetch_release(&self, url: &str, subject: &str) -> Result<Release, RetrieverError> {
        send_checked(self.get(url), subject)
            .await?
            .json()
            .await
            .map_err(|e| RetrieverError::InvalidResponse(e.to_string()))
    }
}

impl Default for GitHubRetriever {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_REPOSITORY)
    }
}

fn strip_tag(tag: &str) -> String {
    tag.strip_prefix('v').unwrap_or(tag).to_string()
}

#[async_trait::async_trait]
impl ReleaseInfoRetriever for GitHubRetriever {
    async fn list_releases(&self) -> Result<Vec<String>, RetrieverError> {
        let mut versions = Vec::new();

        for page in 1.. {
            let url = format!(
                "{}/repos/{}/releases?per_page={}&page={}",
                self.base_url, self.repository, PAGE_SIZE, page
            );
            debug!("Fetch release page {}", page);

            let releases: Vec<Release> = send_checked(self.get(&url), &self.repository)
                .await?
                .json()
                .await
                .map_err(|e| RetrieverError::InvalidResponse(e.to_string()))?;

            let count = releases.len();
            versions.extend(releases.into_iter().map(|r| strip_tag(&r.tag_name)));

            if count < PAGE_SIZE {
                break;
            }
        }

        Ok(versions)
    }

    async fn latest_release(&self) -> Result<String, RetrieverError> {
        let url = format!("{}/repos/{}/releases/latest", self.base_url, self.repository);
        let release = self.fetch_release(&url, &self.repository).await?;
        Ok(strip_tag(&release.tag_name))
    }

    async fn download_asset_url(&self, version: &str) -> Result<String, RetrieverError> {
        let url = format!(
            "{}/repos/{}/releases/tags/v{}",
            self.base_url, self.repository, version
        );
        let release = self.fetch_release(&url, version).await?;

        let asset_name = self.asset_name(version);
        release
            .assets
            .into_iter()
            .find(|asset| asset.name == asset_name)
            .map(|asset| asset.browser_download_url)
            .ok_or_else(|| RetrieverError::MissingAsset {
                version: version.to_string(),
                asset: asset_name,
            })
    }
}
