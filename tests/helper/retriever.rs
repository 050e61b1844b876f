//! Release source test utilities

use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mockito::{Matcher, Mock, Server, ServerGuard};
use tempfile::TempDir;

use tofuenv::config::{Config, ToolNames};
use tofuenv::version::error::RetrieverError;
use tofuenv::version::{ReleaseInfoRetriever, VersionManager};

/// Release source serving a fixed release list and archives from a local HTTP server
pub struct FakeRetriever {
    releases: Vec<String>,
    latest: Option<String>,
    download_base: String,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeRetriever {
    pub fn new(download_base: &str) -> Self {
        Self {
            releases: Vec::new(),
            latest: None,
            download_base: download_base.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_releases(mut self, releases: &[&str]) -> Self {
        self.releases = releases.iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn with_latest(mut self, latest: &str) -> Self {
        self.latest = Some(latest.to_string());
        self
    }

    /// Shared log of the calls made, e.g. "list_releases" or "download_asset_url 1.7.0"
    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ReleaseInfoRetriever for FakeRetriever {
    async fn list_releases(&self) -> Result<Vec<String>, RetrieverError> {
        self.record("list_releases".to_string());
        Ok(self.releases.clone())
    }

    async fn latest_release(&self) -> Result<String, RetrieverError> {
        self.record("latest_release".to_string());
        self.latest
            .clone()
            .ok_or_else(|| RetrieverError::NotFound("latest".to_string()))
    }

    async fn download_asset_url(&self, version: &str) -> Result<String, RetrieverError> {
        self.record(format!("download_asset_url {}", version));
        Ok(format!("{}/download/tofu_{}.zip", self.download_base, version))
    }
}

/// Starts an HTTP server answering every `/download/...` request with a small zip archive
pub async fn archive_server() -> (ServerGuard, Mock) {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Regex(r"^/download/.*\.zip$".to_string()))
        .with_status(200)
        .with_body(zip_bytes(&[("tofu", "#!/bin/sh\necho tofu\n")]))
        .create_async()
        .await;
    (server, mock)
}

pub fn zip_bytes(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default().unix_permissions(0o755);
    for (name, content) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Configuration isolated inside `temp_dir`
pub fn test_config(temp_dir: &TempDir) -> Config {
    let mut config = Config::new(temp_dir.path().join("root"));
    config.user_path = temp_dir.path().join("home");
    config.working_dir = temp_dir.path().join("work");
    config
}

pub fn create_test_manager(
    config: Config,
    names: ToolNames,
    retriever: FakeRetriever,
) -> VersionManager {
    VersionManager::new(config, names, Arc::new(retriever))
}

/// Creates installed version directories
pub fn install_dirs(install_path: &Path, versions: &[&str]) {
    for version in versions {
        std::fs::create_dir_all(install_path.join(version)).unwrap();
    }
}
