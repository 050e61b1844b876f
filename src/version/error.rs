use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetrieverError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Release not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No asset {asset} in release {version}")]
    MissingAsset { version: String, asset: String },
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive entry escapes destination: {0}")]
    UnsafePath(String),
}

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Invalid version constraint {input:?}: {reason}")]
    Parse { input: String, reason: String },

    #[error("Empty version")]
    EmptyVersion,

    #[error("No compatible version found")]
    NoCompatibleVersion,

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Retriever(#[from] RetrieverError),

    #[error("Download of {url} failed: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Download of {url} failed with status {status}")]
    DownloadStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),
}

impl ManagerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(input: &str, reason: impl ToString) -> Self {
        Self::Parse {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }
}
