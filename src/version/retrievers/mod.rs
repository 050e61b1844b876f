//! Release source implementations for each supported tool

pub mod github;
pub mod hashicorp;

pub use github::GitHubRetriever;
pub use hashicorp::HashicorpRetriever;

use tracing::warn;

use crate::version::error::RetrieverError;

/// Operating system name as used in release asset names
pub fn platform_os() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

/// CPU architecture name as used in release asset names
pub fn platform_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "arm" => "arm",
        other => other,
    }
}

/// Sends `request`, mapping error statuses the way every release index reports them.
///
/// `subject` names what was requested and ends up in `NotFound`.
pub(crate) async fn send_checked(
    request: reqwest::RequestBuilder,
    subject: &str,
) -> Result<reqwest::Response, RetrieverError> {
    let response = request.send().await?;
    let status = response.status();

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(RetrieverError::NotFound(subject.to_string()));
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        return Err(RetrieverError::RateLimited {
            retry_after_secs: retry_after,
        });
    }

    if !status.is_success() {
        warn!("Release index returned status {} for {}", status, response.url());
        return Err(RetrieverError::InvalidResponse(format!(
            "Unexpected status: {}",
            status
        )));
    }

    Ok(response)
}
