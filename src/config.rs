use std::path::PathBuf;

// =============================================================================
// Version keywords
// =============================================================================

/// Requested version meaning "the newest release published upstream"
pub const LATEST_KEY: &str = "latest";

/// Direction marker: search newest-first for a version matching the suffix
pub const LATEST_PREFIX: &str = "latest:";

// =============================================================================
// Environment variables
// =============================================================================

pub const ROOT_ENV_NAME: &str = "TOFUENV_ROOT";
pub const VERBOSE_ENV_NAME: &str = "TOFUENV_VERBOSE";
pub const NO_INSTALL_ENV_NAME: &str = "TOFUENV_NO_INSTALL";
pub const AUTO_INSTALL_ENV_NAME: &str = "TOFUENV_AUTO_INSTALL";
pub const GITHUB_TOKEN_ENV_NAME: &str = "TOFUENV_GITHUB_TOKEN";
pub const REMOTE_ENV_NAME: &str = "TOFUENV_REMOTE";

/// Per-tool naming of the install folder, override variable and pointer file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolNames {
    pub folder_name: &'static str,
    pub version_env_name: &'static str,
    pub version_file_name: &'static str,
}

pub const TOFU_NAMES: ToolNames = ToolNames {
    folder_name: "OpenTofu",
    version_env_name: "TOFUENV_TOFU_VERSION",
    version_file_name: ".opentofu-version",
};

pub const TERRAFORM_NAMES: ToolNames = ToolNames {
    folder_name: "Terraform",
    version_env_name: "TOFUENV_TF_VERSION",
    version_file_name: ".terraform-version",
};

/// Runtime configuration shared by every version manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Parent of the per-tool install folders and of the root pointer files
    pub root_path: PathBuf,
    /// Directory holding user-scope pointer files
    pub user_path: PathBuf,
    /// Directory holding working-directory pointer files
    pub working_dir: PathBuf,
    pub verbose: bool,
    /// Never write to the install root, only report what would be selected
    pub no_install: bool,
    pub github_token: Option<String>,
    /// Overrides the base URL of the release retriever
    pub remote_url: Option<String>,
}

impl Config {
    /// Builds a configuration with default values rooted at `root_path`.
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            root_path: root_path.into(),
            user_path: home,
            working_dir: PathBuf::from("."),
            verbose: false,
            no_install: false,
            github_token: None,
            remote_url: None,
        }
    }

    /// Loads the configuration from the process environment.
    pub fn from_env() -> Self {
        let mut config =
            Self::from_lookup(|name| std::env::var(name).ok(), dirs::home_dir());
        if let Ok(current_dir) = std::env::current_dir() {
            config.working_dir = current_dir;
        }
        config
    }

    /// Loads the configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F, home_dir: Option<PathBuf>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let home = home_dir.unwrap_or_else(|| PathBuf::from("."));

        let root_path = lookup(ROOT_ENV_NAME)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join(".tofuenv"));

        let no_install = match lookup(NO_INSTALL_ENV_NAME) {
            Some(value) => parse_flag(&value),
            None => lookup(AUTO_INSTALL_ENV_NAME).is_some_and(|value| !parse_flag(&value)),
        };

        Self {
            root_path,
            user_path: home,
            working_dir: PathBuf::from("."),
            verbose: lookup(VERBOSE_ENV_NAME).is_some_and(|value| parse_flag(&value)),
            no_install,
            github_token: lookup(GITHUB_TOKEN_ENV_NAME).filter(|value| !value.is_empty()),
            remote_url: lookup(REMOTE_ENV_NAME).filter(|value| !value.is_empty()),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
