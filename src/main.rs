use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tofuenv::config::{Config, LATEST_KEY, TERRAFORM_NAMES, TOFU_NAMES};
use tofuenv::version::retrievers::{GitHubRetriever, HashicorpRetriever, github, hashicorp};
use tofuenv::version::{ReleaseInfoRetriever, VersionManager};

#[derive(Parser)]
#[command(name = "tofuenv")]
#[command(version, about = "Version manager for OpenTofu and Terraform")]
struct Cli {
    /// Root directory of installed versions and pointer files
    #[arg(short, long, global = true)]
    root_path: Option<PathBuf>,

    /// Print diagnostics
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Never install, only report what would be selected
    #[arg(short, long, global = true)]
    no_install: bool,

    /// GitHub token used to query OpenTofu releases
    #[arg(long, global = true)]
    github_token: Option<String>,

    /// Base URL of the release index
    #[arg(long, global = true)]
    remote_url: Option<String>,

    #[command(subcommand)]
    tool: Tool,
}

#[derive(Subcommand)]
enum Tool {
    /// Manage OpenTofu versions
    Tofu {
        #[command(subcommand)]
        command: Command,
    },
    /// Manage Terraform versions
    Tf {
        #[command(subcommand)]
        command: Command,
    },
}

#[derive(Subcommand)]
enum Command {
    /// Display the version selected for the current directory, installing it when needed
    Detect { version: Option<String> },
    /// Install a version (exact, "latest", or constraint)
    Install { version: Option<String> },
    /// List installed versions
    List,
    /// List published versions
    ListRemote,
    /// Remove the root version file
    Reset,
    /// Remove an installed version
    Uninstall { version: String },
    /// Select a version by writing it in a version file
    Use {
        version: String,
        /// Ignore installed versions when resolving a constraint
        #[arg(short, long)]
        force_remote: bool,
        /// Write the version file in the current directory instead of the root directory
        #[arg(short, long)]
        working_dir: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(root_path) = cli.root_path {
        config.root_path = root_path;
    }
    config.verbose |= cli.verbose;
    config.no_install |= cli.no_install;
    if cli.github_token.is_some() {
        config.github_token = cli.github_token;
    }
    if cli.remote_url.is_some() {
        config.remote_url = cli.remote_url;
    }

    init_logging(config.verbose);

    let (manager, command) = match cli.tool {
        Tool::Tofu { command } => {
            let retriever = match &config.remote_url {
                Some(url) => GitHubRetriever::new(url, github::DEFAULT_REPOSITORY),
                None => GitHubRetriever::default(),
            }
            .with_token(config.github_token.clone());
            (build_manager(config, TOFU_NAMES, retriever), command)
        }
        Tool::Tf { command } => {
            let retriever = match &config.remote_url {
                Some(url) => HashicorpRetriever::new(url, hashicorp::DEFAULT_PRODUCT),
                None => HashicorpRetriever::default(),
            };
            (build_manager(config, TERRAFORM_NAMES, retriever), command)
        }
    };

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run(&manager, command))
}

fn build_manager(
    config: Config,
    names: tofuenv::config::ToolNames,
    retriever: impl ReleaseInfoRetriever + 'static,
) -> VersionManager {
    VersionManager::new(config, names, Arc::new(retriever))
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "tofuenv=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

async fn run(manager: &VersionManager, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Detect { version } => {
            let requested = version.unwrap_or_else(|| manager.resolve(LATEST_KEY));
            let detected = manager.detect(&requested).await?;
            println!("{} {} will be run from this directory.", manager.names().folder_name, detected);
        }
        Command::Install { version } => {
            let requested = version.unwrap_or_else(|| manager.resolve(LATEST_KEY));
            let installed = manager.install(&requested).await?;
            println!("{} {} installed", manager.names().folder_name, installed);
        }
        Command::List => {
            let selected = manager.resolve("");
            for version in manager.list_local()? {
                let marker = if version == selected { "*" } else { " " };
                println!("{} {}", marker, version);
            }
        }
        Command::ListRemote => {
            let installed = manager.local_set();
            for version in manager.list_remote().await? {
                if installed.contains(&version) {
                    println!("{} (installed)", version);
                } else {
                    println!("{}", version);
                }
            }
        }
        Command::Reset => manager.reset()?,
        Command::Uninstall { version } => manager.uninstall(&version)?,
        Command::Use {
            version,
            force_remote,
            working_dir,
        } => {
            let selected = manager.use_version(&version, force_remote, working_dir).await?;
            println!("{} {} selected", manager.names().folder_name, selected);
        }
    }
    Ok(())
}
