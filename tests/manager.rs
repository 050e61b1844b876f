mod helper;

use std::fs;

use serial_test::serial;
use tempfile::TempDir;

use helper::retriever::{
    FakeRetriever, archive_server, create_test_manager, install_dirs, test_config,
};
use tofuenv::config::{TOFU_NAMES, ToolNames};
use tofuenv::version::ManagerError;

/// Tool names with an override variable no other test or user sets
const RESOLVE_NAMES: ToolNames = ToolNames {
    folder_name: "OpenTofu",
    version_env_name: "TOFUENV_TEST_RESOLVE_VERSION",
    version_file_name: ".opentofu-version",
};

#[tokio::test]
async fn constraint_without_local_check_installs_first_remote_match() {
    let temp_dir = TempDir::new().unwrap();
    let (server, download) = archive_server().await;
    let retriever = FakeRetriever::new(&server.url())
        .with_releases(&["1.6.6", "1.7.0-rc1", "1.7.0-rc2", "1.7.0"]);
    let calls = retriever.calls();
    let config = test_config(&temp_dir);
    fs::create_dir_all(&config.working_dir).unwrap();

    let manager = create_test_manager(config, TOFU_NAMES, retriever);
    let result = manager.use_version(">=1.7.0", true, true).await.unwrap();

    download.assert_async().await;
    assert_eq!(result, "1.7.0");
    assert_eq!(manager.list_local().unwrap(), vec!["1.7.0"]);
    assert!(manager.install_path().join("1.7.0/tofu").is_file());
    assert_eq!(
        fs::read_to_string(manager.working_version_file_path()).unwrap(),
        "1.7.0"
    );
    assert_eq!(
        *calls.lock().unwrap(),
        vec!["list_releases", "download_asset_url 1.7.0"]
    );
}

#[tokio::test]
async fn constraint_matching_local_version_makes_no_remote_call() {
    let temp_dir = TempDir::new().unwrap();
    let retriever = FakeRetriever::new("http://127.0.0.1:9").with_releases(&["9.9.9"]);
    let calls = retriever.calls();

    let manager = create_test_manager(test_config(&temp_dir), TOFU_NAMES, retriever);
    install_dirs(&manager.install_path(), &["1.6.6", "1.7.0"]);

    let result = manager.detect("~>1.6").await.unwrap();

    assert_eq!(result, "1.6.6");
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn latest_in_no_install_mode_reports_upstream_latest_without_installing() {
    let temp_dir = TempDir::new().unwrap();
    let retriever = FakeRetriever::new("http://127.0.0.1:9")
        .with_releases(&["2.0.0"])
        .with_latest("2.0.0");
    let calls = retriever.calls();
    let mut config = test_config(&temp_dir);
    config.no_install = true;

    let manager = create_test_manager(config.clone(), TOFU_NAMES, retriever);
    let result = manager.detect("latest").await.unwrap();

    assert_eq!(result, "2.0.0");
    assert!(!manager.install_path().exists());
    assert!(!config.root_path.exists());
    assert_eq!(*calls.lock().unwrap(), vec!["latest_release"]);
}

#[tokio::test]
async fn install_of_empty_version_fails() {
    let temp_dir = TempDir::new().unwrap();
    let retriever = FakeRetriever::new("http://127.0.0.1:9");
    let calls = retriever.calls();

    let manager = create_test_manager(test_config(&temp_dir), TOFU_NAMES, retriever);
    let result = manager.install("").await;

    assert!(matches!(result, Err(ManagerError::EmptyVersion)));
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn second_install_of_same_version_skips_the_network() {
    let temp_dir = TempDir::new().unwrap();
    let (server, download) = archive_server().await;
    let retriever = FakeRetriever::new(&server.url());
    let calls = retriever.calls();

    let manager = create_test_manager(test_config(&temp_dir), TOFU_NAMES, retriever);
    manager.install("1.6.6").await.unwrap();
    let after_first = manager.list_local().unwrap();
    manager.install("v1.6.6").await.unwrap();

    download.assert_async().await;
    assert_eq!(manager.list_local().unwrap(), after_first);
    assert_eq!(*calls.lock().unwrap(), vec!["download_asset_url 1.6.6"]);
}

#[tokio::test]
async fn uninstall_removes_installed_version() {
    let temp_dir = TempDir::new().unwrap();
    let (server, _download) = archive_server().await;
    let retriever = FakeRetriever::new(&server.url()).with_latest("1.7.0");

    let manager = create_test_manager(test_config(&temp_dir), TOFU_NAMES, retriever);
    assert_eq!(manager.install("latest").await.unwrap(), "1.7.0");

    manager.uninstall("1.7.0").unwrap();
    assert!(manager.list_local().unwrap().is_empty());

    // Removing it again is not an error
    manager.uninstall("1.7.0").unwrap();
}

#[test]
fn uninstall_of_missing_version_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    let manager = create_test_manager(
        test_config(&temp_dir),
        TOFU_NAMES,
        FakeRetriever::new("http://127.0.0.1:9"),
    );

    assert!(manager.uninstall("1.2.3").is_ok());
}

#[tokio::test]
#[serial]
async fn use_version_writes_root_pointer_read_back_by_resolve() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config(&temp_dir);
    config.no_install = true;

    let manager = create_test_manager(
        config,
        RESOLVE_NAMES,
        FakeRetriever::new("http://127.0.0.1:9"),
    );
    manager.use_version("1.6", false, false).await.unwrap();

    assert_eq!(
        fs::read_to_string(manager.root_version_file_path()).unwrap(),
        "1.6.0"
    );
    assert_eq!(manager.resolve("latest"), "1.6.0");

    manager.reset().unwrap();
    assert_eq!(manager.resolve("latest"), "latest");
}

#[tokio::test]
async fn use_version_does_not_write_when_resolution_fails() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config(&temp_dir);
    config.no_install = true;

    let manager = create_test_manager(
        config,
        TOFU_NAMES,
        FakeRetriever::new("http://127.0.0.1:9"),
    );
    let result = manager.use_version("~>5.0", false, false).await;

    assert!(matches!(result, Err(ManagerError::NoCompatibleVersion)));
    assert!(!manager.root_version_file_path().exists());
}

#[test]
#[serial]
fn resolve_follows_source_precedence() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);
    for dir in [&config.root_path, &config.user_path, &config.working_dir] {
        fs::create_dir_all(dir).unwrap();
    }
    let file_name = RESOLVE_NAMES.version_file_name;
    let manager = create_test_manager(
        config.clone(),
        RESOLVE_NAMES,
        FakeRetriever::new("http://127.0.0.1:9"),
    );

    assert_eq!(manager.resolve("latest"), "latest");

    fs::write(config.root_path.join(file_name), "1.0.0\n").unwrap();
    assert_eq!(manager.resolve("latest"), "1.0.0");

    fs::write(config.user_path.join(file_name), "  1.1.0  ").unwrap();
    assert_eq!(manager.resolve("latest"), "1.1.0");

    fs::write(config.working_dir.join(file_name), "~>1.2").unwrap();
    assert_eq!(manager.resolve("latest"), "~>1.2");

    // SAFETY: serialized with every other test touching the environment
    unsafe { std::env::set_var(RESOLVE_NAMES.version_env_name, "1.3.0") };
    assert_eq!(manager.resolve("latest"), "1.3.0");
    unsafe { std::env::remove_var(RESOLVE_NAMES.version_env_name) };
}

#[test]
#[serial]
fn resolve_skips_empty_sources() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);
    fs::create_dir_all(&config.root_path).unwrap();
    fs::create_dir_all(&config.working_dir).unwrap();
    let file_name = RESOLVE_NAMES.version_file_name;
    let manager = create_test_manager(
        config.clone(),
        RESOLVE_NAMES,
        FakeRetriever::new("http://127.0.0.1:9"),
    );

    fs::write(config.working_dir.join(file_name), "\n").unwrap();
    fs::write(config.root_path.join(file_name), "1.0.0").unwrap();
    // SAFETY: serialized with every other test touching the environment
    unsafe { std::env::set_var(RESOLVE_NAMES.version_env_name, "") };

    assert_eq!(manager.resolve("latest"), "1.0.0");
    unsafe { std::env::remove_var(RESOLVE_NAMES.version_env_name) };
}
