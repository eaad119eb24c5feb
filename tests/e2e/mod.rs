use assert_cmd::Command;
use assert_fs::{prelude::*, TempDir};
use predicates::prelude::*;
use rigup::config::{Config, EnvStoreKind};
use std::path::PathBuf;

pub mod provision;

/// Test context that provides an isolated environment for each run
pub struct TestContext {
    pub temp: TempDir,
    pub config_path: PathBuf,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Create a context whose config points every root into a temp dir
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let config_path = temp.child("rigup.yaml").to_path_buf();

        let config = Config {
            base_url: "http://127.0.0.1:9".to_string(),
            primary_root: temp.child("primary").to_path_buf(),
            secondary_root: temp.child("secondary").to_path_buf(),
            secondary_volume: temp.child("no-such-volume").to_path_buf(),
            editor_command: "rigup-test-editor".to_string(),
            path_variable: "PATH".to_string(),
            env_store: EnvStoreKind::File,
            env_file: Some(temp.child("environment.yaml").to_path_buf()),
            ..Config::default()
        };
        config.save_to(&config_path).unwrap();

        Self { temp, config_path }
    }

    /// Create a Command running rigup with this context's config
    pub fn rigup(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("rigup").unwrap();
        cmd.current_dir(&self.temp);
        cmd.arg("--config").arg(&self.config_path);

        // Keep the default config location inside the temp dir as well
        let config_dir = self.temp.child("config").to_path_buf();
        if cfg!(target_os = "windows") {
            cmd.env("APPDATA", &config_dir);
        } else if cfg!(target_os = "linux") {
            cmd.env("XDG_CONFIG_HOME", &config_dir);
        }
        cmd.env("HOME", self.temp.path());

        cmd
    }

    pub fn primary(&self) -> PathBuf {
        self.temp.child("primary").to_path_buf()
    }
}

#[test]
fn help_lists_options() {
    let ctx = TestContext::new();

    ctx.rigup()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--url").and(predicate::str::contains("--config")));
}

#[test]
fn invalid_url_override_is_rejected() {
    let ctx = TestContext::new();

    ctx.rigup()
        .arg("--url")
        .arg("ftp://files.example.com")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("base_url must be an http(s) URL"));
}

#[test]
fn malformed_config_is_reported() {
    let ctx = TestContext::new();
    ctx.temp.child("rigup.yaml").write_str("base_url: [").unwrap();

    ctx.rigup()
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}
