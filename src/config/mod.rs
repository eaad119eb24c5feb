use crate::core::path::{config_file, ensure_dir};
use crate::core::{RigupError, RigupResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Which persistent environment store PATH changes are written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvStoreKind {
    /// Per-user environment registry (`reg` / `setx`)
    Registry,
    /// YAML file of variables
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// File server base URL (`<base_url>/getAll`, `<base_url>/getFile/<path>`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Working root used when the secondary root is unavailable
    #[serde(default = "default_primary_root")]
    pub primary_root: PathBuf,

    /// Preferred working root
    #[serde(default = "default_secondary_root")]
    pub secondary_root: PathBuf,

    /// Volume that must be reachable before the secondary root is created
    #[serde(default = "default_secondary_volume")]
    pub secondary_volume: PathBuf,

    /// Base files starting with this marker are large toolchains;
    /// only one of them is installed per run
    #[serde(default = "default_toolchain_marker")]
    pub toolchain_marker: String,

    /// Editor CLI used for `--install-extension`
    #[serde(default = "default_editor_command")]
    pub editor_command: String,

    /// Name of the PATH-like variable in the persistent store
    #[serde(default = "default_path_variable")]
    pub path_variable: String,

    #[serde(default = "default_env_store")]
    pub env_store: EnvStoreKind,

    /// Location of the file-backed store (defaults to `<config dir>/rigup/environment.yaml`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_file: Option<PathBuf>,
}

fn default_base_url() -> String {
    "https://ncs.nova.sktelecom.com".to_string()
}

fn default_primary_root() -> PathBuf {
    if cfg!(target_os = "windows") {
        PathBuf::from("C:\\projects")
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("projects")
    }
}

fn default_secondary_root() -> PathBuf {
    if cfg!(target_os = "windows") {
        PathBuf::from("D:\\projects")
    } else {
        PathBuf::from("/data/projects")
    }
}

fn default_secondary_volume() -> PathBuf {
    if cfg!(target_os = "windows") {
        PathBuf::from("D:\\")
    } else {
        PathBuf::from("/data")
    }
}

fn default_toolchain_marker() -> String {
    "microsoft-jdk".to_string()
}

fn default_editor_command() -> String {
    "code".to_string()
}

fn default_path_variable() -> String {
    if cfg!(target_os = "windows") {
        "Path".to_string()
    } else {
        "PATH".to_string()
    }
}

fn default_env_store() -> EnvStoreKind {
    if cfg!(target_os = "windows") {
        EnvStoreKind::Registry
    } else {
        EnvStoreKind::File
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            primary_root: default_primary_root(),
            secondary_root: default_secondary_root(),
            secondary_volume: default_secondary_volume(),
            toolchain_marker: default_toolchain_marker(),
            editor_command: default_editor_command(),
            path_variable: default_path_variable(),
            env_store: default_env_store(),
            env_file: None,
        }
    }
}

impl Config {
    /// Load config from the platform-specific config directory, creating a default if it doesn't exist
    ///
    /// Config locations:
    /// - Windows: %APPDATA%\rigup\config.yaml
    /// - Linux: ~/.config/rigup/config.yaml
    /// - macOS: ~/Library/Application Support/rigup/config.yaml
    pub fn load() -> RigupResult<Self> {
        let config_path = config_file()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    /// Load config from an explicit file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> RigupResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| RigupError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save config to the given file
    pub fn save_to(&self, path: &Path) -> RigupResult<()> {
        let config_dir = path
            .parent()
            .ok_or_else(|| RigupError::Config("Invalid config path".to_string()))?;

        ensure_dir(config_dir)?;

        let content = serde_yaml::to_string(self)
            .map_err(|e| RigupError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> RigupResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(RigupError::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.path_variable.trim().is_empty() {
            return Err(RigupError::Config("path_variable must not be empty".to_string()));
        }
        Ok(())
    }

    /// Apply command-line overrides
    pub fn with_base_url(mut self, url: Option<String>) -> RigupResult<Self> {
        if let Some(url) = url {
            self.base_url = url.trim_end_matches('/').to_string();
            self.validate()?;
        }
        Ok(self)
    }

    /// Resolved location of the file-backed environment store
    pub fn env_file_path(&self) -> RigupResult<PathBuf> {
        match &self.env_file {
            Some(path) => Ok(path.clone()),
            None => crate::core::path::env_file(),
        }
    }
}
