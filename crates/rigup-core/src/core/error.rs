use thiserror::Error;

pub type RigupResult<T> = Result<T, RigupError>;

#[derive(Error, Debug)]
pub enum RigupError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The remote file list could not be retrieved or parsed.
    /// Aborts the run before any download.
    #[error("Failed to fetch manifest: {0}")]
    ManifestFetch(String),

    /// A required directory could not be created, or the persistent
    /// environment store could not be mutated safely.
    #[error("Environment error: {0}")]
    Environment(String),

    /// A single target file failed to download, extract or install.
    /// The run continues with the next item.
    #[error("{file}: {reason}")]
    Item { file: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Prompt error: {0}")]
    Prompt(String),
}

impl RigupError {
    /// Build a per-item error from any displayable cause.
    pub fn item(file: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        RigupError::Item {
            file: file.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error must halt the pipeline.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, RigupError::Item { .. })
    }
}
