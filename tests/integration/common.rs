//! Common utilities for integration tests

use rigup::config::{Config, EnvStoreKind};
use rigup::di::mocks::{MemoryEnvStore, MemoryFileSource, RecordingProcessRunner, ScriptedConfirmer};
use rigup::di::{FileSource, ServiceContainer};
use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use zip::write::{FileOptions, ZipWriter};

/// Isolated roots plus handles on every fake the pipeline talks to
pub struct Harness {
    pub temp: TempDir,
    pub config: Config,
    pub confirmer: ScriptedConfirmer,
    pub runner: RecordingProcessRunner,
    pub env: MemoryEnvStore,
}

impl Harness {
    pub fn new(answers: &[&str]) -> Self {
        let temp = TempDir::new().unwrap();
        let config = Config {
            primary_root: temp.path().join("primary"),
            secondary_root: temp.path().join("secondary"),
            secondary_volume: temp.path().join("no-such-volume"),
            editor_command: "rigup-test-editor".to_string(),
            path_variable: "Path".to_string(),
            env_store: EnvStoreKind::File,
            ..Config::default()
        };

        Self {
            temp,
            config,
            confirmer: ScriptedConfirmer::new(answers.iter().copied()),
            runner: RecordingProcessRunner::new(),
            env: MemoryEnvStore::new(),
        }
    }

    /// Where the pipeline lands when neither root exists
    pub fn primary(&self) -> PathBuf {
        self.config.primary_root.clone()
    }

    pub fn container(&self, source: Arc<dyn FileSource>) -> ServiceContainer {
        ServiceContainer::with_providers(
            source,
            Arc::new(self.confirmer.clone()),
            Arc::new(self.runner.clone()),
            Arc::new(self.env.clone()),
        )
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Build a zip archive in memory
pub fn zip_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in files {
        zip.start_file(*name, FileOptions::default()).unwrap();
        zip.write_all(content).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// The manifest used by most scenarios, with a real toolchain archive
pub fn standard_source() -> MemoryFileSource {
    let source = MemoryFileSource::new(strings(&[
        "a.txt",
        "extensions/python/ext.vsix",
        "extensions/common/base.vsix",
        "microsoft-jdk-11.zip",
        "microsoft-jdk-17.zip",
    ]));
    source.add_file(
        "microsoft-jdk-11.zip",
        zip_bytes(&[("jdk-11/bin/java", b"#!java"), ("jdk-11/release", b"11")]),
    );
    source
}
