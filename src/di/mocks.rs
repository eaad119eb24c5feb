//! In-memory implementations of service traits for testing

use super::traits::{Confirmer, EnvStore, FileSource, ProcessOutput, ProcessRunner};
use crate::core::{RigupError, RigupResult};
use crate::provision::interactive::is_affirmative;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Confirmer that replays scripted answers
///
/// Answers are parsed exactly like console input. Once the script is
/// exhausted every prompt receives an empty answer, which proceeds.
///
/// # Example
///
/// ```
/// use rigup::di::mocks::ScriptedConfirmer;
/// use rigup::di::Confirmer;
///
/// let confirmer = ScriptedConfirmer::new(["n", "Yes"]);
/// assert!(!confirmer.confirm("first?").unwrap());
/// assert!(confirmer.confirm("second?").unwrap());
/// assert!(confirmer.confirm("third?").unwrap());
/// assert_eq!(confirmer.prompts().len(), 3);
/// ```
#[derive(Clone, Default)]
pub struct ScriptedConfirmer {
    answers: Arc<Mutex<VecDeque<String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedConfirmer {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Arc::new(Mutex::new(answers.into_iter().map(Into::into).collect())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Confirmer that accepts every prompt
    pub fn always_yes() -> Self {
        Self::default()
    }

    /// Prompts shown so far, in order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Confirmer for ScriptedConfirmer {
    fn confirm(&self, prompt: &str) -> RigupResult<bool> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let answer = self.answers.lock().unwrap().pop_front().unwrap_or_default();
        Ok(is_affirmative(&answer))
    }
}

/// Process runner that records invocations instead of executing them
///
/// Programs whose path contains a registered failure marker exit with
/// code 1 (printing the registered stderr, if any); programs containing a
/// registered output marker print that output.
#[derive(Clone, Default)]
pub struct RecordingProcessRunner {
    calls: Arc<Mutex<Vec<(PathBuf, Vec<String>)>>>,
    failing: Arc<Mutex<Vec<(String, String)>>>,
    outputs: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every program whose path contains `marker` fail
    pub fn fail_when(&self, marker: &str) {
        self.fail_with(marker, "");
    }

    /// Make every program whose path contains `marker` fail with `stderr`
    pub fn fail_with(&self, marker: &str, stderr: &str) {
        self.failing
            .lock()
            .unwrap()
            .push((marker.to_string(), stderr.to_string()));
    }

    /// Make every program whose path contains `marker` print `stdout`
    pub fn respond_with(&self, marker: &str, stdout: &str) {
        self.outputs
            .lock()
            .unwrap()
            .push((marker.to_string(), stdout.to_string()));
    }

    /// Recorded `(program, args)` pairs
    pub fn calls(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProcessRunner for RecordingProcessRunner {
    fn run(&self, program: &Path, args: &[String]) -> RigupResult<ProcessOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_path_buf(), args.to_vec()));

        let program_str = program.to_string_lossy();
        if let Some((_, stderr)) = self
            .failing
            .lock()
            .unwrap()
            .iter()
            .find(|(m, _)| program_str.contains(m.as_str()))
        {
            return Ok(ProcessOutput {
                stderr: stderr.clone(),
                ..ProcessOutput::failed(1)
            });
        }

        let stdout = self
            .outputs
            .lock()
            .unwrap()
            .iter()
            .find(|(m, _)| program_str.contains(m.as_str()))
            .map(|(_, out)| out.clone())
            .unwrap_or_default();
        Ok(ProcessOutput::ok(stdout))
    }
}

/// Environment store kept in memory
///
/// `snapshot` writes the variables as `name=value` lines so backup files
/// exist on disk.
#[derive(Clone, Default)]
pub struct MemoryEnvStore {
    vars: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<Mutex<Vec<(String, String)>>>,
    fail_snapshot: Arc<Mutex<bool>>,
    fail_write: Arc<Mutex<bool>>,
}

impl MemoryEnvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one variable
    pub fn with_var(name: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .vars
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
        store
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.vars.lock().unwrap().get(name).cloned()
    }

    /// Every write performed, in order
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn set_fail_snapshot(&self, fail: bool) {
        *self.fail_snapshot.lock().unwrap() = fail;
    }

    pub fn set_fail_write(&self, fail: bool) {
        *self.fail_write.lock().unwrap() = fail;
    }
}

impl EnvStore for MemoryEnvStore {
    fn read(&self, name: &str) -> RigupResult<Option<String>> {
        Ok(self.get(name))
    }

    fn write(&self, name: &str, value: &str) -> RigupResult<()> {
        if *self.fail_write.lock().unwrap() {
            return Err(RigupError::Environment(format!("cannot write {}", name)));
        }
        self.vars
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
        self.writes
            .lock()
            .unwrap()
            .push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn snapshot(&self, dest: &Path) -> RigupResult<()> {
        if *self.fail_snapshot.lock().unwrap() {
            return Err(RigupError::Environment("snapshot refused".to_string()));
        }
        let mut lines: Vec<String> = self
            .vars
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        lines.sort();
        fs::write(dest, lines.join("\n"))?;
        Ok(())
    }
}

/// File server kept in memory
///
/// Entries registered with `add_file` download their bytes; any other
/// entry, or one marked with `fail_on`, fails like an HTTP 404.
#[derive(Clone, Default)]
pub struct MemoryFileSource {
    listing: Arc<Mutex<Option<Vec<String>>>>,
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl MemoryFileSource {
    /// Source whose listing is `entries`; each entry serves its own name as content
    pub fn new(entries: Vec<String>) -> Self {
        let files = entries
            .iter()
            .map(|e| (e.clone(), e.as_bytes().to_vec()))
            .collect();
        Self {
            listing: Arc::new(Mutex::new(Some(entries))),
            files: Arc::new(Mutex::new(files)),
            ..Default::default()
        }
    }

    /// Source whose listing request fails
    pub fn unreachable() -> Self {
        Self::default()
    }

    pub fn add_file(&self, entry: &str, content: Vec<u8>) {
        self.files.lock().unwrap().insert(entry.to_string(), content);
    }

    pub fn fail_on(&self, entry: &str) {
        self.failing.lock().unwrap().insert(entry.to_string());
    }

    /// Entries requested through `fetch_file`, in order
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl FileSource for MemoryFileSource {
    async fn fetch_listing(&self) -> RigupResult<Vec<String>> {
        self.listing
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| RigupError::ManifestFetch("connection refused".to_string()))
    }

    async fn fetch_file(&self, entry: &str, dest: &Path) -> RigupResult<u64> {
        self.requested.lock().unwrap().push(entry.to_string());

        if self.failing.lock().unwrap().contains(entry) {
            return Err(RigupError::item(entry, "HTTP 500 Internal Server Error"));
        }

        let content = self
            .files
            .lock()
            .unwrap()
            .get(entry)
            .cloned()
            .ok_or_else(|| RigupError::item(entry, "HTTP 404 Not Found"))?;

        fs::write(dest, &content)?;
        Ok(content.len() as u64)
    }
}
