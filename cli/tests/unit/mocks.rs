//! Shared mock ports for unit tests.
//!
//! Every mock records what it was asked to do so tests can assert on call
//! order and cleanup behaviour.

#![allow(clippy::expect_used, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::sync::Mutex;

use anyhow::Result;
use stackforge_action::application::ports::{
    ArchiveExtractor, ArtifactFetcher, CommandRunner, ConfigResolver, FetchedArchive, LocalFs,
    OutputSink, ProgressReporter,
};
use stackforge_action::domain::{FetchError, ForgeSettings, InputError, JobRequest};

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

/// Zero exit status but text on stderr.
pub fn warn_output(stdout: &[u8], stderr: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: stderr.to_vec(),
    }
}

pub const OUTPUTS_JSON: &str = r#"{"url":{"sensitive":false,"type":"string","value":"https://example.com"}}"#;

pub fn settings() -> ForgeSettings {
    ForgeSettings {
        archive: PathBuf::from("output.tgz"),
        working_dir: PathBuf::from("./out"),
        ..ForgeSettings::default()
    }
}

pub fn job() -> JobRequest {
    JobRequest::new("app.yaml", "k-123", "prod").expect("valid job")
}

// ── ScriptedRunner ───────────────────────────────────────────────────────────

/// Canned response for one command line.
pub enum Reply {
    Output(Output),
    SpawnError(&'static str),
}

/// Recorded invocation: `(cwd, program, args)`.
pub type Call = (PathBuf, String, Vec<String>);

/// `CommandRunner` answering by the joined argument list.
///
/// Unscripted commands succeed with empty output, except `output -json`
/// which returns [`OUTPUTS_JSON`].
#[derive(Default)]
pub struct ScriptedRunner {
    replies: Vec<(String, Reply)>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `args` (space-joined, e.g. `"plan -out tf-plan"`) with `reply`.
    pub fn with(mut self, args: &str, reply: Reply) -> Self {
        self.replies.push((args.to_string(), reply));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("mutex poisoned").clone()
    }

    /// Space-joined argument lists in call order.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().into_iter().map(|(_, _, a)| a.join(" ")).collect()
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, cwd: &Path, program: &str, args: &[&str]) -> Result<Output> {
        let line = args.join(" ");
        self.calls.lock().expect("mutex poisoned").push((
            cwd.to_path_buf(),
            program.to_string(),
            args.iter().map(ToString::to_string).collect(),
        ));
        match self.replies.iter().find(|(a, _)| *a == line) {
            Some((_, Reply::Output(out))) => Ok(out.clone()),
            Some((_, Reply::SpawnError(msg))) => anyhow::bail!("{msg}"),
            None if line == "output -json" => Ok(ok_output(OUTPUTS_JSON.as_bytes())),
            None => Ok(ok_output(b"")),
        }
    }
}

// ── RecordingFs ──────────────────────────────────────────────────────────────

/// `LocalFs` that records removals without touching the disk.
#[derive(Default)]
pub struct RecordingFs {
    /// Answer for `is_absent_or_empty`; flipped to `true` once the dir is removed.
    pub occupied: Mutex<bool>,
    pub fail_removals: bool,
    pub removed: Mutex<Vec<(&'static str, PathBuf)>>,
}

impl RecordingFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn occupied() -> Self {
        Self {
            occupied: Mutex::new(true),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_removals: true,
            ..Self::default()
        }
    }

    pub fn removed(&self) -> Vec<(&'static str, PathBuf)> {
        self.removed.lock().expect("mutex poisoned").clone()
    }
}

impl LocalFs for RecordingFs {
    fn is_absent_or_empty(&self, _path: &Path) -> Result<bool> {
        Ok(!*self.occupied.lock().expect("mutex poisoned"))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        self.removed
            .lock()
            .expect("mutex poisoned")
            .push(("dir", path.to_path_buf()));
        if self.fail_removals {
            anyhow::bail!("permission denied");
        }
        *self.occupied.lock().expect("mutex poisoned") = false;
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.removed
            .lock()
            .expect("mutex poisoned")
            .push(("file", path.to_path_buf()));
        if self.fail_removals {
            anyhow::bail!("permission denied");
        }
        Ok(())
    }
}

// ── Fetcher / extractor / resolver ───────────────────────────────────────────

/// `ArtifactFetcher` returning a canned archive or HTTP status error.
pub struct CannedFetcher {
    pub status: Option<u16>,
    pub requests: Mutex<Vec<(String, String, String, PathBuf)>>,
}

impl CannedFetcher {
    pub fn ok() -> Self {
        Self {
            status: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(code: u16) -> Self {
        Self {
            status: Some(code),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// `(config_file, api_key, stage, dest)` per call.
    pub fn requests(&self) -> Vec<(String, String, String, PathBuf)> {
        self.requests.lock().expect("mutex poisoned").clone()
    }
}

impl ArtifactFetcher for CannedFetcher {
    async fn fetch(&self, job: &JobRequest, dest: &Path) -> Result<FetchedArchive> {
        self.requests.lock().expect("mutex poisoned").push((
            job.config_file().display().to_string(),
            job.api_key().expose().to_string(),
            job.stage().to_string(),
            dest.to_path_buf(),
        ));
        if let Some(code) = self.status {
            return Err(FetchError::Status {
                code,
                body: "invalid api key".to_string(),
            }
            .into());
        }
        Ok(FetchedArchive {
            path: dest.to_path_buf(),
            bytes: 42,
            sha256: "ab".repeat(32),
        })
    }
}

/// `ArchiveExtractor` that records calls and optionally fails.
#[derive(Default)]
pub struct CannedExtractor {
    pub fail: bool,
    pub calls: Mutex<Vec<(PathBuf, PathBuf)>>,
}

impl CannedExtractor {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<(PathBuf, PathBuf)> {
        self.calls.lock().expect("mutex poisoned").clone()
    }
}

impl ArchiveExtractor for CannedExtractor {
    async fn extract(&self, archive: &Path, dest: &Path) -> Result<()> {
        self.calls
            .lock()
            .expect("mutex poisoned")
            .push((archive.to_path_buf(), dest.to_path_buf()));
        if self.fail {
            anyhow::bail!("invalid gzip header");
        }
        Ok(())
    }
}

/// `ConfigResolver` with a fixed answer.
pub struct FixedResolver(pub Option<&'static str>);

impl ConfigResolver for FixedResolver {
    fn resolve(&self, pattern: &str) -> Result<PathBuf> {
        self.0
            .map(PathBuf::from)
            .ok_or_else(|| InputError::ConfigNotFound(pattern.to_string()).into())
    }
}

// ── Sink / reporter ──────────────────────────────────────────────────────────

/// `OutputSink` capturing everything written to it.
#[derive(Default)]
pub struct CapturingSink {
    pub masks: Mutex<Vec<String>>,
    pub envs: Mutex<Vec<(String, String)>>,
    pub outputs: Mutex<Vec<(String, String)>>,
    pub failures: Mutex<Vec<String>>,
}

impl OutputSink for CapturingSink {
    fn mask(&self, secret: &str) -> Result<()> {
        self.masks.lock().expect("mutex poisoned").push(secret.to_string());
        Ok(())
    }

    fn set_env(&self, name: &str, value: &str) -> Result<()> {
        self.envs
            .lock()
            .expect("mutex poisoned")
            .push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        self.outputs
            .lock()
            .expect("mutex poisoned")
            .push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn fail(&self, message: &str) {
        self.failures
            .lock()
            .expect("mutex poisoned")
            .push(message.to_string());
    }
}

/// `ProgressReporter` capturing `(kind, message)` events.
#[derive(Default)]
pub struct CapturingReporter {
    pub events: Mutex<Vec<(&'static str, String)>>,
}

impl CapturingReporter {
    pub fn of_kind(&self, kind: &str) -> Vec<String> {
        self.events
            .lock()
            .expect("mutex poisoned")
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, m)| m.clone())
            .collect()
    }

    fn push(&self, kind: &'static str, message: &str) {
        self.events
            .lock()
            .expect("mutex poisoned")
            .push((kind, message.to_string()));
    }
}

impl ProgressReporter for CapturingReporter {
    fn step(&self, message: &str) {
        self.push("step", message);
    }
    fn success(&self, message: &str) {
        self.push("success", message);
    }
    fn warn(&self, message: &str) {
        self.push("warn", message);
    }
    fn output(&self, text: &str) {
        self.push("output", text);
    }
    fn diagnostic(&self, text: &str) {
        self.push("diagnostic", text);
    }
}
