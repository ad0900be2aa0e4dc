//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;

use crate::domain::JobRequest;

// ── Value Types ───────────────────────────────────────────────────────────────

/// A fully written archive returned by the transformation API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedArchive {
    /// Local path of the archive file.
    pub path: PathBuf,
    /// Number of bytes written.
    pub bytes: u64,
    /// Hex-encoded SHA-256 of the archive contents.
    pub sha256: String,
}

// ── Input Resolution Port ─────────────────────────────────────────────────────

/// Resolves the `config_file` input pattern to a single file.
pub trait ConfigResolver {
    /// # Errors
    ///
    /// Returns an `InputError` if the pattern matches zero or several files.
    fn resolve(&self, pattern: &str) -> Result<PathBuf>;
}

// ── Transformation API Port ───────────────────────────────────────────────────

/// Uploads the job to the transformation API and stores the returned archive.
#[allow(async_fn_in_trait)]
pub trait ArtifactFetcher {
    /// Post the job and stream the response body into `dest`.
    ///
    /// Returns only once the file is complete and closed. A single attempt is
    /// made; there are no retries.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or a local
    /// write failure.
    async fn fetch(&self, job: &JobRequest, dest: &Path) -> Result<FetchedArchive>;
}

// ── Archive Port ──────────────────────────────────────────────────────────────

/// Unpacks a compressed archive into a directory.
#[allow(async_fn_in_trait)]
pub trait ArchiveExtractor {
    /// Extract `archive` fully into `dest`, creating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive is invalid or `dest` cannot be written.
    async fn extract(&self, archive: &Path, dest: &Path) -> Result<()>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run `program` with `args` in directory `cwd` and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds the
    /// runner's timeout. On timeout, the child process must be killed.
    async fn run(&self, cwd: &Path, program: &str, args: &[&str]) -> Result<Output>;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Filesystem operations needed for run hygiene.
///
/// Removal of a path that does not exist is a success.
pub trait LocalFs {
    /// `true` if `path` does not exist or is an empty directory.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` exists but cannot be inspected.
    fn is_absent_or_empty(&self, path: &Path) -> Result<bool>;
    /// Recursively remove a directory.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing directory cannot be removed.
    fn remove_dir_all(&self, path: &Path) -> Result<()>;
    /// Remove a single file.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be removed.
    fn remove_file(&self, path: &Path) -> Result<()>;
}

// ── CI Output Port ────────────────────────────────────────────────────────────

/// The calling CI environment's result channel.
pub trait OutputSink {
    /// Hide `secret` from all subsequent CI log output.
    ///
    /// # Errors
    ///
    /// Returns an error if the mask command cannot be written.
    fn mask(&self, secret: &str) -> Result<()>;
    /// Export an environment variable to later steps.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn set_env(&self, name: &str, value: &str) -> Result<()>;
    /// Set a named output of this step.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn set_output(&self, name: &str, value: &str) -> Result<()>;
    /// Signal that the step failed with `message`.
    fn fail(&self, message: &str);
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Echo a command's standard output verbatim.
    fn output(&self, text: &str);
    /// Echo a command's diagnostic output verbatim. Never suppressed.
    fn diagnostic(&self, text: &str);
}
