//! Run settings resolved from flags and environment.
//!
//! Pure data — no I/O.

use std::path::PathBuf;
use std::time::Duration;

// ── Constants ────────────────────────────────────────────────────────────────

/// Transformation endpoint used unless overridden.
pub const DEFAULT_API_URL: &str = "https://api.stackforge.tech/v1/transform";
/// Provisioning CLI invoked for every pipeline step.
pub const DEFAULT_TERRAFORM_BIN: &str = "terraform";
/// Local file the fetched archive is streamed into.
pub const DEFAULT_ARCHIVE: &str = "output.tgz";
/// Directory the archive is extracted into.
pub const DEFAULT_WORKING_DIR: &str = "./out";

/// How a strict step's diagnostic channel is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StderrPolicy {
    /// Any byte on stderr fails the step, even with a zero exit status.
    #[default]
    Strict,
    /// Only the exit status decides; stderr is treated as warnings.
    Tolerate,
}

/// Immutable settings for one run.
#[derive(Debug, Clone)]
pub struct ForgeSettings {
    pub api_url: String,
    pub terraform_bin: String,
    pub archive: PathBuf,
    pub working_dir: PathBuf,
    /// Bound on each provisioning command; `None` waits forever.
    pub command_timeout: Option<Duration>,
    /// Bound on the whole HTTP exchange; `None` waits forever.
    pub request_timeout: Option<Duration>,
    pub stderr_policy: StderrPolicy,
    /// Remove leftovers of a previous run before starting.
    pub clean: bool,
}

impl Default for ForgeSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            terraform_bin: DEFAULT_TERRAFORM_BIN.to_string(),
            archive: PathBuf::from(DEFAULT_ARCHIVE),
            working_dir: PathBuf::from(DEFAULT_WORKING_DIR),
            command_timeout: None,
            request_timeout: None,
            stderr_policy: StderrPolicy::Strict,
            clean: false,
        }
    }
}
