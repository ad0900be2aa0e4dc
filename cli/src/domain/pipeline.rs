//! Provisioning pipeline definition: ordered steps, their failure policy, and
//! the state each one establishes.
//!
//! The steps are plain data so the runner is a single loop.

use std::fmt;

use crate::domain::config::StderrPolicy;

/// File name of the plan produced by [`Step::Plan`] inside the working
/// directory and consumed by [`Step::Apply`].
pub const PLAN_ARTIFACT: &str = "tf-plan";

/// Whether a failing step aborts the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Failure is logged and ignored (idempotent setup).
    BestEffort,
    /// Failure triggers cleanup and aborts the run.
    Strict,
}

/// Progress of the pipeline. Each strict step moves it one state forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineState {
    Pending,
    WorkspaceReady,
    Initialized,
    Planned,
    Applied,
    OutputsCaptured,
}

/// One provisioning command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    WorkspaceNew,
    WorkspaceSelect,
    Init,
    Plan,
    Apply,
    Output,
}

impl Step {
    /// Execution order.
    pub const ALL: [Step; 6] = [
        Step::WorkspaceNew,
        Step::WorkspaceSelect,
        Step::Init,
        Step::Plan,
        Step::Apply,
        Step::Output,
    ];

    /// Arguments passed to the provisioning CLI.
    #[must_use]
    pub fn args(self, stage: &str) -> Vec<&str> {
        match self {
            Step::WorkspaceNew => vec!["workspace", "new", stage],
            Step::WorkspaceSelect => vec!["workspace", "select", stage],
            Step::Init => vec!["init"],
            Step::Plan => vec!["plan", "-out", PLAN_ARTIFACT],
            Step::Apply => vec!["apply", "-auto-approve", PLAN_ARTIFACT],
            Step::Output => vec!["output", "-json"],
        }
    }

    #[must_use]
    pub fn policy(self) -> FailurePolicy {
        match self {
            Step::WorkspaceNew | Step::WorkspaceSelect => FailurePolicy::BestEffort,
            Step::Init | Step::Plan | Step::Apply | Step::Output => FailurePolicy::Strict,
        }
    }

    /// State established once this step succeeds. Workspace setup is
    /// reached after `select` regardless of its outcome.
    #[must_use]
    pub fn reaches(self) -> Option<PipelineState> {
        match self {
            Step::WorkspaceNew => None,
            Step::WorkspaceSelect => Some(PipelineState::WorkspaceReady),
            Step::Init => Some(PipelineState::Initialized),
            Step::Plan => Some(PipelineState::Planned),
            Step::Apply => Some(PipelineState::Applied),
            Step::Output => Some(PipelineState::OutputsCaptured),
        }
    }

    /// Short human label, e.g. `"workspace new"`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Step::WorkspaceNew => "workspace new",
            Step::WorkspaceSelect => "workspace select",
            Step::Init => "init",
            Step::Plan => "plan",
            Step::Apply => "apply",
            Step::Output => "output",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Exit status and captured streams of one finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    /// Judge the result of a step.
    ///
    /// # Errors
    ///
    /// Returns the failure message: the diagnostic text if any was written,
    /// otherwise a description of the exit status.
    pub fn check(&self, policy: StderrPolicy) -> Result<(), String> {
        let stderr_fails = policy == StderrPolicy::Strict && !self.stderr.is_empty();
        if self.success && !stderr_fails {
            return Ok(());
        }
        if !self.stderr.trim().is_empty() {
            return Err(self.stderr.trim().to_string());
        }
        Err(match self.exit_code {
            Some(code) if code != 0 => format!("exited with status {code}"),
            Some(_) => "wrote to stderr".to_string(),
            None => "terminated by signal".to_string(),
        })
    }
}
