//! Application service — the provisioning pipeline.
//!
//! Runs [`Step::ALL`] in order against the working directory. Best-effort
//! steps may fail; the first failing strict step triggers cleanup and aborts.

use std::process::Output;
use std::time::Instant;

use anyhow::Result;

use crate::application::ports::{CommandRunner, LocalFs, ProgressReporter};
use crate::application::services::cleanup::remove_run_artifacts;
use crate::domain::{
    CapturedOutputs, CommandResult, FailurePolicy, ForgeSettings, PipelineState, ProvisionError,
    Stage, Step,
};

/// Result of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct ProvisionOutcome {
    /// States reached, in order.
    pub progression: Vec<PipelineState>,
    /// Structured output of the final step.
    pub outputs: CapturedOutputs,
}

/// A failed step, with the diagnostic text to echo before aborting.
struct StepFailure {
    error: ProvisionError,
    diagnostic: Option<String>,
}

/// Convert a finished process into the domain's command result.
#[must_use]
pub fn command_result(output: &Output) -> CommandResult {
    CommandResult {
        exit_code: output.status.code(),
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

/// Run the provisioning steps for `stage` in `settings.working_dir`.
///
/// On the first strict failure the working directory and the archive are
/// removed (once) before the error is returned.
///
/// # Errors
///
/// Returns a [`ProvisionError`] describing the first strict step that failed.
pub async fn run_pipeline(
    runner: &impl CommandRunner,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    settings: &ForgeSettings,
    stage: &Stage,
) -> Result<ProvisionOutcome> {
    let mut progression = Vec::with_capacity(Step::ALL.len());
    let mut captured = None;

    for step in Step::ALL {
        let outcome = run_step(runner, reporter, settings, stage, step).await;
        match (outcome, step.policy()) {
            (Ok(result), _) if step == Step::Output => {
                match CapturedOutputs::parse(&result.stdout) {
                    Ok(outputs) => captured = Some(outputs),
                    Err(e) => {
                        let failure = StepFailure {
                            error: ProvisionError::StepFailed {
                                step: step.label().to_string(),
                                message: format!("{e:#}"),
                            },
                            diagnostic: Some(result.stdout),
                        };
                        return Err(abort(fs, reporter, settings, failure));
                    }
                }
            }
            (Ok(result), FailurePolicy::Strict) => {
                if !result.stdout.is_empty() {
                    reporter.output(&result.stdout);
                }
            }
            (Ok(_), FailurePolicy::BestEffort) => {}
            (Err(failure), FailurePolicy::BestEffort) => {
                tracing::info!(step = %step, error = %failure.error, "best-effort step failed");
                reporter.warn(&format!("{}; continuing", failure.error));
            }
            (Err(failure), FailurePolicy::Strict) => {
                return Err(abort(fs, reporter, settings, failure));
            }
        }
        if let Some(state) = step.reaches() {
            tracing::debug!(state = ?state, "pipeline state reached");
            progression.push(state);
        }
    }

    let outputs = captured.ok_or_else(|| ProvisionError::StepNotRun {
        step: Step::Output.label().to_string(),
        reason: "no output was captured".to_string(),
    })?;
    Ok(ProvisionOutcome {
        progression,
        outputs,
    })
}

async fn run_step(
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
    settings: &ForgeSettings,
    stage: &Stage,
    step: Step,
) -> Result<CommandResult, StepFailure> {
    let args = step.args(stage.as_str());
    reporter.step(&format!("{} {}", settings.terraform_bin, args.join(" ")));
    tracing::debug!(
        program = %settings.terraform_bin,
        args = ?args,
        cwd = %settings.working_dir.display(),
        "running step"
    );

    let started = Instant::now();
    let output = runner
        .run(&settings.working_dir, &settings.terraform_bin, &args)
        .await
        .map_err(|e| StepFailure {
            error: ProvisionError::StepNotRun {
                step: step.label().to_string(),
                reason: format!("{e:#}"),
            },
            diagnostic: None,
        })?;

    let result = command_result(&output);
    tracing::info!(
        step = %step,
        exit_code = ?result.exit_code,
        elapsed = ?started.elapsed(),
        "step finished"
    );

    match result.check(settings.stderr_policy) {
        Ok(()) => Ok(result),
        Err(message) => Err(StepFailure {
            error: ProvisionError::StepFailed {
                step: step.label().to_string(),
                message,
            },
            diagnostic: (!result.stderr.is_empty()).then_some(result.stderr),
        }),
    }
}

/// Echo diagnostics, clean up, and turn the failure into the run's error.
fn abort(
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    settings: &ForgeSettings,
    failure: StepFailure,
) -> anyhow::Error {
    if let Some(text) = &failure.diagnostic {
        reporter.diagnostic(text);
    }
    tracing::error!(error = %failure.error, "provisioning step failed");
    remove_run_artifacts(fs, reporter, &settings.working_dir, &settings.archive);
    failure.error.into()
}
