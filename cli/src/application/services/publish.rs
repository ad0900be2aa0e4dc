//! Application service — publishing captured outputs to the CI environment.

use anyhow::{Context, Result};

use crate::application::ports::{OutputSink, ProgressReporter};
use crate::domain::{CapturedOutputs, OUTPUTS_ENV_NAME, OUTPUTS_STEP_NAME};

/// Publish `outputs` as the `STACKFORGE_OUTPUTS` variable and the `outputs`
/// step output.
///
/// Only called after the whole pipeline succeeded.
///
/// # Errors
///
/// Returns an error if the sink cannot be written.
pub fn publish_outputs(
    sink: &impl OutputSink,
    reporter: &impl ProgressReporter,
    outputs: &CapturedOutputs,
) -> Result<()> {
    sink.set_env(OUTPUTS_ENV_NAME, outputs.as_json())
        .with_context(|| format!("exporting {OUTPUTS_ENV_NAME}"))?;
    sink.set_output(OUTPUTS_STEP_NAME, outputs.as_json())
        .with_context(|| format!("setting step output '{OUTPUTS_STEP_NAME}'"))?;

    let names = outputs.public_names();
    if names.is_empty() {
        reporter.success(&format!("Published {OUTPUTS_ENV_NAME}"));
    } else {
        reporter.success(&format!(
            "Published {OUTPUTS_ENV_NAME}: {}",
            names.join(", ")
        ));
    }
    Ok(())
}
