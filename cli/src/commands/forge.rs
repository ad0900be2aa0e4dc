//! `stackforge` — fetch, extract, provision, publish.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use clap::builder::FalseyValueParser;

use crate::app::AppContext;
use crate::application::ports::{OutputSink, ProgressReporter};
use crate::application::services::forge::{forge, resolve_job};
use crate::application::services::publish::publish_outputs;
use crate::domain::config::{
    DEFAULT_API_URL, DEFAULT_ARCHIVE, DEFAULT_TERRAFORM_BIN, DEFAULT_WORKING_DIR,
};
use crate::domain::{ForgeSettings, StderrPolicy};
use crate::output::TerminalReporter;

/// Step inputs and runtime settings.
#[derive(Args, Debug)]
pub struct ForgeArgs {
    /// Config file to transform (glob pattern matching exactly one file)
    #[arg(long, env = "INPUT_CONFIG_FILE")]
    pub config_file: String,

    /// Transformation API key
    #[arg(long, env = "INPUT_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Stage name, also used as the workspace name
    #[arg(long, env = "INPUT_STAGE")]
    pub stage: String,

    /// Transformation endpoint
    #[arg(long, env = "STACKFORGE_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Provisioning CLI binary
    #[arg(long = "terraform", env = "STACKFORGE_TERRAFORM_BIN", default_value = DEFAULT_TERRAFORM_BIN)]
    pub terraform_bin: String,

    /// Where the fetched archive is written
    #[arg(long, env = "STACKFORGE_ARCHIVE", default_value = DEFAULT_ARCHIVE)]
    pub archive: PathBuf,

    /// Where the archive is extracted and commands are run
    #[arg(long, env = "STACKFORGE_WORKING_DIR", default_value = DEFAULT_WORKING_DIR)]
    pub working_dir: PathBuf,

    /// Kill a provisioning command after this many seconds (default: no limit)
    #[arg(long, env = "STACKFORGE_COMMAND_TIMEOUT", value_name = "SECS")]
    pub command_timeout: Option<u64>,

    /// Abort the API request after this many seconds (default: no limit)
    #[arg(long, env = "STACKFORGE_REQUEST_TIMEOUT", value_name = "SECS")]
    pub request_timeout: Option<u64>,

    /// Judge provisioning commands by exit status only, ignoring stderr text
    #[arg(long, env = "STACKFORGE_TOLERATE_STDERR", value_parser = FalseyValueParser::new())]
    pub tolerate_stderr: bool,

    /// Remove a working directory and archive left by a previous run
    #[arg(long, env = "STACKFORGE_CLEAN", value_parser = FalseyValueParser::new())]
    pub clean: bool,
}

impl ForgeArgs {
    /// Collect the runtime settings.
    #[must_use]
    pub fn settings(&self) -> ForgeSettings {
        ForgeSettings {
            api_url: self.api_url.clone(),
            terraform_bin: self.terraform_bin.clone(),
            archive: self.archive.clone(),
            working_dir: self.working_dir.clone(),
            command_timeout: self.command_timeout.map(Duration::from_secs),
            request_timeout: self.request_timeout.map(Duration::from_secs),
            stderr_policy: if self.tolerate_stderr {
                StderrPolicy::Tolerate
            } else {
                StderrPolicy::Strict
            },
            clean: self.clean,
        }
    }
}

/// Run the step and publish its outputs.
///
/// # Errors
///
/// Returns the first fatal error; nothing is published in that case.
pub async fn run(app: &AppContext, sink: &impl OutputSink, args: &ForgeArgs) -> Result<()> {
    if !args.api_key.trim().is_empty() {
        sink.mask(&args.api_key)?;
    }
    let reporter = TerminalReporter::new(&app.output);

    let job = resolve_job(&app.resolver, &args.config_file, &args.api_key, &args.stage)?;
    tracing::info!(config_file = %job.config_file().display(), stage = %job.stage(), "job resolved");

    let report = forge(
        &job,
        &app.settings,
        &app.fetcher,
        &app.extractor,
        &app.runner,
        &app.fs,
        &reporter,
    )
    .await?;
    tracing::debug!(progression = ?report.progression, "pipeline complete");

    publish_outputs(sink, &reporter, &report.outputs)?;
    reporter.success("Finished forging!");
    Ok(())
}
