//! Application service — the full run: fetch, extract, provision.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use anyhow::{Context, Result};

use crate::application::ports::{
    ArchiveExtractor, ArtifactFetcher, CommandRunner, ConfigResolver, FetchedArchive, LocalFs,
    ProgressReporter,
};
use crate::application::services::cleanup::remove_run_artifacts;
use crate::application::services::provision::{ProvisionOutcome, run_pipeline};
use crate::domain::{CapturedOutputs, ForgeSettings, InputError, JobRequest, PipelineState};

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct ForgeReport {
    pub archive: FetchedArchive,
    pub progression: Vec<PipelineState>,
    pub outputs: CapturedOutputs,
}

/// Resolve the config file pattern and validate the remaining inputs.
///
/// # Errors
///
/// Returns an `InputError` if any input is missing, ambiguous or invalid.
pub fn resolve_job(
    resolver: &impl ConfigResolver,
    config_pattern: &str,
    api_key: &str,
    stage: &str,
) -> Result<JobRequest> {
    let config_file = resolver.resolve(config_pattern)?;
    JobRequest::new(config_file, api_key, stage)
}

/// Run the whole step for `job`.
///
/// Strictly sequential: the archive is fetched, extracted into
/// `settings.working_dir`, and the provisioning pipeline is run against it.
/// The working directory is left in place on success.
///
/// # Errors
///
/// Returns the first fatal error. Any files this run created are removed
/// before returning, except after a failed upload where no working directory
/// exists yet.
pub async fn forge(
    job: &JobRequest,
    settings: &ForgeSettings,
    fetcher: &impl ArtifactFetcher,
    extractor: &impl ArchiveExtractor,
    runner: &impl CommandRunner,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
) -> Result<ForgeReport> {
    prepare(fs, settings)?;

    // 1. Upload config and receive archive
    reporter.step(&format!(
        "Uploading {} for stage '{}'...",
        job.config_file().display(),
        job.stage()
    ));
    let archive = match fetcher.fetch(job, &settings.archive).await {
        Ok(archive) => archive,
        Err(e) => {
            if let Err(rm) = fs.remove_file(&settings.archive) {
                tracing::warn!(error = %rm, "could not remove partial archive");
            }
            return Err(e.context("fetching infrastructure archive"));
        }
    };
    tracing::info!(
        path = %archive.path.display(),
        bytes = archive.bytes,
        sha256 = %archive.sha256,
        "archive received"
    );
    reporter.success(&format!("Received archive ({} bytes)", archive.bytes));

    // 2. Extract into a fresh working directory
    reporter.step(&format!(
        "Extracting into {}...",
        settings.working_dir.display()
    ));
    if let Err(e) = extractor.extract(&archive.path, &settings.working_dir).await {
        remove_run_artifacts(fs, reporter, &settings.working_dir, &archive.path);
        return Err(e.context("extracting infrastructure archive"));
    }

    // 3. Provision
    let ProvisionOutcome {
        progression,
        outputs,
    } = run_pipeline(runner, fs, reporter, settings, job.stage()).await?;
    reporter.success(&format!("Stage '{}' provisioned", job.stage()));

    Ok(ForgeReport {
        archive,
        progression,
        outputs,
    })
}

/// Make sure the working directory can be extracted into.
fn prepare(fs: &impl LocalFs, settings: &ForgeSettings) -> Result<()> {
    if settings.clean {
        fs.remove_dir_all(&settings.working_dir)
            .context("removing previous working directory")?;
        fs.remove_file(&settings.archive)
            .context("removing previous archive")?;
    }
    if !fs.is_absent_or_empty(&settings.working_dir)? {
        return Err(InputError::WorkingDirNotEmpty(settings.working_dir.clone()).into());
    }
    Ok(())
}
