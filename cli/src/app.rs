//! Application context — the production ports and settings of one run.
//!
//! `AppContext` is constructed once in `Cli::run()` and handed to the command
//! handler, which passes its fields to the application services.

use anyhow::Result;

use crate::domain::ForgeSettings;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config_resolver::GlobResolver;
use crate::infra::extractor::TarGzExtractor;
use crate::infra::fetcher::HttpFetcher;
use crate::infra::fs::LocalFs;
use crate::output::OutputContext;

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Unified application context passed to the command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Run settings resolved from flags and environment.
    pub settings: ForgeSettings,
    /// Resolves the `config_file` input pattern.
    pub resolver: GlobResolver,
    /// Transformation API client.
    pub fetcher: HttpFetcher,
    /// Archive unpacker.
    pub extractor: TarGzExtractor,
    /// Provisioning command runner.
    pub runner: TokioCommandRunner,
    /// Local filesystem.
    pub fs: LocalFs,
}

impl AppContext {
    /// Construct an `AppContext` from output flags and run settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(flags: &OutputFlags, settings: ForgeSettings) -> Result<Self> {
        let output = OutputContext::new(flags.no_color, flags.quiet);
        let fetcher = HttpFetcher::new(
            &settings.api_url,
            settings.request_timeout,
            output.show_progress(),
        )?;
        let runner = TokioCommandRunner::new(settings.command_timeout);
        Ok(Self {
            output,
            settings,
            resolver: GlobResolver,
            fetcher,
            extractor: TarGzExtractor,
            runner,
            fs: LocalFs,
        })
    }
}
