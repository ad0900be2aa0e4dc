//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::Parser;
use clap::builder::FalseyValueParser;

use crate::app::{AppContext, OutputFlags};
use crate::application::ports::OutputSink;
use crate::commands;

/// Transform a configuration into infrastructure code and provision it
#[derive(Parser)]
#[command(name = "stackforge", version, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub forge: commands::forge::ForgeArgs,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Execute the step, reporting results through `sink`.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error of the run.
    pub async fn run(self, sink: &impl OutputSink) -> Result<()> {
        let Cli {
            forge,
            quiet,
            no_color,
            verbose: _,
        } = self;
        let app = AppContext::new(&OutputFlags { no_color, quiet }, forge.settings())?;
        commands::forge::run(&app, sink, &forge).await
    }
}
