//! Stackforge CI step — transform a config and provision the result.

use clap::Parser;
use clap::error::ErrorKind;
use stackforge_action::application::ports::OutputSink;
use stackforge_action::cli::Cli;
use stackforge_action::infra::github::GithubActionsSink;
use stackforge_action::logging;

#[tokio::main]
async fn main() {
    let sink = GithubActionsSink::from_env();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            // Missing or malformed inputs fail the step like any other error.
            let rendered = e.to_string();
            let summary: Vec<&str> = rendered
                .lines()
                .take_while(|l| !l.trim().is_empty())
                .map(str::trim)
                .collect();
            sink.fail(summary.join(" ").trim_start_matches("error: "));
            e.exit()
        }
    };
    logging::init(cli.verbose, cli.no_color);

    if let Err(e) = cli.run(&sink).await {
        let message = format!("{e:#}");
        eprintln!("Error: {message}");
        sink.fail(&message);
        std::process::exit(1);
    }
}
