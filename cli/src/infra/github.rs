//! CI output channel — implements `OutputSink` for GitHub Actions.
//!
//! Values go to the runner's file commands (`GITHUB_ENV`, `GITHUB_OUTPUT`)
//! using the multi-line delimiter syntax. When those files are not
//! configured, the legacy `::set-env` / `::set-output` workflow commands are
//! printed instead.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use uuid::Uuid;

use crate::application::ports::OutputSink;

/// `OutputSink` writing GitHub Actions workflow commands.
#[derive(Debug, Default, Clone)]
pub struct GithubActionsSink {
    env_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
}

impl GithubActionsSink {
    /// Build from the runner-provided `GITHUB_ENV` and `GITHUB_OUTPUT`.
    #[must_use]
    pub fn from_env() -> Self {
        let file = |name: &str| {
            std::env::var_os(name)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self::new(file("GITHUB_ENV"), file("GITHUB_OUTPUT"))
    }

    #[must_use]
    pub fn new(env_file: Option<PathBuf>, output_file: Option<PathBuf>) -> Self {
        Self {
            env_file,
            output_file,
        }
    }
}

impl OutputSink for GithubActionsSink {
    fn mask(&self, secret: &str) -> Result<()> {
        emit(&workflow_command("add-mask", None, secret))
    }

    fn set_env(&self, name: &str, value: &str) -> Result<()> {
        match &self.env_file {
            Some(path) => append_file_command(path, name, value),
            None => emit(&workflow_command("set-env", Some(name), value)),
        }
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        match &self.output_file {
            Some(path) => append_file_command(path, name, value),
            None => emit(&workflow_command("set-output", Some(name), value)),
        }
    }

    fn fail(&self, message: &str) {
        let _ = emit(&workflow_command("error", None, message));
    }
}

/// Write one workflow command line to stdout, where the runner reads them.
fn emit(line: &str) -> Result<()> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "{line}").context("writing workflow command")?;
    out.flush().context("flushing workflow command")
}

/// Format `::command name=<name>::<value>` with workflow-command escaping.
#[must_use]
pub fn workflow_command(command: &str, name: Option<&str>, value: &str) -> String {
    match name {
        Some(name) => format!(
            "::{command} name={}::{}",
            escape_property(name),
            escape_data(value)
        ),
        None => format!("::{command}::{}", escape_data(value)),
    }
}

/// Escape a command value: `%`, CR and LF.
#[must_use]
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escape a command property: data escapes plus `:` and `,`.
#[must_use]
pub fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

/// Format one `name<<DELIM` entry for a file command.
#[must_use]
pub fn file_command_entry(name: &str, value: &str, delimiter: &str) -> String {
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

/// A random delimiter that does not occur in `value`.
fn delimiter_for(value: &str) -> String {
    loop {
        let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
        if !value.contains(&delimiter) {
            return delimiter;
        }
    }
}

fn append_file_command(path: &Path, name: &str, value: &str) -> Result<()> {
    let entry = file_command_entry(name, value, &delimiter_for(value));
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    file.write_all(entry.as_bytes())
        .with_context(|| format!("writing {}", path.display()))
}
