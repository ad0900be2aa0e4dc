//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

// ── Input errors ──────────────────────────────────────────────────────────────

/// Errors raised while resolving and validating the step inputs.
///
/// Nothing has been created on disk when one of these is returned.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Input 'api_key' must not be empty.")]
    EmptyApiKey,

    #[error("Input 'stage' must not be empty.")]
    EmptyStage,

    #[error(
        "Invalid stage '{0}': only letters, digits and URL path-safe characters (-._~!$&'()*+,;=:@) are allowed, and it must not start with '-'."
    )]
    InvalidStage(String),

    #[error("No file matches config_file pattern '{0}'.")]
    ConfigNotFound(String),

    #[error("config_file pattern '{pattern}' matches {count} files; it must match exactly one.")]
    AmbiguousConfig { pattern: String, count: usize },

    #[error("Invalid config_file pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error(
        "Working directory {} already exists and is not empty. Remove it or pass --clean.",
        .0.display()
    )]
    WorkingDirNotEmpty(PathBuf),
}

// ── Fetch errors ──────────────────────────────────────────────────────────────

/// Errors from the transformation API exchange.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Transformation API returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Transformation API request failed: {0}")]
    Transport(String),

    #[error("Writing archive {} failed: {reason}", .path.display())]
    Write { path: PathBuf, reason: String },
}

// ── Extraction errors ─────────────────────────────────────────────────────────

/// Errors while unpacking the fetched archive.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Archive {} is not a valid gzip-compressed tarball: {reason}", .path.display())]
    InvalidArchive { path: PathBuf, reason: String },

    #[error("Cannot write to working directory {}: {reason}", .path.display())]
    Destination { path: PathBuf, reason: String },
}

// ── Provisioning errors ───────────────────────────────────────────────────────

/// Errors from a strict provisioning step.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The command ran and reported failure (exit status or diagnostic text).
    #[error("'{step}' failed: {message}")]
    StepFailed { step: String, message: String },

    /// The command could not be run to completion (spawn error, timeout).
    #[error("'{step}' could not be run: {reason}")]
    StepNotRun { step: String, reason: String },
}
