//! Domain layer — pure types, validation and pipeline definitions.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod job;
pub mod outputs;
pub mod pipeline;

pub use config::{ForgeSettings, StderrPolicy};
pub use error::{ExtractError, FetchError, InputError, ProvisionError};
pub use job::{ApiKey, JobRequest, Stage};
pub use outputs::{CapturedOutputs, OUTPUTS_ENV_NAME, OUTPUTS_STEP_NAME};
pub use pipeline::{CommandResult, FailurePolicy, PLAN_ARTIFACT, PipelineState, Step};
