//! Job request — the validated, immutable inputs of one run.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::domain::error::InputError;

/// Characters a workspace name may contain: exactly those that survive URL
/// path escaping unchanged. A leading `-` would be read as a CLI flag.
static STAGE_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._~!$&'()*+,;=:@][A-Za-z0-9\-._~!$&'()*+,;=:@]*$"));

/// Secret api key. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// # Errors
    ///
    /// Returns [`InputError::EmptyApiKey`] if the key is empty or whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, InputError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(InputError::EmptyApiKey);
        }
        Ok(Self(value))
    }

    /// The raw secret, for the request body and authorization header only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Deployment stage — also the provisioning workspace name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage(String);

impl Stage {
    /// # Errors
    ///
    /// Returns [`InputError::EmptyStage`] or [`InputError::InvalidStage`].
    pub fn new(value: impl Into<String>) -> Result<Self, InputError> {
        let value = value.into();
        if value.is_empty() {
            return Err(InputError::EmptyStage);
        }
        let valid = match &*STAGE_RE {
            Ok(re) => re.is_match(&value),
            Err(_) => false,
        };
        if !valid {
            return Err(InputError::InvalidStage(value));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inputs of a single run. Constructed once, never mutated.
#[derive(Debug, Clone)]
pub struct JobRequest {
    config_file: PathBuf,
    api_key: ApiKey,
    stage: Stage,
}

impl JobRequest {
    /// Validate raw inputs into a request. `config_file` must already be
    /// resolved to a single path.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] if the api key or stage is invalid.
    pub fn new(
        config_file: impl Into<PathBuf>,
        api_key: impl Into<String>,
        stage: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            config_file: config_file.into(),
            api_key: ApiKey::new(api_key)?,
            stage: Stage::new(stage)?,
        })
    }

    #[must_use]
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    #[must_use]
    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }
}
