//! Captured provisioning outputs, as published to the CI environment.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable the outputs are exported under.
pub const OUTPUTS_ENV_NAME: &str = "STACKFORGE_OUTPUTS";
/// Step output name the outputs are exported under.
pub const OUTPUTS_STEP_NAME: &str = "outputs";

/// One entry of the `output -json` map.
#[derive(Debug, Deserialize)]
struct OutputEntry {
    #[serde(default)]
    sensitive: bool,
}

/// Raw JSON text of the final step, validated to be an output map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutputs {
    json: String,
    names: Vec<String>,
}

impl CapturedOutputs {
    /// Parse the stdout of the `output -json` step.
    ///
    /// The text is kept verbatim (trimmed); parsing only checks it is a JSON
    /// object and collects the non-sensitive output names.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a JSON object.
    pub fn parse(stdout: &str) -> Result<Self> {
        let json = stdout.trim().to_string();
        let map: BTreeMap<String, serde_json::Value> =
            serde_json::from_str(&json).context("output is not a JSON object")?;
        let names = map
            .into_iter()
            .filter(|(_, v)| {
                !serde_json::from_value::<OutputEntry>(v.clone()).is_ok_and(|e| e.sensitive)
            })
            .map(|(k, _)| k)
            .collect();
        Ok(Self { json, names })
    }

    /// The JSON text exactly as produced by the provisioning CLI.
    #[must_use]
    pub fn as_json(&self) -> &str {
        &self.json
    }

    /// Names of the outputs not marked sensitive, sorted.
    #[must_use]
    pub fn public_names(&self) -> &[String] {
        &self.names
    }
}
