//! Config file resolution — implements `ConfigResolver` with `glob`.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::ports::ConfigResolver;
use crate::domain::InputError;

/// Resolves a glob pattern relative to the current directory.
pub struct GlobResolver;

impl ConfigResolver for GlobResolver {
    fn resolve(&self, pattern: &str) -> Result<PathBuf> {
        let paths = glob::glob(pattern).map_err(|e| InputError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        let mut matches: Vec<PathBuf> = paths
            .filter_map(Result::ok)
            .filter(|p| p.is_file())
            .collect();
        match matches.len() {
            0 => Err(InputError::ConfigNotFound(pattern.to_string()).into()),
            1 => Ok(matches.remove(0)),
            count => Err(InputError::AmbiguousConfig {
                pattern: pattern.to_string(),
                count,
            }
            .into()),
        }
    }
}
