//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, HTTP,
//! archive extraction, filesystem access, and CI workflow commands.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command_runner;
pub mod config_resolver;
pub mod extractor;
pub mod fetcher;
pub mod fs;
pub mod github;
