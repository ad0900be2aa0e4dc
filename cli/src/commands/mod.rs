//! Command handlers

pub mod forge;
