//! CLI command implementations.

pub mod config;
pub mod truth_table;
