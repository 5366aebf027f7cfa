//! CLI subcommand implementations.

pub mod polls;
pub mod report;
