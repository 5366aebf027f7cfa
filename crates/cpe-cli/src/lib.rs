//! CPE credit eligibility CLI library.
//!
//! This crate provides the CLI interface for the credit calculator.

mod cli;
pub mod commands;
mod config;
pub mod parse;

pub use cli::{Cli, Commands};
pub use config::Config;
