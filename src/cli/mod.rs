//! Command-line interface for playwise.
//!
//! A thin adapter that feeds JSON operations to a catalog engine and prints
//! the results.

mod commands;
pub mod script;

pub use commands::{Cli, Commands, run_command};
